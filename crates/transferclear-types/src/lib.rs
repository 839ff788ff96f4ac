//! # transferclear-types
//!
//! Shared types, errors, and configuration for the **TransferClear**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ClubId`], [`PlayerId`], [`OfferId`], [`TransferId`], [`AssessmentId`], [`NotificationId`], [`AccountRef`], [`TransferRef`]
//! - **Party model**: [`Club`], [`Player`]
//! - **Offer model**: [`TransferOffer`], [`OfferStatus`]
//! - **Transfer model**: [`Transfer`], [`IncomeBreakdown`], [`ExpenseBreakdown`]
//! - **Fraud model**: [`Fingerprint`], [`FraudAssessment`], [`RiskTier`]
//! - **Notification model**: [`Notification`], [`NotificationKind`]
//! - **Settlement model**: [`SettlementPhase`], [`SettlementState`], [`RemotePhase`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`TransferclearError`] with `TC_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod assessment;
pub mod club;
pub mod config;
pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod ids;
pub mod notification;
pub mod offer;
pub mod player;
pub mod settlement;
pub mod transfer;

// Re-export all primary types at crate root for ergonomic imports:
//   use transferclear_types::{Club, Player, TransferOffer, Transfer, ...};

pub use assessment::*;
pub use club::*;
pub use config::*;
pub use error::*;
pub use fingerprint::*;
pub use ids::*;
pub use notification::*;
pub use offer::*;
pub use player::*;
pub use settlement::*;
pub use transfer::*;

// Constants are accessed via `transferclear_types::constants::FOO`
// (not re-exported to avoid name collisions).
