//! # transferclear-registry
//!
//! **Offer plane**: the lifecycle of a transfer offer before settlement.
//!
//! The registry is a hard gate in front of the offer table:
//!
//! - **Fail-closed**: every creation check must pass or the offer is
//!   rejected with a specific error
//! - **No bypass**: settlement only ever sees offers that went through
//!   these gates
//! - **Monotonic**: an offer resolves exactly once; expired offers are
//!   swept to `Expired` at response time and can never be resolved
//!
//! Balances and ownership are never touched here — accepting an offer
//! only marks it eligible for settlement.

pub mod registry;

pub use registry::{OfferRegistry, OfferRequest};
