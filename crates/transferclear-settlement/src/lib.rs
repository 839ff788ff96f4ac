//! # transferclear-settlement
//!
//! **Settlement plane**: drives an accepted offer through the fraud gate
//! and the external three-step confirmation protocol, then applies local
//! bookkeeping as one atomic commit.
//!
//! ## Pipeline
//!
//! 1. Entry checks: offer accepted, no completed transfer for it yet,
//!    per-player settlement lock acquired
//! 2. Fraud gate over both parties' recent completed transfers
//! 3. External confirmation: Propose (as seller) → Accept (as buyer) →
//!    Validate (as the neutral authority), each step preconditioned on the
//!    remote-reported phase and bounded by a timeout
//! 4. Atomic commit: flags, ledger reference, ownership, balances,
//!    budgets, completion notifications — all or nothing
//!
//! A failure after a successful Propose leaves external state behind; the
//! engine never auto-compensates, it flags the report for manual
//! reconciliation instead.

pub mod coordinator;
pub mod engine;
pub mod ledger;
pub mod lock;

pub use coordinator::{SettlementCoordinator, SettlementReport, SettlementRequest};
pub use engine::{SettlementResult, TransferEngine};
pub use ledger::{AcceptAck, ConfirmationLedger, MemoryLedger, ProposeAck, ValidateAck};
pub use lock::SettleLock;
