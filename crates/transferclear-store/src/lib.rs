//! # transferclear-store
//!
//! **Persistence facade**: the narrow [`LedgerStore`] trait the engine
//! issues reads and writes through, the [`SettlementCommit`] unit that
//! groups every settlement mutation into one atomic write, an in-memory
//! reference adapter ([`MemoryStore`]), and the [`NotificationEmitter`]
//! that records the audit trail.
//!
//! The engine never opens connections or owns storage details; callers
//! inject a store handle with an explicit lifetime. Adapters must uphold
//! two guarantees:
//!
//! 1. [`LedgerStore::apply_settlement`] is all-or-nothing — a failure
//!    leaves no sub-mutation applied.
//! 2. Offer status updates respect the monotonic lifecycle (no transition
//!    out of a resolved status).

pub mod emitter;
pub mod memory;
pub mod store;

pub use emitter::NotificationEmitter;
pub use memory::MemoryStore;
pub use store::{LedgerStore, SettlementCommit};
