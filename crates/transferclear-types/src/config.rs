//! Configuration types for the TransferClear engine.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountRef};

/// Configuration for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The ledger account allowed to execute the Validate step.
    pub authority: AccountRef,
    /// How many completed transfers per club role feed the fraud scorer.
    pub history_window: usize,
    /// Default offer validity in days when the caller does not specify one.
    pub offer_ttl_days: i64,
    /// Per-step ledger call timeouts.
    pub timeouts: LedgerTimeouts,
}

impl EngineConfig {
    /// Build a config with defaults for everything but the authority.
    #[must_use]
    pub fn with_authority(authority: AccountRef) -> Self {
        Self {
            authority,
            history_window: constants::HISTORY_WINDOW,
            offer_ttl_days: constants::DEFAULT_OFFER_TTL_DAYS,
            timeouts: LedgerTimeouts::default(),
        }
    }
}

/// Timeouts for the three external confirmation steps, in milliseconds.
///
/// Each step blocks on network/consensus latency; an overrun is surfaced as
/// a `Failed` settlement outcome, never a partial commit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LedgerTimeouts {
    pub propose_ms: u64,
    pub accept_ms: u64,
    pub validate_ms: u64,
}

impl Default for LedgerTimeouts {
    fn default() -> Self {
        Self {
            propose_ms: constants::DEFAULT_PROPOSE_TIMEOUT_MS,
            accept_ms: constants::DEFAULT_ACCEPT_TIMEOUT_MS,
            validate_ms: constants::DEFAULT_VALIDATE_TIMEOUT_MS,
        }
    }
}
