//! Error types for the TransferClear settlement engine.
//!
//! All errors use the `TC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Offer / entity lookup errors
//! - 2xx: Budget errors
//! - 3xx: Fraud-gate errors
//! - 4xx: Settlement-state errors
//! - 5xx: External ledger errors
//! - 6xx: Persistence errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    AccountRef, ClubId, OfferId, OfferStatus, PlayerId, RemotePhase, SettlementPhase, TransferId,
    TransferRef,
};

/// Central error enum for all TransferClear operations.
#[derive(Debug, Error)]
pub enum TransferclearError {
    // =================================================================
    // Offer / Entity Errors (1xx)
    // =================================================================
    /// The requested offer was not found.
    #[error("TC_ERR_100: Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The requested player was not found.
    #[error("TC_ERR_101: Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The requested club was not found.
    #[error("TC_ERR_102: Club not found: {0}")]
    ClubNotFound(ClubId),

    /// The requested transfer was not found.
    #[error("TC_ERR_103: Transfer not found: {0}")]
    TransferNotFound(TransferId),

    /// The offer has already been resolved and cannot be responded to.
    #[error("TC_ERR_104: Offer already resolved: status is {status}")]
    OfferNotPending { status: OfferStatus },

    /// The offer's TTL elapsed before it was resolved.
    #[error("TC_ERR_105: Offer expired: {0}")]
    OfferExpired(OfferId),

    /// Settlement requires an accepted offer.
    #[error("TC_ERR_106: Offer not accepted: status is {status}")]
    OfferNotAccepted { status: OfferStatus },

    /// A club cannot make an offer for its own player.
    #[error("TC_ERR_107: Offering club already owns the player")]
    SameClub,

    /// The player is not listed for transfer.
    #[error("TC_ERR_108: Player not listed for transfer: {0}")]
    PlayerNotListed(PlayerId),

    /// A settlement breakdown quotes a different fee than the offer.
    #[error("TC_ERR_109: Breakdown fee {actual} does not match offer amount {expected}")]
    BreakdownMismatch { expected: Decimal, actual: Decimal },

    // =================================================================
    // Budget Errors (2xx)
    // =================================================================
    /// The offer amount exceeds the offering club's transfer budget.
    #[error("TC_ERR_200: Offer {amount} exceeds transfer budget {budget}")]
    BudgetExceeded { amount: Decimal, budget: Decimal },

    // =================================================================
    // Fraud-Gate Errors (3xx)
    // =================================================================
    /// The fraud gate rejected the transfer.
    #[error("TC_ERR_300: Fraud check failed (similarity {similarity:.4}): {reason}")]
    FraudCheckFailed { similarity: f64, reason: String },

    /// Two fingerprints of different lengths were compared.
    #[error("TC_ERR_301: Fingerprint length mismatch: {left} vs {right}")]
    FingerprintLengthMismatch { left: usize, right: usize },

    // =================================================================
    // Settlement-State Errors (4xx)
    // =================================================================
    /// The offer's transfer already completed (idempotency guard).
    #[error("TC_ERR_400: Transfer already completed: {0}")]
    TransferAlreadyCompleted(TransferId),

    /// Another settlement for the same player is in flight.
    #[error("TC_ERR_401: Settlement already in flight for {0}")]
    SettlementInFlight(PlayerId),

    // =================================================================
    // External Ledger Errors (5xx)
    // =================================================================
    /// The confirmation ledger could not be reached. Retryable.
    #[error("TC_ERR_500: Confirmation ledger unavailable: {reason}")]
    LedgerUnavailable { reason: String },

    /// A remote precondition failed. Not retryable without intervention.
    #[error("TC_ERR_501: Ledger precondition failed during {phase}: {reason}")]
    LedgerPreconditionFailed {
        phase: SettlementPhase,
        reason: String,
    },

    /// An external step exceeded its configured timeout.
    #[error("TC_ERR_502: Ledger call timed out during {phase}: {elapsed_ms}ms > {limit_ms}ms")]
    LedgerTimeout {
        phase: SettlementPhase,
        elapsed_ms: u64,
        limit_ms: u64,
    },

    /// Validate was attempted by an account other than the authority.
    #[error("TC_ERR_503: Account {account} is not the designated validation authority")]
    UnauthorizedValidator { account: AccountRef },

    /// A counterparty account is unknown to the confirmation ledger.
    #[error("TC_ERR_504: Account not registered on the ledger: {account}")]
    AccountNotRegistered { account: AccountRef },

    /// The selling account has no spendable balance on the ledger.
    #[error("TC_ERR_505: Account has no spendable ledger balance: {account}")]
    NoSpendableBalance { account: AccountRef },

    /// The remote transfer is not in the phase the next step requires.
    #[error("TC_ERR_506: Ledger transfer in wrong phase: expected {expected}, got {actual}")]
    WrongLedgerPhase {
        expected: RemotePhase,
        actual: RemotePhase,
    },

    /// The ledger does not know the referenced transfer.
    #[error("TC_ERR_507: Unknown ledger transfer: {0}")]
    UnknownLedgerTransfer(TransferRef),

    // =================================================================
    // Persistence Errors (6xx)
    // =================================================================
    /// A store write failed. The store guarantees no partial commit.
    #[error("TC_ERR_600: Persistence failed: {reason}")]
    PersistenceFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TC_ERR_900: Internal error: {0}")]
    Internal(String),
}

impl TransferclearError {
    /// Whether a caller may retry the same operation unchanged.
    ///
    /// Only connectivity-class failures are retryable; remote state
    /// mismatches need operator intervention first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LedgerUnavailable { .. } | Self::LedgerTimeout { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TransferclearError>;
