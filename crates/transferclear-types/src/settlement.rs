//! Settlement state machine vocabulary shared between the coordinator, the
//! error taxonomy, and the upward API.
//!
//! ## Local state machine
//!
//! ```text
//!              ┌──────────────────┐
//!   Accepted ──▶ FraudCheckFailed │ (terminal, nothing persisted)
//!       │      └──────────────────┘
//!       ▼
//!   Proposed ──▶ AcceptedOnLedger ──▶ Validated ──▶ Completed (terminal)
//!       │               │
//!       └───────────────┴──▶ Failed (terminal, no local commit)
//! ```

use serde::{Deserialize, Serialize};

/// The phase of the settlement pipeline in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementPhase {
    /// Scoring the counterparties' histories.
    FraudCheck,
    /// Registering intent on the external ledger (as the selling club).
    Propose,
    /// Confirming the proposal on the external ledger (as the buying club).
    Accept,
    /// Neutral-authority validation on the external ledger.
    Validate,
    /// Applying the local atomic commit.
    Commit,
}

impl std::fmt::Display for SettlementPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FraudCheck => write!(f, "FRAUD_CHECK"),
            Self::Propose => write!(f, "PROPOSE"),
            Self::Accept => write!(f, "ACCEPT"),
            Self::Validate => write!(f, "VALIDATE"),
            Self::Commit => write!(f, "COMMIT"),
        }
    }
}

/// The local settlement state for one attempt.
///
/// Transitions are monotonic; `FraudCheckFailed`, `Failed`, and `Completed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementState {
    /// Entry state: the offer was accepted, settlement not yet started.
    Accepted,
    /// The fraud gate rejected the transfer. Terminal.
    FraudCheckFailed,
    /// Propose succeeded on the external ledger.
    Proposed,
    /// Accept succeeded on the external ledger.
    AcceptedOnLedger,
    /// Validate succeeded on the external ledger.
    Validated,
    /// The local atomic commit applied. Terminal.
    Completed,
    /// An external step or the commit failed. Terminal.
    Failed,
}

impl SettlementState {
    /// Can settlement move from this state to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Accepted, Self::FraudCheckFailed | Self::Proposed | Self::Failed)
                | (Self::Proposed, Self::AcceptedOnLedger | Self::Failed)
                | (Self::AcceptedOnLedger, Self::Validated | Self::Failed)
                | (Self::Validated, Self::Completed | Self::Failed)
        )
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FraudCheckFailed | Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for SettlementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::FraudCheckFailed => write!(f, "FRAUD_CHECK_FAILED"),
            Self::Proposed => write!(f, "PROPOSED"),
            Self::AcceptedOnLedger => write!(f, "ACCEPTED_ON_LEDGER"),
            Self::Validated => write!(f, "VALIDATED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// The transfer state reported by the external confirmation ledger.
///
/// The engine checks the remote phase before Accept (must be `Proposed`)
/// and before Validate (must be `Accepted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemotePhase {
    Proposed,
    Accepted,
    Validated,
    Completed,
    Rejected,
}

impl std::fmt::Display for RemotePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proposed => write!(f, "PROPOSED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Validated => write!(f, "VALIDATED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}
