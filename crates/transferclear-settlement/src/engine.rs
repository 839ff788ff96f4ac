//! The `TransferEngine` facade: the API surface the presentation layer
//! consumes.
//!
//! Three operations drive the whole flow — `create_offer`,
//! `respond_to_offer`, `process_settlement` — plus read passthroughs for
//! dashboards. Settlement outcomes are flattened into [`SettlementResult`]
//! so callers always get a `success` flag, an error classification, and
//! the distinct left-in-intermediate-state indicator.

use std::sync::Arc;

use transferclear_fraud::FraudScorer;
use transferclear_registry::{OfferRegistry, OfferRequest};
use transferclear_store::LedgerStore;
use transferclear_types::{
    Club, ClubId, EngineConfig, ExpenseBreakdown, FraudAssessment, IncomeBreakdown, Notification,
    NotificationId, OfferId, Player, PlayerId, Result, SettlementPhase, SettlementState, Transfer,
    TransferId, TransferOffer, TransferRef,
};

use crate::coordinator::{SettlementCoordinator, SettlementRequest};
use crate::ledger::ConfirmationLedger;

/// Flattened settlement outcome for the presentation layer.
///
/// `success` is true only for a completed settlement. Every failure
/// carries a `TC_ERR_`-classified message; `needs_reconciliation`
/// distinguishes the partial-external-success case from ordinary failures.
#[derive(Debug)]
pub struct SettlementResult {
    /// Whether the settlement completed.
    pub success: bool,
    /// Terminal state the attempt reached.
    pub state: SettlementState,
    /// The persisted transfer row, if one was created.
    pub transfer_id: Option<TransferId>,
    /// The fraud assessment, when the gate ran.
    pub assessment: Option<FraudAssessment>,
    /// The external ledger reference, once Propose succeeded.
    pub ledger_ref: Option<TransferRef>,
    /// Which phase failed, for non-completed outcomes.
    pub failed_phase: Option<SettlementPhase>,
    /// Set when external steps partially succeeded; an operator must
    /// reconcile before retrying.
    pub needs_reconciliation: bool,
    /// `TC_ERR_`-classified human-readable failure message.
    pub error: Option<String>,
}

/// The Transfer Settlement Engine.
pub struct TransferEngine<S: LedgerStore, L: ConfirmationLedger> {
    store: Arc<S>,
    registry: OfferRegistry<S>,
    coordinator: SettlementCoordinator<S, L>,
}

impl<S: LedgerStore, L: ConfirmationLedger> TransferEngine<S, L> {
    #[must_use]
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: EngineConfig) -> Self {
        Self::with_scorer(store, ledger, config, FraudScorer::new())
    }

    /// Engine with a custom fraud scorer (band overrides).
    #[must_use]
    pub fn with_scorer(
        store: Arc<S>,
        ledger: Arc<L>,
        config: EngineConfig,
        scorer: FraudScorer,
    ) -> Self {
        let registry = OfferRegistry::new(Arc::clone(&store), config.offer_ttl_days);
        let coordinator =
            SettlementCoordinator::with_scorer(Arc::clone(&store), ledger, config, scorer);
        Self {
            store,
            registry,
            coordinator,
        }
    }

    // --- offer lifecycle -------------------------------------------------

    /// Create a pending offer for a listed player.
    pub fn create_offer(&self, request: OfferRequest) -> Result<TransferOffer> {
        self.registry.create_offer(request)
    }

    /// Accept or reject a pending offer.
    pub fn respond_to_offer(&self, offer: OfferId, accept: bool) -> Result<TransferOffer> {
        self.registry.respond(offer, accept)
    }

    /// Toggle a player's transfer listing.
    pub fn list_player(&self, player: PlayerId, listed: bool) -> Result<()> {
        self.registry.list_player(player, listed)
    }

    // --- settlement ------------------------------------------------------

    /// Settle an accepted offer with the deal's income and expense
    /// breakdowns.
    ///
    /// Never panics and never returns `Err`: every outcome — including
    /// rejections before the pipeline started — is flattened into a
    /// [`SettlementResult`].
    pub fn process_settlement(
        &self,
        offer: OfferId,
        income: IncomeBreakdown,
        expense: ExpenseBreakdown,
    ) -> SettlementResult {
        let request = SettlementRequest {
            offer,
            income,
            expense,
        };
        match self.coordinator.settle(&request) {
            Ok(report) => SettlementResult {
                success: report.state == SettlementState::Completed,
                state: report.state,
                transfer_id: report.transfer_id,
                assessment: report.assessment,
                ledger_ref: report.ledger_ref,
                failed_phase: report.failed_phase,
                needs_reconciliation: report.needs_reconciliation,
                error: report.failure.map(|e| e.to_string()),
            },
            Err(error) => SettlementResult {
                success: false,
                state: SettlementState::Failed,
                transfer_id: None,
                assessment: None,
                ledger_ref: None,
                failed_phase: None,
                needs_reconciliation: false,
                error: Some(error.to_string()),
            },
        }
    }

    // --- reads for the presentation layer --------------------------------

    /// Fetch a club.
    pub fn club(&self, id: ClubId) -> Result<Club> {
        self.store.club(id)
    }

    /// Fetch a player.
    pub fn player(&self, id: PlayerId) -> Result<Player> {
        self.store.player(id)
    }

    /// Fetch an offer.
    pub fn offer(&self, id: OfferId) -> Result<TransferOffer> {
        self.store.offer(id)
    }

    /// All pending offers.
    pub fn pending_offers(&self) -> Result<Vec<TransferOffer>> {
        self.registry.pending_offers()
    }

    /// Fetch a transfer.
    pub fn transfer(&self, id: TransferId) -> Result<Transfer> {
        self.store.transfer(id)
    }

    /// A club's notifications, newest first.
    pub fn notifications(&self, club: ClubId, unread_only: bool) -> Result<Vec<Notification>> {
        self.store.notifications(club, unread_only)
    }

    /// Mark a notification as read.
    pub fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        self.store.mark_notification_read(id)
    }
}
