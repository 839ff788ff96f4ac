//! The three-phase settlement coordinator.
//!
//! Drives one accepted offer through fraud scoring, the external
//! propose/accept/validate protocol, and the local atomic commit, in
//! strict sequence under the per-player lock.
//!
//! Failure semantics: the first failing step wins and halts the pipeline.
//! The transfer row keeps whatever was reached (`is_completed` stays
//! false), no balance or ownership mutation is applied, and a failure
//! after a successful Propose is flagged for manual reconciliation — the
//! engine never reverses external steps on its own.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use transferclear_fraud::{FraudScorer, ProposalSample, TransferSample};
use transferclear_store::{LedgerStore, NotificationEmitter, SettlementCommit};
use transferclear_types::{
    AccountRef, EngineConfig, ExpenseBreakdown, FraudAssessment, IncomeBreakdown, OfferId,
    OfferStatus, RemotePhase, Result, SettlementPhase, SettlementState, Transfer, TransferId,
    TransferRef, TransferRole, TransferclearError,
};

use crate::ledger::ConfirmationLedger;
use crate::lock::SettleLock;

/// A request to settle an accepted offer.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    /// The accepted offer to settle.
    pub offer: OfferId,
    /// Seller-side income breakdown for the deal.
    pub income: IncomeBreakdown,
    /// Buyer-side expense breakdown for the deal.
    pub expense: ExpenseBreakdown,
}

/// Outcome of one settlement attempt.
#[derive(Debug)]
pub struct SettlementReport {
    /// Terminal state the attempt reached.
    pub state: SettlementState,
    /// The persisted transfer row, if the fraud gate passed.
    pub transfer_id: Option<TransferId>,
    /// The fraud assessment (persisted only alongside a transfer row).
    pub assessment: Option<FraudAssessment>,
    /// The external ledger reference, once Propose succeeded.
    pub ledger_ref: Option<TransferRef>,
    /// Which phase failed, for non-completed outcomes.
    pub failed_phase: Option<SettlementPhase>,
    /// The failing step's error, verbatim.
    pub failure: Option<TransferclearError>,
    /// Set when external steps partially succeeded and an operator must
    /// reconcile the ledger with local state.
    pub needs_reconciliation: bool,
}

impl SettlementReport {
    fn completed(
        transfer_id: TransferId,
        assessment: FraudAssessment,
        ledger_ref: TransferRef,
    ) -> Self {
        Self {
            state: SettlementState::Completed,
            transfer_id: Some(transfer_id),
            assessment: Some(assessment),
            ledger_ref: Some(ledger_ref),
            failed_phase: None,
            failure: None,
            needs_reconciliation: false,
        }
    }

    fn fraud_rejected(assessment: FraudAssessment) -> Self {
        let failure = TransferclearError::FraudCheckFailed {
            similarity: assessment.similarity,
            reason: assessment.rationale.clone(),
        };
        Self {
            state: SettlementState::FraudCheckFailed,
            transfer_id: None,
            assessment: Some(assessment),
            ledger_ref: None,
            failed_phase: Some(SettlementPhase::FraudCheck),
            failure: Some(failure),
            needs_reconciliation: false,
        }
    }
}

/// Failure raised inside the external pipeline, after the transfer row
/// exists.
struct PipelineFailure {
    phase: SettlementPhase,
    error: TransferclearError,
    /// Whether external state was (or may have been) left behind.
    reconcile: bool,
    ledger_ref: Option<TransferRef>,
}

type PipelineResult<T> = std::result::Result<T, PipelineFailure>;

/// Drives the settlement state machine for accepted offers.
pub struct SettlementCoordinator<S: LedgerStore, L: ConfirmationLedger> {
    store: Arc<S>,
    ledger: Arc<L>,
    scorer: FraudScorer,
    lock: SettleLock,
    config: EngineConfig,
}

impl<S: LedgerStore, L: ConfirmationLedger> SettlementCoordinator<S, L> {
    #[must_use]
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: EngineConfig) -> Self {
        Self::with_scorer(store, ledger, config, FraudScorer::new())
    }

    /// Coordinator with a custom fraud scorer (band overrides).
    #[must_use]
    pub fn with_scorer(
        store: Arc<S>,
        ledger: Arc<L>,
        config: EngineConfig,
        scorer: FraudScorer,
    ) -> Self {
        Self {
            store,
            ledger,
            scorer,
            lock: SettleLock::new(),
            config,
        }
    }

    /// Settle an accepted offer.
    ///
    /// Returns `Ok` with a terminal [`SettlementReport`] for every outcome
    /// the pipeline itself produced — completed, fraud-rejected, or failed
    /// mid-protocol. Returns `Err` only for rejections before the pipeline
    /// started: unknown or non-accepted offer, an already-completed
    /// transfer, a concurrent settlement for the player, or a store
    /// failure while creating the transfer row.
    pub fn settle(&self, request: &SettlementRequest) -> Result<SettlementReport> {
        let offer = self.store.offer(request.offer)?;
        if offer.status != OfferStatus::Accepted {
            return Err(TransferclearError::OfferNotAccepted {
                status: offer.status,
            });
        }
        for fee in [request.income.transfer_fee, request.expense.transfer_fee] {
            if fee != offer.amount {
                return Err(TransferclearError::BreakdownMismatch {
                    expected: offer.amount,
                    actual: fee,
                });
            }
        }

        // Everything below runs under the per-player lock: entry re-checks,
        // scoring, the external protocol, and the commit.
        let _guard = self.lock.acquire(offer.player)?;

        if let Some(previous) = self.store.transfer_for_offer(offer.id)? {
            if previous.is_completed {
                return Err(TransferclearError::TransferAlreadyCompleted(previous.id));
            }
        }

        let player = self.store.player(offer.player)?;
        if !player.listed {
            return Err(TransferclearError::PlayerNotListed(player.id));
        }
        if player.current_club != offer.receiving_club {
            return Err(TransferclearError::Internal(format!(
                "player {} changed owner since the offer was accepted",
                player.id
            )));
        }
        let seller = self.store.club(offer.receiving_club)?;
        let buyer = self.store.club(offer.offering_club)?;

        // Fraud gate over both parties' recent completed history plus the
        // candidate.
        let seller_history: Vec<TransferSample> = self
            .store
            .completed_transfers(seller.id, TransferRole::Seller, self.config.history_window)?
            .iter()
            .map(TransferSample::from_income_history)
            .collect();
        let buyer_history: Vec<TransferSample> = self
            .store
            .completed_transfers(buyer.id, TransferRole::Buyer, self.config.history_window)?
            .iter()
            .map(TransferSample::from_expense_history)
            .collect();
        let proposal = ProposalSample {
            fee: offer.amount,
            market_value: player.market_value,
            income_additional_costs: request.income.agent_commission,
            expense_additional_costs: request.expense.additional_costs(),
        };
        let assessment = self.scorer.assess(&seller_history, &buyer_history, &proposal)?;

        if !assessment.is_legitimate {
            tracing::warn!(
                offer = %offer.id,
                similarity = assessment.similarity,
                tier = %assessment.risk_tier,
                "settlement rejected by fraud gate"
            );
            return Ok(SettlementReport::fraud_rejected(assessment));
        }

        // Persist the transfer and its assessment before touching the
        // ledger, flags unset, so a mid-protocol crash leaves an audit row.
        let transfer = Transfer::new(
            offer.id,
            player.id,
            seller.id,
            buyer.id,
            offer.amount,
            request.income.clone(),
            request.expense.clone(),
            assessment.income_fingerprint.clone(),
            assessment.expense_fingerprint.clone(),
        );
        let assessment = assessment.bound_to(transfer.id);
        self.store.insert_transfer(&transfer, &assessment)?;

        match self.confirm_on_ledger(&transfer, &seller.account, &buyer.account) {
            Ok((ledger_ref, tx_hash)) => {
                let commit = SettlementCommit {
                    transfer_id: transfer.id,
                    ledger_ref,
                    tx_hash,
                    completed_at: Utc::now(),
                    player: player.id,
                    new_owner: buyer.id,
                    selling_club: seller.id,
                    seller_income: request.income.total(),
                    buying_club: buyer.id,
                    buyer_expense: request.expense.total(),
                    notifications: NotificationEmitter::completion_notices(&transfer, &player.name),
                };
                if let Err(error) = self.store.apply_settlement(&commit) {
                    return Ok(self.fail(
                        &transfer,
                        assessment,
                        PipelineFailure {
                            phase: SettlementPhase::Commit,
                            error,
                            reconcile: true,
                            ledger_ref: Some(ledger_ref),
                        },
                    ));
                }
                tracing::info!(
                    transfer = %transfer.id,
                    offer = %offer.id,
                    player = %player.id,
                    ledger = %ledger_ref,
                    "settlement completed"
                );
                Ok(SettlementReport::completed(transfer.id, assessment, ledger_ref))
            }
            Err(failure) => Ok(self.fail(&transfer, assessment, failure)),
        }
    }

    /// Drive the external propose → accept → validate protocol.
    ///
    /// Returns the ledger reference and the final confirmation tx hash.
    fn confirm_on_ledger(
        &self,
        transfer: &Transfer,
        seller: &AccountRef,
        buyer: &AccountRef,
    ) -> PipelineResult<(TransferRef, String)> {
        let timeouts = self.config.timeouts;

        // Propose preconditions: both counterparties known to the ledger,
        // seller able to pay the network.
        for account in [seller, buyer] {
            match self.ledger.is_registered(account) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(PipelineFailure {
                        phase: SettlementPhase::Propose,
                        error: TransferclearError::AccountNotRegistered {
                            account: account.clone(),
                        },
                        reconcile: false,
                        ledger_ref: None,
                    });
                }
                Err(error) => {
                    return Err(PipelineFailure {
                        phase: SettlementPhase::Propose,
                        error,
                        reconcile: false,
                        ledger_ref: None,
                    });
                }
            }
        }
        match self.ledger.spendable_balance(seller) {
            Ok(balance) if balance > Decimal::ZERO => {}
            Ok(_) => {
                return Err(PipelineFailure {
                    phase: SettlementPhase::Propose,
                    error: TransferclearError::NoSpendableBalance {
                        account: seller.clone(),
                    },
                    reconcile: false,
                    ledger_ref: None,
                });
            }
            Err(error) => {
                return Err(PipelineFailure {
                    phase: SettlementPhase::Propose,
                    error,
                    reconcile: false,
                    ledger_ref: None,
                });
            }
        }

        // Step 1: Propose, as the selling club.
        let propose_ack = timed(SettlementPhase::Propose, timeouts.propose_ms, || {
            self.ledger.propose(
                seller,
                buyer,
                transfer.player.numeric_code(),
                transfer.fee,
                &transfer.income_fingerprint,
            )
        })
        .map_err(|error| PipelineFailure {
            // A timeout means the proposal may have landed remotely.
            reconcile: matches!(error, TransferclearError::LedgerTimeout { .. }),
            phase: SettlementPhase::Propose,
            error,
            ledger_ref: None,
        })?;
        let ledger_ref = propose_ack.transfer_ref;

        // From here on, external state exists: every failure needs
        // operator reconciliation.
        let fail_after_propose = |phase: SettlementPhase, error: TransferclearError| {
            PipelineFailure {
                phase,
                error,
                reconcile: true,
                ledger_ref: Some(ledger_ref),
            }
        };

        if let Err(error) = self.store.set_transfer_ledger_ref(transfer.id, ledger_ref) {
            return Err(fail_after_propose(SettlementPhase::Propose, error));
        }

        // Step 2: Accept, as the buying club; remote must still be PROPOSED.
        match self.ledger.transfer_phase(ledger_ref) {
            Ok(RemotePhase::Proposed) => {}
            Ok(actual) => {
                return Err(fail_after_propose(
                    SettlementPhase::Accept,
                    TransferclearError::WrongLedgerPhase {
                        expected: RemotePhase::Proposed,
                        actual,
                    },
                ));
            }
            Err(error) => return Err(fail_after_propose(SettlementPhase::Accept, error)),
        }
        timed(SettlementPhase::Accept, timeouts.accept_ms, || {
            self.ledger
                .accept(ledger_ref, buyer, &transfer.expense_fingerprint)
        })
        .map_err(|error| fail_after_propose(SettlementPhase::Accept, error))?;

        // Step 3: Validate, as the neutral authority; remote must be ACCEPTED.
        match self.ledger.transfer_phase(ledger_ref) {
            Ok(RemotePhase::Accepted) => {}
            Ok(actual) => {
                return Err(fail_after_propose(
                    SettlementPhase::Validate,
                    TransferclearError::WrongLedgerPhase {
                        expected: RemotePhase::Accepted,
                        actual,
                    },
                ));
            }
            Err(error) => return Err(fail_after_propose(SettlementPhase::Validate, error)),
        }
        let validate_ack = timed(SettlementPhase::Validate, timeouts.validate_ms, || {
            self.ledger
                .validate(ledger_ref, &self.config.authority, true)
        })
        .map_err(|error| fail_after_propose(SettlementPhase::Validate, error))?;

        Ok((ledger_ref, validate_ack.tx_hash))
    }

    /// Record a pipeline failure: audit notifications, a warning, and the
    /// terminal report. The transfer row keeps whatever was reached.
    fn fail(
        &self,
        transfer: &Transfer,
        assessment: FraudAssessment,
        failure: PipelineFailure,
    ) -> SettlementReport {
        tracing::warn!(
            transfer = %transfer.id,
            phase = %failure.phase,
            error = %failure.error,
            needs_reconciliation = failure.reconcile,
            "settlement failed"
        );
        if let Err(notify_err) = NotificationEmitter::settlement_failed(
            self.store.as_ref(),
            transfer,
            failure.phase,
            &failure.error.to_string(),
        ) {
            tracing::warn!(
                transfer = %transfer.id,
                error = %notify_err,
                "failed to record settlement-failure notifications"
            );
        }
        SettlementReport {
            state: SettlementState::Failed,
            transfer_id: Some(transfer.id),
            assessment: Some(assessment),
            ledger_ref: failure.ledger_ref,
            failed_phase: Some(failure.phase),
            failure: Some(failure.error),
            needs_reconciliation: failure.reconcile,
        }
    }
}

/// Run an external call under a wall-clock budget. An overrun is a
/// timeout even when the call eventually returned success — the caller
/// treats the remote outcome as unknown.
fn timed<T>(
    phase: SettlementPhase,
    limit_ms: u64,
    call: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let started = Instant::now();
    let outcome = call();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if elapsed_ms > limit_ms {
        return Err(TransferclearError::LedgerTimeout {
            phase,
            elapsed_ms,
            limit_ms,
        });
    }
    outcome
}
