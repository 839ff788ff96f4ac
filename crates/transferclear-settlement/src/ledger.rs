//! The external confirmation-ledger contract and an in-memory simulator.
//!
//! The real ledger is an at-least-once, possibly-slow, possibly-failing
//! RPC peer whose consensus mechanics are out of scope. The engine treats
//! it through [`ConfirmationLedger`]: three queries it uses to check
//! preconditions, and the three confirmation calls themselves.
//!
//! [`MemoryLedger`] models the remote transfer state machine
//! (`PROPOSED → ACCEPTED → COMPLETED`, or `REJECTED`) together with the
//! failure modes tests need to inject: outages, per-step scripted
//! failures, and latency.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rust_decimal::Decimal;
use transferclear_types::{
    AccountRef, Fingerprint, RemotePhase, Result, SettlementPhase, TransferRef,
    TransferclearError,
};

/// Acknowledgement of a successful Propose call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeAck {
    /// The ledger's sequence number for the new transfer.
    pub transfer_ref: TransferRef,
    /// Transaction hash of the propose step.
    pub tx_hash: String,
}

/// Acknowledgement of a successful Accept call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptAck {
    /// Transaction hash of the accept step.
    pub tx_hash: String,
}

/// Acknowledgement of a successful Validate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateAck {
    /// Transaction hash of the validate step.
    pub tx_hash: String,
}

/// Client contract for the external confirmation ledger.
///
/// Implementations are shared across concurrent settlements; all methods
/// take `&self`. The three confirmation calls may block for network and
/// consensus latency — the coordinator bounds each with a timeout.
pub trait ConfirmationLedger: Send + Sync {
    /// Whether an account is known/registered on the ledger.
    fn is_registered(&self, account: &AccountRef) -> Result<bool>;

    /// The account's spendable balance on the ledger.
    fn spendable_balance(&self, account: &AccountRef) -> Result<Decimal>;

    /// The remote-reported phase of a transfer.
    fn transfer_phase(&self, transfer_ref: TransferRef) -> Result<RemotePhase>;

    /// Step 1 — register intent, executed as the selling club.
    fn propose(
        &self,
        seller: &AccountRef,
        buyer: &AccountRef,
        player_code: u64,
        fee: Decimal,
        income_fingerprint: &Fingerprint,
    ) -> Result<ProposeAck>;

    /// Step 2 — confirm the proposal, executed as the buying club.
    /// Requires the remote transfer to be in `PROPOSED` phase.
    fn accept(
        &self,
        transfer_ref: TransferRef,
        buyer: &AccountRef,
        expense_fingerprint: &Fingerprint,
    ) -> Result<AcceptAck>;

    /// Step 3 — neutral-authority verdict. Requires `ACCEPTED` phase and
    /// may only be invoked by the designated authority account.
    fn validate(
        &self,
        transfer_ref: TransferRef,
        authority: &AccountRef,
        legitimate: bool,
    ) -> Result<ValidateAck>;
}

#[derive(Debug, Clone)]
struct RemoteTransfer {
    seller: AccountRef,
    buyer: AccountRef,
    #[allow(dead_code)]
    player_code: u64,
    #[allow(dead_code)]
    fee: Decimal,
    #[allow(dead_code)]
    income_fingerprint: Fingerprint,
    expense_fingerprint: Option<Fingerprint>,
    phase: RemotePhase,
}

#[derive(Debug, Default)]
struct LedgerInner {
    accounts: HashMap<AccountRef, Decimal>,
    transfers: HashMap<u64, RemoteTransfer>,
    next_ref: u64,
    outage: Option<String>,
    scripted_failures: HashMap<SettlementPhase, String>,
}

/// In-memory confirmation ledger simulating the remote state machine.
pub struct MemoryLedger {
    authority: AccountRef,
    latency: Mutex<Option<Duration>>,
    inner: Mutex<LedgerInner>,
}

impl MemoryLedger {
    /// Ledger whose Validate step only `authority` may execute.
    #[must_use]
    pub fn new(authority: AccountRef) -> Self {
        Self {
            authority,
            latency: Mutex::new(None),
            inner: Mutex::new(LedgerInner {
                next_ref: 1,
                ..LedgerInner::default()
            }),
        }
    }

    /// Register an account with a spendable balance.
    pub fn register_account(&self, account: &AccountRef, balance: Decimal) -> Result<()> {
        self.lock()?.accounts.insert(account.clone(), balance);
        Ok(())
    }

    /// Simulate a full outage (`None` clears it). While set, every call
    /// fails with [`TransferclearError::LedgerUnavailable`].
    pub fn set_outage(&self, reason: Option<&str>) -> Result<()> {
        self.lock()?.outage = reason.map(str::to_string);
        Ok(())
    }

    /// Script the next calls of one confirmation step to fail.
    pub fn script_failure(&self, phase: SettlementPhase, reason: Option<&str>) -> Result<()> {
        let mut inner = self.lock()?;
        match reason {
            Some(reason) => {
                inner.scripted_failures.insert(phase, reason.to_string());
            }
            None => {
                inner.scripted_failures.remove(&phase);
            }
        }
        Ok(())
    }

    /// Add artificial latency to each confirmation call.
    pub fn set_latency(&self, latency: Option<Duration>) -> Result<()> {
        *self
            .latency
            .lock()
            .map_err(|_| Self::poisoned())? = latency;
        Ok(())
    }

    /// Number of transfers the ledger has seen.
    pub fn transfer_count(&self) -> Result<u64> {
        Ok(self.lock()?.next_ref - 1)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerInner>> {
        self.inner.lock().map_err(|_| Self::poisoned())
    }

    fn poisoned() -> TransferclearError {
        TransferclearError::LedgerUnavailable {
            reason: "ledger lock poisoned".to_string(),
        }
    }

    fn simulate_latency(&self) {
        let latency = self.latency.lock().ok().and_then(|l| *l);
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }
    }

    fn check_outage(inner: &LedgerInner) -> Result<()> {
        if let Some(reason) = &inner.outage {
            return Err(TransferclearError::LedgerUnavailable {
                reason: reason.clone(),
            });
        }
        Ok(())
    }

    fn check_script(inner: &LedgerInner, phase: SettlementPhase) -> Result<()> {
        if let Some(reason) = inner.scripted_failures.get(&phase) {
            return Err(TransferclearError::LedgerUnavailable {
                reason: reason.clone(),
            });
        }
        Ok(())
    }

    fn tx_hash(step: &str, transfer_ref: u64) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"transferclear:ledger_tx:v1:");
        hasher.update(step.as_bytes());
        hasher.update(transfer_ref.to_le_bytes());
        format!("0x{}", hex::encode(&hasher.finalize()[..8]))
    }
}

impl ConfirmationLedger for MemoryLedger {
    fn is_registered(&self, account: &AccountRef) -> Result<bool> {
        let inner = self.lock()?;
        Self::check_outage(&inner)?;
        Ok(inner.accounts.contains_key(account))
    }

    fn spendable_balance(&self, account: &AccountRef) -> Result<Decimal> {
        let inner = self.lock()?;
        Self::check_outage(&inner)?;
        inner
            .accounts
            .get(account)
            .copied()
            .ok_or_else(|| TransferclearError::AccountNotRegistered {
                account: account.clone(),
            })
    }

    fn transfer_phase(&self, transfer_ref: TransferRef) -> Result<RemotePhase> {
        let inner = self.lock()?;
        Self::check_outage(&inner)?;
        inner
            .transfers
            .get(&transfer_ref.0)
            .map(|t| t.phase)
            .ok_or(TransferclearError::UnknownLedgerTransfer(transfer_ref))
    }

    fn propose(
        &self,
        seller: &AccountRef,
        buyer: &AccountRef,
        player_code: u64,
        fee: Decimal,
        income_fingerprint: &Fingerprint,
    ) -> Result<ProposeAck> {
        self.simulate_latency();
        let mut inner = self.lock()?;
        Self::check_outage(&inner)?;
        Self::check_script(&inner, SettlementPhase::Propose)?;

        for account in [seller, buyer] {
            if !inner.accounts.contains_key(account) {
                return Err(TransferclearError::AccountNotRegistered {
                    account: account.clone(),
                });
            }
        }
        let seller_balance = inner.accounts[seller];
        if seller_balance <= Decimal::ZERO {
            return Err(TransferclearError::NoSpendableBalance {
                account: seller.clone(),
            });
        }

        let transfer_ref = inner.next_ref;
        inner.next_ref += 1;
        inner.transfers.insert(
            transfer_ref,
            RemoteTransfer {
                seller: seller.clone(),
                buyer: buyer.clone(),
                player_code,
                fee,
                income_fingerprint: income_fingerprint.clone(),
                expense_fingerprint: None,
                phase: RemotePhase::Proposed,
            },
        );
        Ok(ProposeAck {
            transfer_ref: TransferRef(transfer_ref),
            tx_hash: Self::tx_hash("propose", transfer_ref),
        })
    }

    fn accept(
        &self,
        transfer_ref: TransferRef,
        buyer: &AccountRef,
        expense_fingerprint: &Fingerprint,
    ) -> Result<AcceptAck> {
        self.simulate_latency();
        let mut inner = self.lock()?;
        Self::check_outage(&inner)?;
        Self::check_script(&inner, SettlementPhase::Accept)?;

        let transfer = inner
            .transfers
            .get_mut(&transfer_ref.0)
            .ok_or(TransferclearError::UnknownLedgerTransfer(transfer_ref))?;
        if transfer.phase != RemotePhase::Proposed {
            return Err(TransferclearError::WrongLedgerPhase {
                expected: RemotePhase::Proposed,
                actual: transfer.phase,
            });
        }
        if &transfer.buyer != buyer {
            return Err(TransferclearError::LedgerPreconditionFailed {
                phase: SettlementPhase::Accept,
                reason: format!("account {buyer} is not the proposed buyer"),
            });
        }
        transfer.expense_fingerprint = Some(expense_fingerprint.clone());
        transfer.phase = RemotePhase::Accepted;
        Ok(AcceptAck {
            tx_hash: Self::tx_hash("accept", transfer_ref.0),
        })
    }

    fn validate(
        &self,
        transfer_ref: TransferRef,
        authority: &AccountRef,
        legitimate: bool,
    ) -> Result<ValidateAck> {
        self.simulate_latency();
        let mut inner = self.lock()?;
        Self::check_outage(&inner)?;
        Self::check_script(&inner, SettlementPhase::Validate)?;

        if authority != &self.authority {
            return Err(TransferclearError::UnauthorizedValidator {
                account: authority.clone(),
            });
        }
        let transfer = inner
            .transfers
            .get_mut(&transfer_ref.0)
            .ok_or(TransferclearError::UnknownLedgerTransfer(transfer_ref))?;
        if transfer.phase != RemotePhase::Accepted {
            return Err(TransferclearError::WrongLedgerPhase {
                expected: RemotePhase::Accepted,
                actual: transfer.phase,
            });
        }
        transfer.phase = if legitimate {
            RemotePhase::Completed
        } else {
            RemotePhase::Rejected
        };
        Ok(ValidateAck {
            tx_hash: Self::tx_hash("validate", transfer_ref.0),
        })
    }
}
