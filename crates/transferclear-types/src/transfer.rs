//! Settlement transfer records and the structured income/expense breakdowns
//! scored by the fraud gate.
//!
//! A [`Transfer`] is created once per settlement attempt, before the external
//! confirmation steps run. It is immutable after creation except for the
//! validation/completion flags and the ledger reference, which are set at
//! most once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClubId, Fingerprint, OfferId, PlayerId, TransferId, TransferRef};

/// Which side of a transfer a club was on. Used to select history when
/// scoring fraud likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferRole {
    Seller,
    Buyer,
}

impl std::fmt::Display for TransferRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seller => write!(f, "SELLER"),
            Self::Buyer => write!(f, "BUYER"),
        }
    }
}

/// Seller-side income breakdown for a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    /// The agreed transfer fee.
    pub transfer_fee: Decimal,
    /// Commission paid to agents out of the fee.
    pub agent_commission: Decimal,
    /// Other income attached to the deal (sell-on clauses, bonuses).
    pub other_income: Decimal,
}

impl IncomeBreakdown {
    /// Fee-only breakdown with no commission or extras.
    #[must_use]
    pub fn fee_only(transfer_fee: Decimal) -> Self {
        Self {
            transfer_fee,
            agent_commission: Decimal::ZERO,
            other_income: Decimal::ZERO,
        }
    }

    /// Net income received by the selling club.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.transfer_fee + self.other_income - self.agent_commission
    }
}

/// Buyer-side expense breakdown for a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    /// The agreed transfer fee.
    pub transfer_fee: Decimal,
    /// Commission paid to agents.
    pub agent_commission: Decimal,
    /// Signing bonus paid to the player.
    pub signing_bonus: Decimal,
    /// Medical examination costs.
    pub medical_costs: Decimal,
    /// Any other costs attached to the deal.
    pub other_costs: Decimal,
}

impl ExpenseBreakdown {
    /// Fee-only breakdown with no additional costs.
    #[must_use]
    pub fn fee_only(transfer_fee: Decimal) -> Self {
        Self {
            transfer_fee,
            agent_commission: Decimal::ZERO,
            signing_bonus: Decimal::ZERO,
            medical_costs: Decimal::ZERO,
            other_costs: Decimal::ZERO,
        }
    }

    /// Gross expense paid by the buying club.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.transfer_fee
            + self.agent_commission
            + self.signing_bonus
            + self.medical_costs
            + self.other_costs
    }

    /// Costs on top of the transfer fee.
    #[must_use]
    pub fn additional_costs(&self) -> Decimal {
        self.total() - self.transfer_fee
    }
}

/// A settlement transfer record.
///
/// The flags and references are write-once: `is_validated`/`is_completed`
/// flip to `true` at most once, and `ledger_ref`/`tx_hash`/`completed_at`
/// are populated at most once. A transfer whose pipeline failed keeps
/// whatever was reached, with `is_completed` left `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique transfer identifier.
    pub id: TransferId,
    /// The accepted offer this settlement attempt resolves.
    pub offer: OfferId,
    /// The player changing clubs.
    pub player: PlayerId,
    /// The selling club (player's owner before settlement).
    pub selling_club: ClubId,
    /// The buying club (owner after settlement completes).
    pub buying_club: ClubId,
    /// The agreed transfer fee.
    pub fee: Decimal,
    /// Seller-side income breakdown.
    pub income: IncomeBreakdown,
    /// Buyer-side expense breakdown.
    pub expense: ExpenseBreakdown,
    /// Fingerprint of the seller's income pattern.
    pub income_fingerprint: Fingerprint,
    /// Fingerprint of the buyer's expense pattern.
    pub expense_fingerprint: Fingerprint,
    /// Set when the neutral authority validated the transfer on the ledger.
    pub is_validated: bool,
    /// Set when the local atomic commit applied.
    pub is_completed: bool,
    /// The external ledger's transfer sequence, once Propose succeeded.
    pub ledger_ref: Option<TransferRef>,
    /// The external transaction hash of the final confirmation step.
    pub tx_hash: Option<String>,
    /// When settlement completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When this settlement attempt started.
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    /// Build a fresh, unconfirmed transfer record for a settlement attempt.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        offer: OfferId,
        player: PlayerId,
        selling_club: ClubId,
        buying_club: ClubId,
        fee: Decimal,
        income: IncomeBreakdown,
        expense: ExpenseBreakdown,
        income_fingerprint: Fingerprint,
        expense_fingerprint: Fingerprint,
    ) -> Self {
        Self {
            id: TransferId::new(),
            offer,
            player,
            selling_club,
            buying_club,
            fee,
            income,
            expense,
            income_fingerprint,
            expense_fingerprint,
            is_validated: false,
            is_completed: false,
            ledger_ref: None,
            tx_hash: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_total_nets_commission() {
        let income = IncomeBreakdown {
            transfer_fee: Decimal::new(1_000_000, 0),
            agent_commission: Decimal::new(50_000, 0),
            other_income: Decimal::new(10_000, 0),
        };
        assert_eq!(income.total(), Decimal::new(960_000, 0));
    }

    #[test]
    fn expense_total_sums_all_costs() {
        let expense = ExpenseBreakdown {
            transfer_fee: Decimal::new(1_000_000, 0),
            agent_commission: Decimal::new(30_000, 0),
            signing_bonus: Decimal::new(15_000, 0),
            medical_costs: Decimal::new(5_000, 0),
            other_costs: Decimal::ZERO,
        };
        assert_eq!(expense.total(), Decimal::new(1_050_000, 0));
        assert_eq!(expense.additional_costs(), Decimal::new(50_000, 0));
    }

    #[test]
    fn fee_only_breakdowns() {
        let fee = Decimal::new(500_000, 0);
        assert_eq!(IncomeBreakdown::fee_only(fee).total(), fee);
        let expense = ExpenseBreakdown::fee_only(fee);
        assert_eq!(expense.total(), fee);
        assert_eq!(expense.additional_costs(), Decimal::ZERO);
    }

    #[test]
    fn new_transfer_is_unconfirmed() {
        let fee = Decimal::new(100_000, 0);
        let transfer = Transfer::new(
            OfferId::new(),
            PlayerId::new(),
            ClubId::new(),
            ClubId::new(),
            fee,
            IncomeBreakdown::fee_only(fee),
            ExpenseBreakdown::fee_only(fee),
            Fingerprint::from_bits(&[true; 10]),
            Fingerprint::from_bits(&[false; 10]),
        );
        assert!(!transfer.is_validated);
        assert!(!transfer.is_completed);
        assert!(transfer.ledger_ref.is_none());
        assert!(transfer.tx_hash.is_none());
        assert!(transfer.completed_at.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let fee = Decimal::new(100_000, 0);
        let transfer = Transfer::new(
            OfferId::new(),
            PlayerId::new(),
            ClubId::new(),
            ClubId::new(),
            fee,
            IncomeBreakdown::fee_only(fee),
            ExpenseBreakdown::fee_only(fee),
            Fingerprint::from_bits(&[true; 10]),
            Fingerprint::from_bits(&[false; 10]),
        );
        let json = serde_json::to_string(&transfer).unwrap();
        let back: Transfer = serde_json::from_str(&json).unwrap();
        assert_eq!(transfer.id, back.id);
        assert_eq!(transfer.fee, back.fee);
        assert_eq!(transfer.income_fingerprint, back.income_fingerprint);
    }
}
