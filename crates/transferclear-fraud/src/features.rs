//! Feature vectorization of transfer records.
//!
//! Each record contributes a triple to a flat feature vector:
//! - income side: `[fee, market_value, fee / max(market_value, 1)]`
//! - expense side: `[fee, additional_costs, fee + additional_costs]`
//!
//! Missing or malformed fields are never fatal: the vectorizer substitutes
//! conservative estimates (market value ≈ 110% of fee, additional costs
//! ≈ 5% of fee) so a party with sparse bookkeeping can still be scored.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use transferclear_types::Transfer;

/// Estimated market value as a share of the fee, for history records that
/// never stored a valuation: 110%.
const ESTIMATED_MARKET_VALUE_RATIO: f64 = 1.1;

/// Conservative additional-costs estimate as a share of the fee: 5%.
const ESTIMATED_ADDITIONAL_COSTS_RATIO: f64 = 0.05;

/// One scoring input: a historical transfer or the current candidate,
/// reduced to the three fields the vectorizer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSample {
    /// The transfer fee.
    pub fee: Decimal,
    /// The player's market valuation at transfer time.
    pub market_value: Decimal,
    /// Costs (income side: agent commission; expense side: costs on top
    /// of the fee).
    pub additional_costs: Decimal,
}

impl TransferSample {
    #[must_use]
    pub fn new(fee: Decimal, market_value: Decimal, additional_costs: Decimal) -> Self {
        Self {
            fee,
            market_value,
            additional_costs,
        }
    }

    /// Seller-side sample from a completed historical transfer.
    ///
    /// Valuation at transfer time is not recorded, so it is estimated from
    /// the fee the way the additional costs come from the stored income
    /// breakdown.
    #[must_use]
    pub fn from_income_history(transfer: &Transfer) -> Self {
        Self {
            fee: transfer.fee,
            market_value: Decimal::ZERO, // estimated during vectorization
            additional_costs: transfer.income.agent_commission,
        }
    }

    /// Buyer-side sample from a completed historical transfer.
    #[must_use]
    pub fn from_expense_history(transfer: &Transfer) -> Self {
        Self {
            fee: transfer.fee,
            market_value: Decimal::ZERO, // estimated during vectorization
            additional_costs: transfer.expense.additional_costs(),
        }
    }
}

/// The candidate transfer, carrying side-specific additional costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSample {
    /// The agreed transfer fee.
    pub fee: Decimal,
    /// The player's current market valuation.
    pub market_value: Decimal,
    /// Seller-side additional costs (agent commission).
    pub income_additional_costs: Decimal,
    /// Buyer-side additional costs (total expense minus the fee).
    pub expense_additional_costs: Decimal,
}

impl ProposalSample {
    /// The seller-side view of the candidate.
    #[must_use]
    pub fn income_sample(&self) -> TransferSample {
        TransferSample::new(self.fee, self.market_value, self.income_additional_costs)
    }

    /// The buyer-side view of the candidate.
    #[must_use]
    pub fn expense_sample(&self) -> TransferSample {
        TransferSample::new(self.fee, self.market_value, self.expense_additional_costs)
    }
}

fn to_feature(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Market value with the conservative estimate applied when the stored
/// value is absent or nonsensical.
fn effective_market_value(fee: f64, market_value: f64) -> f64 {
    if market_value > 0.0 && market_value.is_finite() {
        market_value
    } else {
        fee * ESTIMATED_MARKET_VALUE_RATIO
    }
}

/// Additional costs with the conservative estimate applied when absent or
/// nonsensical.
fn effective_additional_costs(fee: f64, additional: f64) -> f64 {
    if additional >= 0.0 && additional.is_finite() {
        additional
    } else {
        fee * ESTIMATED_ADDITIONAL_COSTS_RATIO
    }
}

/// Flatten seller-side samples into the income feature vector.
///
/// Three features per sample: fee, market value, fee-to-value ratio.
/// An empty sample list degenerates to `[0, 0, 0]`.
#[must_use]
pub fn income_vector(samples: &[TransferSample]) -> Vec<f64> {
    if samples.is_empty() {
        return vec![0.0, 0.0, 0.0];
    }
    let mut vector = Vec::with_capacity(samples.len() * 3);
    for sample in samples {
        let fee = to_feature(sample.fee);
        let market_value = effective_market_value(fee, to_feature(sample.market_value));
        vector.push(fee);
        vector.push(market_value);
        vector.push(fee / market_value.max(1.0));
    }
    vector
}

/// Flatten buyer-side samples into the expense feature vector.
///
/// Three features per sample: fee, additional costs, total cost.
/// An empty sample list degenerates to `[0, 0, 0]`.
#[must_use]
pub fn expense_vector(samples: &[TransferSample]) -> Vec<f64> {
    if samples.is_empty() {
        return vec![0.0, 0.0, 0.0];
    }
    let mut vector = Vec::with_capacity(samples.len() * 3);
    for sample in samples {
        let fee = to_feature(sample.fee);
        let additional = effective_additional_costs(fee, to_feature(sample.additional_costs));
        vector.push(fee);
        vector.push(additional);
        vector.push(fee + additional);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fee: i64, market_value: i64, additional: i64) -> TransferSample {
        TransferSample::new(
            Decimal::new(fee, 0),
            Decimal::new(market_value, 0),
            Decimal::new(additional, 0),
        )
    }

    #[test]
    fn empty_history_degenerates_to_zero_triple() {
        assert_eq!(income_vector(&[]), vec![0.0, 0.0, 0.0]);
        assert_eq!(expense_vector(&[]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn income_triple_layout() {
        let v = income_vector(&[sample(1_000_000, 2_000_000, 50_000)]);
        assert_eq!(v.len(), 3);
        assert!((v[0] - 1_000_000.0).abs() < f64::EPSILON);
        assert!((v[1] - 2_000_000.0).abs() < f64::EPSILON);
        assert!((v[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expense_triple_layout() {
        let v = expense_vector(&[sample(1_000_000, 1_000_000, 50_000)]);
        assert_eq!(v, vec![1_000_000.0, 50_000.0, 1_050_000.0]);
    }

    #[test]
    fn three_features_per_sample() {
        let samples = vec![sample(100, 110, 5), sample(200, 220, 10), sample(300, 330, 15)];
        assert_eq!(income_vector(&samples).len(), 9);
        assert_eq!(expense_vector(&samples).len(), 9);
    }

    #[test]
    fn missing_market_value_is_estimated() {
        let v = income_vector(&[sample(1_000_000, 0, 0)]);
        assert!((v[1] - 1_100_000.0).abs() < 1e-6, "got {}", v[1]);
    }

    #[test]
    fn negative_additional_costs_are_estimated() {
        let v = expense_vector(&[sample(1_000_000, 0, -1)]);
        assert!((v[1] - 50_000.0).abs() < 1e-6, "got {}", v[1]);
    }

    #[test]
    fn ratio_guard_avoids_division_blowup() {
        // Tiny market value: divisor is clamped to at least 1.
        let v = income_vector(&[TransferSample::new(
            Decimal::new(100, 0),
            Decimal::new(1, 2), // 0.01
            Decimal::ZERO,
        )]);
        assert!((v[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn proposal_sample_sides() {
        let proposal = ProposalSample {
            fee: Decimal::new(1_000_000, 0),
            market_value: Decimal::new(1_000_000, 0),
            income_additional_costs: Decimal::new(50_000, 0),
            expense_additional_costs: Decimal::new(80_000, 0),
        };
        assert_eq!(
            proposal.income_sample().additional_costs,
            Decimal::new(50_000, 0)
        );
        assert_eq!(
            proposal.expense_sample().additional_costs,
            Decimal::new(80_000, 0)
        );
        assert_eq!(proposal.income_sample().fee, proposal.expense_sample().fee);
    }

    #[test]
    fn history_sample_constructors() {
        use transferclear_types::{
            ClubId, ExpenseBreakdown, Fingerprint, IncomeBreakdown, OfferId, PlayerId, Transfer,
        };
        let fee = Decimal::new(500_000, 0);
        let mut income = IncomeBreakdown::fee_only(fee);
        income.agent_commission = Decimal::new(25_000, 0);
        let mut expense = ExpenseBreakdown::fee_only(fee);
        expense.signing_bonus = Decimal::new(40_000, 0);
        let transfer = Transfer::new(
            OfferId::new(),
            PlayerId::new(),
            ClubId::new(),
            ClubId::new(),
            fee,
            income,
            expense,
            Fingerprint::from_bits(&[true; 10]),
            Fingerprint::from_bits(&[true; 10]),
        );

        let seller = TransferSample::from_income_history(&transfer);
        assert_eq!(seller.fee, fee);
        assert_eq!(seller.additional_costs, Decimal::new(25_000, 0));

        let buyer = TransferSample::from_expense_history(&transfer);
        assert_eq!(buyer.additional_costs, Decimal::new(40_000, 0));
    }
}
