//! Club records: the two counterparties of every transfer.
//!
//! Balance and transfer budget are the only mutable financial fields in the
//! engine, and they are written exclusively inside the settlement commit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountRef, ClubId};

/// A club holding player contracts and a spending budget.
///
/// `transfer_budget` is a separate spending ceiling for offers; the engine
/// does **not** enforce `budget <= balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    /// Unique club identifier.
    pub id: ClubId,
    /// Human-readable club name.
    pub name: String,
    /// Account handle on the external confirmation ledger.
    pub account: AccountRef,
    /// Cash balance.
    pub balance: Decimal,
    /// Spending ceiling for new transfer offers.
    pub transfer_budget: Decimal,
}

impl Club {
    /// Whether this club's budget covers an offer of `amount`.
    #[must_use]
    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount <= self.transfer_budget
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Club {
    pub fn dummy(name: &str, budget: Decimal) -> Self {
        Self {
            id: ClubId::new(),
            name: name.to_string(),
            account: AccountRef::new(format!("acct:{name}")),
            balance: budget,
            transfer_budget: budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_check_inclusive() {
        let club = Club::dummy("Rovers", Decimal::new(100_000, 0));
        assert!(club.can_afford(Decimal::new(100_000, 0)));
        assert!(!club.can_afford(Decimal::new(100_001, 0)));
    }

    #[test]
    fn budget_independent_of_balance() {
        let mut club = Club::dummy("Rovers", Decimal::new(100_000, 0));
        club.balance = Decimal::ZERO;
        // Budget is a ceiling, not a balance check.
        assert!(club.can_afford(Decimal::new(50_000, 0)));
    }

    #[test]
    fn serde_roundtrip() {
        let club = Club::dummy("Athletic", Decimal::new(5_000_000, 0));
        let json = serde_json::to_string(&club).unwrap();
        let back: Club = serde_json::from_str(&json).unwrap();
        assert_eq!(club.id, back.id);
        assert_eq!(club.transfer_budget, back.transfer_budget);
    }
}
