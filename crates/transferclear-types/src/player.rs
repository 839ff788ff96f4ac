//! Player contract records.
//!
//! A player is owned by exactly one club at a time. Ownership is reassigned
//! exactly once per completed settlement, inside the atomic commit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClubId, PlayerId};

/// A player contract: the scarce asset the engine transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier.
    pub id: PlayerId,
    /// Human-readable player name.
    pub name: String,
    /// The club that currently owns the contract.
    pub current_club: ClubId,
    /// Current market valuation.
    pub market_value: Decimal,
    /// Whether the player is listed for transfer (eligible for offers).
    pub listed: bool,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Player {
    pub fn dummy(name: &str, club: ClubId, market_value: Decimal) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.to_string(),
            current_club: club,
            market_value,
            listed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let player = Player::dummy("N. Keita", ClubId::new(), Decimal::new(1_000_000, 0));
        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player.id, back.id);
        assert_eq!(player.current_club, back.current_club);
        assert!(back.listed);
    }
}
