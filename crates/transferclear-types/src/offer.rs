//! Transfer offer records and their lifecycle status.
//!
//! Offers are created by the registry and resolved exactly once. Status is
//! **monotonic** — there is no transition back to `Pending`.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClubId, OfferId, PlayerId};

/// Lifecycle status of a transfer offer.
///
/// Transitions are monotonic:
/// - `Pending → Accepted` (receiving club agrees)
/// - `Pending → Rejected` (receiving club declines)
/// - `Pending → Expired` (TTL elapsed before resolution)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl OfferStatus {
    /// Can this offer transition to the given target status?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Accepted | Self::Rejected | Self::Expired
            )
        )
    }

    /// Whether the offer has been resolved (no further transitions).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        *self != Self::Pending
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// An offer from one club for another club's listed player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOffer {
    /// Unique offer identifier.
    pub id: OfferId,
    /// The player the offer is for.
    pub player: PlayerId,
    /// The club making the offer (prospective buyer).
    pub offering_club: ClubId,
    /// The player's current club at offer time (prospective seller).
    pub receiving_club: ClubId,
    /// Offered transfer fee.
    pub amount: Decimal,
    /// Free-text additional terms.
    pub terms: String,
    /// Current lifecycle status.
    pub status: OfferStatus,
    /// When the offer was created.
    pub created_at: DateTime<Utc>,
    /// When the offer lapses if still pending.
    pub expires_at: DateTime<Utc>,
}

impl TransferOffer {
    /// Build a new pending offer valid for `ttl_days`.
    #[must_use]
    pub fn new(
        player: PlayerId,
        offering_club: ClubId,
        receiving_club: ClubId,
        amount: Decimal,
        terms: impl Into<String>,
        ttl_days: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OfferId::new(),
            player,
            offering_club,
            receiving_club,
            amount,
            terms: terms.into(),
            status: OfferStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(ttl_days),
        }
    }

    /// Whether the offer's TTL has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
