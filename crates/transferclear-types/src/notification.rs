//! Notification records: the append-only audit trail of offer and
//! settlement transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClubId, NotificationId, OfferId, TransferId};

/// What kind of event a notification records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A club received a transfer offer for one of its listed players.
    OfferReceived,
    /// An offer made by this club was accepted.
    OfferAccepted,
    /// An offer made by this club was rejected.
    OfferRejected,
    /// A settlement involving this club completed.
    TransferCompleted,
    /// A settlement involving this club failed.
    TransferFailed,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OfferReceived => write!(f, "OFFER_RECEIVED"),
            Self::OfferAccepted => write!(f, "OFFER_ACCEPTED"),
            Self::OfferRejected => write!(f, "OFFER_REJECTED"),
            Self::TransferCompleted => write!(f, "TRANSFER_COMPLETED"),
            Self::TransferFailed => write!(f, "TRANSFER_FAILED"),
        }
    }
}

/// A single audit notification addressed to a club.
///
/// Notifications are append-only; the only mutation the store permits is
/// flipping `read` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The club this notification is addressed to.
    pub club: ClubId,
    /// Event category.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Human-readable body.
    pub body: String,
    /// The offer that triggered this notification, if any.
    pub offer: Option<OfferId>,
    /// The transfer that triggered this notification, if any.
    pub transfer: Option<TransferId>,
    /// Whether the club has read the notification.
    pub read: bool,
    /// When the notification was recorded.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification.
    #[must_use]
    pub fn new(
        club: ClubId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            club,
            kind,
            title: title.into(),
            body: body.into(),
            offer: None,
            transfer: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Attach the triggering offer.
    #[must_use]
    pub fn about_offer(mut self, offer: OfferId) -> Self {
        self.offer = Some(offer);
        self
    }

    /// Attach the triggering transfer.
    #[must_use]
    pub fn about_transfer(mut self, transfer: TransferId) -> Self {
        self.transfer = Some(transfer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_is_unread() {
        let n = Notification::new(
            ClubId::new(),
            NotificationKind::OfferReceived,
            "Offer received",
            "Rovers bid 250000 for J. Doe",
        );
        assert!(!n.read);
        assert!(n.offer.is_none());
        assert!(n.transfer.is_none());
    }

    #[test]
    fn builders_attach_references() {
        let offer = OfferId::new();
        let transfer = TransferId::new();
        let n = Notification::new(
            ClubId::new(),
            NotificationKind::TransferCompleted,
            "Transfer completed",
            "done",
        )
        .about_offer(offer)
        .about_transfer(transfer);
        assert_eq!(n.offer, Some(offer));
        assert_eq!(n.transfer, Some(transfer));
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", NotificationKind::OfferReceived), "OFFER_RECEIVED");
        assert_eq!(
            format!("{}", NotificationKind::TransferCompleted),
            "TRANSFER_COMPLETED"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let n = Notification::new(
            ClubId::new(),
            NotificationKind::OfferRejected,
            "Offer rejected",
            "no deal",
        );
        let json = serde_json::to_string(&n).unwrap();
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(n.id, back.id);
        assert_eq!(n.kind, back.kind);
    }
}
