//! The `LedgerStore` trait and the atomic settlement commit unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use transferclear_types::{
    Club, ClubId, FraudAssessment, Notification, NotificationId, OfferId, OfferStatus, Player,
    PlayerId, Result, Transfer, TransferId, TransferOffer, TransferRef, TransferRole,
};

/// Every mutation a completed settlement applies, presented to the store
/// as one unit.
///
/// Adapters must apply the whole commit atomically: flags and references
/// on the transfer row, the ownership change, both balance adjustments,
/// and the completion notifications either all become visible or none do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCommit {
    /// The transfer being completed.
    pub transfer_id: TransferId,
    /// The external ledger's transfer sequence.
    pub ledger_ref: TransferRef,
    /// Transaction hash of the final confirmation step.
    pub tx_hash: String,
    /// Completion timestamp recorded on the transfer.
    pub completed_at: DateTime<Utc>,
    /// The player changing owner.
    pub player: PlayerId,
    /// The player's new owning club.
    pub new_owner: ClubId,
    /// The selling club, credited with `seller_income`.
    pub selling_club: ClubId,
    /// Total income credited to the seller's balance and budget.
    pub seller_income: Decimal,
    /// The buying club, debited with `buyer_expense`.
    pub buying_club: ClubId,
    /// Total expense debited from the buyer's balance and budget.
    pub buyer_expense: Decimal,
    /// Completion notifications recorded with the commit.
    pub notifications: Vec<Notification>,
}

/// Narrow read/write facade over the persistent store.
///
/// Implementations are shared across concurrent settlements, so all
/// methods take `&self`; adapters use interior locking. Reads may run
/// concurrently with settlements — every engine-internal mutation is
/// confined to explicit write methods and [`Self::apply_settlement`].
pub trait LedgerStore: Send + Sync {
    // --- reads -----------------------------------------------------------

    /// Fetch a club by id.
    fn club(&self, id: ClubId) -> Result<Club>;

    /// Fetch a player by id.
    fn player(&self, id: PlayerId) -> Result<Player>;

    /// Fetch an offer by id.
    fn offer(&self, id: OfferId) -> Result<TransferOffer>;

    /// All offers still in `Pending` status.
    fn pending_offers(&self) -> Result<Vec<TransferOffer>>;

    /// Fetch a transfer by id.
    fn transfer(&self, id: TransferId) -> Result<Transfer>;

    /// The most recent settlement attempt for an offer, if any.
    fn transfer_for_offer(&self, offer: OfferId) -> Result<Option<Transfer>>;

    /// Up to `limit` most recent **completed** transfers in which `club`
    /// played `role`, newest first.
    fn completed_transfers(
        &self,
        club: ClubId,
        role: TransferRole,
        limit: usize,
    ) -> Result<Vec<Transfer>>;

    /// The assessment persisted with a transfer, if any.
    fn assessment_for_transfer(&self, id: TransferId) -> Result<Option<FraudAssessment>>;

    /// Notifications addressed to a club, newest first.
    fn notifications(&self, club: ClubId, unread_only: bool) -> Result<Vec<Notification>>;

    // --- writes ----------------------------------------------------------

    /// Provision a club.
    fn insert_club(&self, club: &Club) -> Result<()>;

    /// Provision a player.
    fn insert_player(&self, player: &Player) -> Result<()>;

    /// Toggle a player's transfer listing.
    fn set_player_listed(&self, id: PlayerId, listed: bool) -> Result<()>;

    /// Insert a new offer.
    fn insert_offer(&self, offer: &TransferOffer) -> Result<()>;

    /// Advance an offer's status. Adapters reject non-monotonic
    /// transitions.
    fn update_offer_status(&self, id: OfferId, status: OfferStatus) -> Result<()>;

    /// Insert a transfer and its fraud assessment as one unit.
    fn insert_transfer(&self, transfer: &Transfer, assessment: &FraudAssessment) -> Result<()>;

    /// Record the external ledger reference once Propose succeeded.
    fn set_transfer_ledger_ref(&self, id: TransferId, ledger_ref: TransferRef) -> Result<()>;

    /// Append a notification.
    fn insert_notification(&self, notification: &Notification) -> Result<()>;

    /// Mark a notification as read.
    fn mark_notification_read(&self, id: NotificationId) -> Result<()>;

    /// Apply a completed settlement as a single atomic unit.
    ///
    /// # Errors
    /// Adapters must validate every target before mutating anything, so a
    /// failure — missing row, already-completed transfer, storage fault —
    /// leaves the store exactly as it was.
    fn apply_settlement(&self, commit: &SettlementCommit) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use transferclear_types::NotificationKind;

    use super::*;

    #[test]
    fn settlement_commit_serde_roundtrip() {
        let commit = SettlementCommit {
            transfer_id: TransferId::new(),
            ledger_ref: TransferRef(3),
            tx_hash: "0xfeed".to_string(),
            completed_at: Utc::now(),
            player: PlayerId::new(),
            new_owner: ClubId::new(),
            selling_club: ClubId::new(),
            seller_income: Decimal::new(960_000, 0),
            buying_club: ClubId::new(),
            buyer_expense: Decimal::new(1_050_000, 0),
            notifications: vec![Notification::new(
                ClubId::new(),
                NotificationKind::TransferCompleted,
                "Transfer completed",
                "done",
            )],
        };
        let json = serde_json::to_string(&commit).unwrap();
        let back: SettlementCommit = serde_json::from_str(&json).unwrap();
        assert_eq!(commit.transfer_id, back.transfer_id);
        assert_eq!(commit.seller_income, back.seller_income);
        assert_eq!(back.notifications.len(), 1);
    }

    #[test]
    fn trait_is_object_safe() {
        // The coordinator and emitter take `&dyn LedgerStore`.
        fn _takes_dyn(_store: &dyn LedgerStore) {}
    }
}
