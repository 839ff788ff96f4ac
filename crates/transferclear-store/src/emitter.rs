//! Notification emitter: records the audit trail of offer and settlement
//! transitions through the store.
//!
//! Offer and failure events are inserted immediately. Completion notices
//! are *built* here but inserted by the settlement commit itself, so they
//! become visible atomically with the balance and ownership changes.

use transferclear_types::{
    Notification, NotificationKind, Result, SettlementPhase, Transfer, TransferOffer,
};

use crate::store::LedgerStore;

/// Builds and records audit notifications.
pub struct NotificationEmitter;

impl NotificationEmitter {
    /// Record that the receiving club got a new offer.
    pub fn offer_received(
        store: &dyn LedgerStore,
        offer: &TransferOffer,
        offering_club_name: &str,
        player_name: &str,
    ) -> Result<()> {
        let notification = Notification::new(
            offer.receiving_club,
            NotificationKind::OfferReceived,
            "Transfer offer received",
            format!(
                "{offering_club_name} bid {} for {player_name}",
                offer.amount
            ),
        )
        .about_offer(offer.id);
        store.insert_notification(&notification)
    }

    /// Record the receiving club's decision for the offering club.
    pub fn offer_resolved(
        store: &dyn LedgerStore,
        offer: &TransferOffer,
        player_name: &str,
        accepted: bool,
    ) -> Result<()> {
        let (kind, title, verdict) = if accepted {
            (
                NotificationKind::OfferAccepted,
                "Offer accepted",
                "accepted",
            )
        } else {
            (
                NotificationKind::OfferRejected,
                "Offer rejected",
                "rejected",
            )
        };
        let notification = Notification::new(
            offer.offering_club,
            kind,
            title,
            format!("Your offer for {player_name} was {verdict}"),
        )
        .about_offer(offer.id);
        store.insert_notification(&notification)
    }

    /// Record a failed settlement for both clubs.
    pub fn settlement_failed(
        store: &dyn LedgerStore,
        transfer: &Transfer,
        phase: SettlementPhase,
        reason: &str,
    ) -> Result<()> {
        for club in [transfer.selling_club, transfer.buying_club] {
            let notification = Notification::new(
                club,
                NotificationKind::TransferFailed,
                "Transfer settlement failed",
                format!("Settlement failed during {phase}: {reason}"),
            )
            .about_transfer(transfer.id)
            .about_offer(transfer.offer);
            store.insert_notification(&notification)?;
        }
        Ok(())
    }

    /// Build completion notices for both clubs. Inserted by the
    /// settlement commit, not here.
    #[must_use]
    pub fn completion_notices(transfer: &Transfer, player_name: &str) -> Vec<Notification> {
        [transfer.selling_club, transfer.buying_club]
            .into_iter()
            .map(|club| {
                Notification::new(
                    club,
                    NotificationKind::TransferCompleted,
                    "Transfer completed",
                    format!("The transfer of {player_name} completed successfully"),
                )
                .about_transfer(transfer.id)
                .about_offer(transfer.offer)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use transferclear_types::{
        Club, ClubId, ExpenseBreakdown, Fingerprint, IncomeBreakdown, OfferId, Player, PlayerId,
        Transfer,
    };

    use super::*;
    use crate::memory::MemoryStore;

    fn make_transfer() -> Transfer {
        let fee = Decimal::new(100_000, 0);
        Transfer::new(
            OfferId::new(),
            PlayerId::new(),
            ClubId::new(),
            ClubId::new(),
            fee,
            IncomeBreakdown::fee_only(fee),
            ExpenseBreakdown::fee_only(fee),
            Fingerprint::from_bits(&[true; 10]),
            Fingerprint::from_bits(&[false; 10]),
        )
    }

    #[test]
    fn offer_received_notifies_receiving_club() {
        let store = MemoryStore::new();
        let seller = Club::dummy("Seller FC", Decimal::ONE);
        let buyer = Club::dummy("Buyer FC", Decimal::ONE);
        let player = Player::dummy("A. Cole", seller.id, Decimal::ONE);
        let offer = TransferOffer::new(
            player.id,
            buyer.id,
            seller.id,
            Decimal::new(250_000, 0),
            "",
            7,
        );

        NotificationEmitter::offer_received(&store, &offer, &buyer.name, &player.name).unwrap();

        let inbox = store.notifications(seller.id, true).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::OfferReceived);
        assert_eq!(inbox[0].offer, Some(offer.id));
        assert!(inbox[0].body.contains("Buyer FC"));
        assert!(inbox[0].body.contains("A. Cole"));
    }

    #[test]
    fn offer_resolved_notifies_offering_club() {
        let store = MemoryStore::new();
        let offer = TransferOffer::new(
            PlayerId::new(),
            ClubId::new(),
            ClubId::new(),
            Decimal::new(1, 0),
            "",
            7,
        );

        NotificationEmitter::offer_resolved(&store, &offer, "A. Cole", true).unwrap();
        NotificationEmitter::offer_resolved(&store, &offer, "A. Cole", false).unwrap();

        let inbox = store.notifications(offer.offering_club, true).unwrap();
        assert_eq!(inbox.len(), 2);
        let kinds: Vec<NotificationKind> = inbox.iter().map(|n| n.kind).collect();
        assert!(kinds.contains(&NotificationKind::OfferAccepted));
        assert!(kinds.contains(&NotificationKind::OfferRejected));
    }

    #[test]
    fn settlement_failed_notifies_both_clubs() {
        let store = MemoryStore::new();
        let transfer = make_transfer();

        NotificationEmitter::settlement_failed(
            &store,
            &transfer,
            SettlementPhase::Propose,
            "ledger unreachable",
        )
        .unwrap();

        for club in [transfer.selling_club, transfer.buying_club] {
            let inbox = store.notifications(club, true).unwrap();
            assert_eq!(inbox.len(), 1);
            assert_eq!(inbox[0].kind, NotificationKind::TransferFailed);
            assert!(inbox[0].body.contains("PROPOSE"));
            assert_eq!(inbox[0].transfer, Some(transfer.id));
        }
    }

    #[test]
    fn completion_notices_cover_both_clubs() {
        let transfer = make_transfer();
        let notices = NotificationEmitter::completion_notices(&transfer, "A. Cole");
        assert_eq!(notices.len(), 2);
        let clubs: Vec<ClubId> = notices.iter().map(|n| n.club).collect();
        assert!(clubs.contains(&transfer.selling_club));
        assert!(clubs.contains(&transfer.buying_club));
        assert!(notices.iter().all(|n| n.kind == NotificationKind::TransferCompleted));
        assert!(notices.iter().all(|n| n.transfer == Some(transfer.id)));
    }
}
