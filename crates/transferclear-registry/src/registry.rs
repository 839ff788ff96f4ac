//! Offer creation and response gates.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use transferclear_store::{LedgerStore, NotificationEmitter};
use transferclear_types::{
    ClubId, OfferId, OfferStatus, PlayerId, Result, TransferOffer, TransferclearError,
};

/// A request to create a transfer offer.
#[derive(Debug, Clone)]
pub struct OfferRequest {
    /// The listed player the offer is for.
    pub player: PlayerId,
    /// The club making the offer.
    pub offering_club: ClubId,
    /// Offered transfer fee.
    pub amount: Decimal,
    /// Free-text additional terms.
    pub terms: String,
    /// Offer validity in days; `None` uses the registry default.
    pub ttl_days: Option<i64>,
}

/// Owns the offer lifecycle prior to settlement.
pub struct OfferRegistry<S: LedgerStore> {
    store: Arc<S>,
    default_ttl_days: i64,
}

impl<S: LedgerStore> OfferRegistry<S> {
    #[must_use]
    pub fn new(store: Arc<S>, default_ttl_days: i64) -> Self {
        Self {
            store,
            default_ttl_days,
        }
    }

    /// Create a pending offer after validating every gate.
    ///
    /// # Errors
    /// - [`TransferclearError::PlayerNotFound`] / [`TransferclearError::ClubNotFound`]
    /// - [`TransferclearError::PlayerNotListed`] if the player is not up for transfer
    /// - [`TransferclearError::SameClub`] if the offering club already owns the player
    /// - [`TransferclearError::BudgetExceeded`] if the amount exceeds the
    ///   offering club's transfer budget
    pub fn create_offer(&self, request: OfferRequest) -> Result<TransferOffer> {
        let player = self.store.player(request.player)?;
        if !player.listed {
            return Err(TransferclearError::PlayerNotListed(player.id));
        }
        if request.offering_club == player.current_club {
            return Err(TransferclearError::SameClub);
        }

        let offering_club = self.store.club(request.offering_club)?;
        if !offering_club.can_afford(request.amount) {
            return Err(TransferclearError::BudgetExceeded {
                amount: request.amount,
                budget: offering_club.transfer_budget,
            });
        }
        // The receiving club must exist before we address notifications to it.
        let receiving_club = self.store.club(player.current_club)?;

        let offer = TransferOffer::new(
            player.id,
            offering_club.id,
            receiving_club.id,
            request.amount,
            request.terms,
            request.ttl_days.unwrap_or(self.default_ttl_days),
        );
        self.store.insert_offer(&offer)?;
        NotificationEmitter::offer_received(
            self.store.as_ref(),
            &offer,
            &offering_club.name,
            &player.name,
        )?;

        tracing::debug!(offer = %offer.id, player = %player.id, "offer created");
        Ok(offer)
    }

    /// Accept or reject a pending offer on behalf of the receiving club.
    ///
    /// Expired-but-still-pending offers are swept to `Expired` here and
    /// reported as [`TransferclearError::OfferExpired`] — the store never
    /// proactively sweeps them.
    ///
    /// # Errors
    /// - [`TransferclearError::OfferNotFound`]
    /// - [`TransferclearError::OfferNotPending`] if already resolved
    /// - [`TransferclearError::OfferExpired`] if the TTL elapsed
    pub fn respond(&self, offer_id: OfferId, accept: bool) -> Result<TransferOffer> {
        let offer = self.store.offer(offer_id)?;
        if offer.status != OfferStatus::Pending {
            return Err(TransferclearError::OfferNotPending {
                status: offer.status,
            });
        }
        if offer.is_expired(Utc::now()) {
            self.store
                .update_offer_status(offer.id, OfferStatus::Expired)?;
            return Err(TransferclearError::OfferExpired(offer.id));
        }

        let status = if accept {
            OfferStatus::Accepted
        } else {
            OfferStatus::Rejected
        };
        self.store.update_offer_status(offer.id, status)?;

        let player = self.store.player(offer.player)?;
        NotificationEmitter::offer_resolved(self.store.as_ref(), &offer, &player.name, accept)?;

        tracing::debug!(offer = %offer.id, %status, "offer resolved");
        let mut resolved = offer;
        resolved.status = status;
        Ok(resolved)
    }

    /// Toggle a player's transfer listing.
    pub fn list_player(&self, player: PlayerId, listed: bool) -> Result<()> {
        self.store.set_player_listed(player, listed)
    }

    /// All offers still pending (including any whose TTL has lapsed but
    /// which have not been swept yet).
    pub fn pending_offers(&self) -> Result<Vec<TransferOffer>> {
        self.store.pending_offers()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use transferclear_store::MemoryStore;
    use transferclear_types::{Club, NotificationKind, Player};

    use super::*;

    struct Fixture {
        store: Arc<MemoryStore>,
        registry: OfferRegistry<MemoryStore>,
        seller: Club,
        buyer: Club,
        player: Player,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let seller = Club::dummy("Seller FC", Decimal::new(500_000, 0));
        let buyer = Club::dummy("Buyer FC", Decimal::new(2_000_000, 0));
        let player = Player::dummy("D. Berg", seller.id, Decimal::new(900_000, 0));
        store.insert_club(&seller).unwrap();
        store.insert_club(&buyer).unwrap();
        store.insert_player(&player).unwrap();
        let registry = OfferRegistry::new(Arc::clone(&store), 7);
        Fixture {
            store,
            registry,
            seller,
            buyer,
            player,
        }
    }

    fn request(fx: &Fixture, amount: i64) -> OfferRequest {
        OfferRequest {
            player: fx.player.id,
            offering_club: fx.buyer.id,
            amount: Decimal::new(amount, 0),
            terms: String::new(),
            ttl_days: None,
        }
    }

    #[test]
    fn create_offer_happy_path() {
        let fx = fixture();
        let offer = fx.registry.create_offer(request(&fx, 900_000)).unwrap();

        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.receiving_club, fx.seller.id);
        let stored = fx.store.offer(offer.id).unwrap();
        assert_eq!(stored.amount, Decimal::new(900_000, 0));

        // The receiving club was notified.
        let inbox = fx.store.notifications(fx.seller.id, true).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::OfferReceived);
    }

    #[test]
    fn unlisted_player_rejected() {
        let fx = fixture();
        fx.store.set_player_listed(fx.player.id, false).unwrap();
        let err = fx.registry.create_offer(request(&fx, 100)).unwrap_err();
        assert!(matches!(err, TransferclearError::PlayerNotListed(_)));
    }

    #[test]
    fn own_player_rejected() {
        let fx = fixture();
        let mut req = request(&fx, 100);
        req.offering_club = fx.seller.id;
        let err = fx.registry.create_offer(req).unwrap_err();
        assert!(matches!(err, TransferclearError::SameClub));
    }

    #[test]
    fn budget_gate_is_inclusive() {
        let fx = fixture();
        // Exactly the budget is allowed.
        assert!(fx.registry.create_offer(request(&fx, 2_000_000)).is_ok());
        // One over is not.
        let err = fx.registry.create_offer(request(&fx, 2_000_001)).unwrap_err();
        assert!(matches!(
            err,
            TransferclearError::BudgetExceeded { amount, budget }
                if amount == Decimal::new(2_000_001, 0) && budget == Decimal::new(2_000_000, 0)
        ));
    }

    #[test]
    fn unknown_player_and_club() {
        let fx = fixture();
        let mut req = request(&fx, 100);
        req.player = PlayerId::new();
        assert!(matches!(
            fx.registry.create_offer(req).unwrap_err(),
            TransferclearError::PlayerNotFound(_)
        ));

        let mut req = request(&fx, 100);
        req.offering_club = ClubId::new();
        assert!(matches!(
            fx.registry.create_offer(req).unwrap_err(),
            TransferclearError::ClubNotFound(_)
        ));
    }

    #[test]
    fn respond_accept_notifies_offerer() {
        let fx = fixture();
        let offer = fx.registry.create_offer(request(&fx, 900_000)).unwrap();

        let resolved = fx.registry.respond(offer.id, true).unwrap();
        assert_eq!(resolved.status, OfferStatus::Accepted);
        assert_eq!(fx.store.offer(offer.id).unwrap().status, OfferStatus::Accepted);

        let inbox = fx.store.notifications(fx.buyer.id, true).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::OfferAccepted);
    }

    #[test]
    fn respond_reject() {
        let fx = fixture();
        let offer = fx.registry.create_offer(request(&fx, 900_000)).unwrap();

        let resolved = fx.registry.respond(offer.id, false).unwrap();
        assert_eq!(resolved.status, OfferStatus::Rejected);
        let inbox = fx.store.notifications(fx.buyer.id, true).unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::OfferRejected);
    }

    #[test]
    fn double_response_is_invalid_state() {
        let fx = fixture();
        let offer = fx.registry.create_offer(request(&fx, 900_000)).unwrap();
        fx.registry.respond(offer.id, true).unwrap();

        let err = fx.registry.respond(offer.id, false).unwrap_err();
        assert!(matches!(
            err,
            TransferclearError::OfferNotPending {
                status: OfferStatus::Accepted
            }
        ));
    }

    #[test]
    fn unknown_offer_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.registry.respond(OfferId::new(), true).unwrap_err(),
            TransferclearError::OfferNotFound(_)
        ));
    }

    #[test]
    fn expired_offer_swept_at_response() {
        let fx = fixture();
        let mut offer = TransferOffer::new(
            fx.player.id,
            fx.buyer.id,
            fx.seller.id,
            Decimal::new(100, 0),
            "",
            7,
        );
        offer.expires_at = Utc::now() - Duration::hours(1);
        fx.store.insert_offer(&offer).unwrap();

        let err = fx.registry.respond(offer.id, true).unwrap_err();
        assert!(matches!(err, TransferclearError::OfferExpired(_)));
        // Swept to Expired, so a second attempt is an ordinary
        // already-resolved error.
        assert_eq!(fx.store.offer(offer.id).unwrap().status, OfferStatus::Expired);
        let err = fx.registry.respond(offer.id, true).unwrap_err();
        assert!(matches!(
            err,
            TransferclearError::OfferNotPending {
                status: OfferStatus::Expired
            }
        ));
    }

    #[test]
    fn ttl_override() {
        let fx = fixture();
        let mut req = request(&fx, 100);
        req.ttl_days = Some(1);
        let offer = fx.registry.create_offer(req).unwrap();
        let ttl = offer.expires_at - offer.created_at;
        assert_eq!(ttl, Duration::days(1));

        let offer = fx.registry.create_offer(request(&fx, 100)).unwrap();
        assert_eq!(offer.expires_at - offer.created_at, Duration::days(7));
    }

    #[test]
    fn pending_offers_lists_unresolved() {
        let fx = fixture();
        let a = fx.registry.create_offer(request(&fx, 100)).unwrap();
        let b = fx.registry.create_offer(request(&fx, 200)).unwrap();
        fx.registry.respond(a.id, false).unwrap();

        let pending = fx.registry.pending_offers().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);
    }

    #[test]
    fn list_player_toggles_flag() {
        let fx = fixture();
        fx.registry.list_player(fx.player.id, false).unwrap();
        assert!(!fx.store.player(fx.player.id).unwrap().listed);
        fx.registry.list_player(fx.player.id, true).unwrap();
        assert!(fx.store.player(fx.player.id).unwrap().listed);
    }
}
