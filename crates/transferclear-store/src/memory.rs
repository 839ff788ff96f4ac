//! In-memory reference adapter for [`LedgerStore`].
//!
//! Backs the engine in tests and doubles as the executable specification
//! of adapter behavior: validate-then-apply commits, monotonic offer
//! status, write-once ledger references.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use transferclear_types::{
    Club, ClubId, FraudAssessment, Notification, NotificationId, OfferId, OfferStatus, Player,
    PlayerId, Result, Transfer, TransferId, TransferOffer, TransferRef, TransferRole,
    TransferclearError,
};

use crate::store::{LedgerStore, SettlementCommit};

#[derive(Debug, Default)]
struct Inner {
    clubs: HashMap<ClubId, Club>,
    players: HashMap<PlayerId, Player>,
    offers: HashMap<OfferId, TransferOffer>,
    transfers: HashMap<TransferId, Transfer>,
    assessments: HashMap<TransferId, FraudAssessment>,
    notifications: Vec<Notification>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| TransferclearError::PersistenceFailed {
                reason: "store lock poisoned".to_string(),
            })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| TransferclearError::PersistenceFailed {
                reason: "store lock poisoned".to_string(),
            })
    }
}

impl LedgerStore for MemoryStore {
    fn club(&self, id: ClubId) -> Result<Club> {
        self.read()?
            .clubs
            .get(&id)
            .cloned()
            .ok_or(TransferclearError::ClubNotFound(id))
    }

    fn player(&self, id: PlayerId) -> Result<Player> {
        self.read()?
            .players
            .get(&id)
            .cloned()
            .ok_or(TransferclearError::PlayerNotFound(id))
    }

    fn offer(&self, id: OfferId) -> Result<TransferOffer> {
        self.read()?
            .offers
            .get(&id)
            .cloned()
            .ok_or(TransferclearError::OfferNotFound(id))
    }

    fn pending_offers(&self) -> Result<Vec<TransferOffer>> {
        let inner = self.read()?;
        let mut offers: Vec<TransferOffer> = inner
            .offers
            .values()
            .filter(|o| o.status == OfferStatus::Pending)
            .cloned()
            .collect();
        offers.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(offers)
    }

    fn transfer(&self, id: TransferId) -> Result<Transfer> {
        self.read()?
            .transfers
            .get(&id)
            .cloned()
            .ok_or(TransferclearError::TransferNotFound(id))
    }

    fn transfer_for_offer(&self, offer: OfferId) -> Result<Option<Transfer>> {
        let inner = self.read()?;
        let mut attempts: Vec<&Transfer> = inner
            .transfers
            .values()
            .filter(|t| t.offer == offer)
            .collect();
        attempts.sort_by_key(|t| t.created_at);
        Ok(attempts.last().map(|t| (*t).clone()))
    }

    fn completed_transfers(
        &self,
        club: ClubId,
        role: TransferRole,
        limit: usize,
    ) -> Result<Vec<Transfer>> {
        let inner = self.read()?;
        let mut transfers: Vec<Transfer> = inner
            .transfers
            .values()
            .filter(|t| {
                t.is_completed
                    && match role {
                        TransferRole::Seller => t.selling_club == club,
                        TransferRole::Buyer => t.buying_club == club,
                    }
            })
            .cloned()
            .collect();
        transfers.sort_by_key(|t| std::cmp::Reverse(t.completed_at.unwrap_or(t.created_at)));
        transfers.truncate(limit);
        Ok(transfers)
    }

    fn assessment_for_transfer(&self, id: TransferId) -> Result<Option<FraudAssessment>> {
        Ok(self.read()?.assessments.get(&id).cloned())
    }

    fn notifications(&self, club: ClubId, unread_only: bool) -> Result<Vec<Notification>> {
        let inner = self.read()?;
        let mut notifications: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.club == club && (!unread_only || !n.read))
            .cloned()
            .collect();
        notifications.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(notifications)
    }

    fn insert_club(&self, club: &Club) -> Result<()> {
        let mut inner = self.write()?;
        if inner.clubs.contains_key(&club.id) {
            return Err(TransferclearError::PersistenceFailed {
                reason: format!("duplicate club: {}", club.id),
            });
        }
        inner.clubs.insert(club.id, club.clone());
        Ok(())
    }

    fn insert_player(&self, player: &Player) -> Result<()> {
        let mut inner = self.write()?;
        if inner.players.contains_key(&player.id) {
            return Err(TransferclearError::PersistenceFailed {
                reason: format!("duplicate player: {}", player.id),
            });
        }
        inner.players.insert(player.id, player.clone());
        Ok(())
    }

    fn set_player_listed(&self, id: PlayerId, listed: bool) -> Result<()> {
        let mut inner = self.write()?;
        let player = inner
            .players
            .get_mut(&id)
            .ok_or(TransferclearError::PlayerNotFound(id))?;
        player.listed = listed;
        Ok(())
    }

    fn insert_offer(&self, offer: &TransferOffer) -> Result<()> {
        let mut inner = self.write()?;
        if inner.offers.contains_key(&offer.id) {
            return Err(TransferclearError::PersistenceFailed {
                reason: format!("duplicate offer: {}", offer.id),
            });
        }
        inner.offers.insert(offer.id, offer.clone());
        Ok(())
    }

    fn update_offer_status(&self, id: OfferId, status: OfferStatus) -> Result<()> {
        let mut inner = self.write()?;
        let offer = inner
            .offers
            .get_mut(&id)
            .ok_or(TransferclearError::OfferNotFound(id))?;
        if !offer.status.can_transition_to(status) {
            return Err(TransferclearError::OfferNotPending {
                status: offer.status,
            });
        }
        offer.status = status;
        Ok(())
    }

    fn insert_transfer(&self, transfer: &Transfer, assessment: &FraudAssessment) -> Result<()> {
        let mut inner = self.write()?;
        if inner.transfers.contains_key(&transfer.id) {
            return Err(TransferclearError::PersistenceFailed {
                reason: format!("duplicate transfer: {}", transfer.id),
            });
        }
        inner.transfers.insert(transfer.id, transfer.clone());
        inner.assessments.insert(transfer.id, assessment.clone());
        Ok(())
    }

    fn set_transfer_ledger_ref(&self, id: TransferId, ledger_ref: TransferRef) -> Result<()> {
        let mut inner = self.write()?;
        let transfer = inner
            .transfers
            .get_mut(&id)
            .ok_or(TransferclearError::TransferNotFound(id))?;
        if transfer.ledger_ref.is_some() {
            return Err(TransferclearError::PersistenceFailed {
                reason: format!("ledger ref already set for {id}"),
            });
        }
        transfer.ledger_ref = Some(ledger_ref);
        Ok(())
    }

    fn insert_notification(&self, notification: &Notification) -> Result<()> {
        self.write()?.notifications.push(notification.clone());
        Ok(())
    }

    fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        let mut inner = self.write()?;
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| TransferclearError::PersistenceFailed {
                reason: format!("notification not found: {id}"),
            })?;
        notification.read = true;
        Ok(())
    }

    fn apply_settlement(&self, commit: &SettlementCommit) -> Result<()> {
        let mut inner = self.write()?;

        // Validate every target first: the commit must be all-or-nothing,
        // so nothing below this block may fail.
        {
            let transfer = inner
                .transfers
                .get(&commit.transfer_id)
                .ok_or(TransferclearError::TransferNotFound(commit.transfer_id))?;
            if transfer.is_completed {
                return Err(TransferclearError::TransferAlreadyCompleted(transfer.id));
            }
            if !inner.players.contains_key(&commit.player) {
                return Err(TransferclearError::PlayerNotFound(commit.player));
            }
            if !inner.clubs.contains_key(&commit.selling_club) {
                return Err(TransferclearError::ClubNotFound(commit.selling_club));
            }
            if !inner.clubs.contains_key(&commit.buying_club) {
                return Err(TransferclearError::ClubNotFound(commit.buying_club));
            }
        }

        let transfer = inner
            .transfers
            .get_mut(&commit.transfer_id)
            .expect("validated above");
        transfer.is_validated = true;
        transfer.is_completed = true;
        transfer.ledger_ref = Some(commit.ledger_ref);
        transfer.tx_hash = Some(commit.tx_hash.clone());
        transfer.completed_at = Some(commit.completed_at);

        let player = inner.players.get_mut(&commit.player).expect("validated above");
        player.current_club = commit.new_owner;
        player.listed = false;

        let seller = inner
            .clubs
            .get_mut(&commit.selling_club)
            .expect("validated above");
        seller.balance += commit.seller_income;
        seller.transfer_budget += commit.seller_income;

        let buyer = inner
            .clubs
            .get_mut(&commit.buying_club)
            .expect("validated above");
        buyer.balance -= commit.buyer_expense;
        buyer.transfer_budget -= commit.buyer_expense;

        inner.notifications.extend(commit.notifications.iter().cloned());

        tracing::debug!(
            transfer = %commit.transfer_id,
            player = %commit.player,
            "settlement commit applied"
        );
        Ok(())
    }
}
