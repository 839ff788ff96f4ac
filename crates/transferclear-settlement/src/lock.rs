//! Per-player settlement lock.
//!
//! Two offers resolving for the same player must never both reach the
//! atomic-commit step. The lock is keyed on player identity and held as an
//! RAII guard for the whole pipeline (history pull through commit).
//! Settlements for different players proceed concurrently.

use std::collections::HashSet;
use std::sync::Mutex;

use transferclear_types::{PlayerId, Result, TransferclearError};

/// Tracks which players currently have a settlement in flight.
#[derive(Debug, Default)]
pub struct SettleLock {
    active: Mutex<HashSet<PlayerId>>,
}

impl SettleLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the settlement lock for a player.
    ///
    /// # Errors
    /// Returns [`TransferclearError::SettlementInFlight`] if another
    /// settlement for the same player holds the lock.
    pub fn acquire(&self, player: PlayerId) -> Result<SettleGuard<'_>> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| TransferclearError::Internal("settle lock poisoned".to_string()))?;
        if !active.insert(player) {
            return Err(TransferclearError::SettlementInFlight(player));
        }
        Ok(SettleGuard { lock: self, player })
    }

    /// Whether a settlement is currently in flight for the player.
    pub fn is_held(&self, player: PlayerId) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(&player))
            .unwrap_or(false)
    }
}

/// RAII guard releasing the player's lock on drop.
#[derive(Debug)]
pub struct SettleGuard<'a> {
    lock: &'a SettleLock,
    player: PlayerId,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut active) = self.lock.active.lock() {
            active.remove(&self.player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release() {
        let lock = SettleLock::new();
        let player = PlayerId::new();

        let guard = lock.acquire(player).unwrap();
        assert!(lock.is_held(player));
        drop(guard);
        assert!(!lock.is_held(player));
    }

    #[test]
    fn double_acquire_blocked() {
        let lock = SettleLock::new();
        let player = PlayerId::new();

        let _guard = lock.acquire(player).unwrap();
        let err = lock.acquire(player).unwrap_err();
        assert!(matches!(
            err,
            TransferclearError::SettlementInFlight(p) if p == player
        ));
    }

    #[test]
    fn reacquire_after_release() {
        let lock = SettleLock::new();
        let player = PlayerId::new();

        drop(lock.acquire(player).unwrap());
        assert!(lock.acquire(player).is_ok());
    }

    #[test]
    fn different_players_independent() {
        let lock = SettleLock::new();
        let a = PlayerId::new();
        let b = PlayerId::new();

        let _guard_a = lock.acquire(a).unwrap();
        let _guard_b = lock.acquire(b).unwrap();
        assert!(lock.is_held(a));
        assert!(lock.is_held(b));
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let lock = Arc::new(SettleLock::new());
        let player = PlayerId::new();
        let guard = lock.acquire(player).unwrap();

        let lock2 = Arc::clone(&lock);
        let handle = std::thread::spawn(move || lock2.acquire(player).is_err());
        assert!(handle.join().unwrap(), "second thread must be blocked");
        drop(guard);
    }
}
