//! Globally unique identifiers used throughout TransferClear.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting.
//! [`AccountRef`] is the opaque account handle understood by the external
//! confirmation ledger, and [`TransferRef`] is that ledger's numeric
//! transfer sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ClubId
// ---------------------------------------------------------------------------

/// Unique identifier for a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ClubId(pub Uuid);

impl ClubId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ClubId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "club:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// Unique identifier for a player contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Stable numeric code for the external ledger, which addresses players
    /// by a bounded integer rather than a UUID.
    ///
    /// Derived by domain-prefixed SHA-256 so every node computes the same
    /// code for the same player.
    #[must_use]
    pub fn numeric_code(&self) -> u64 {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"transferclear:player_code:v1:");
        hasher.update(self.0.as_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 8] = hash[..8].try_into().expect("SHA-256 produces 32 bytes");
        u64::from_le_bytes(bytes) % 1_000_000
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OfferId
// ---------------------------------------------------------------------------

/// Unique identifier for a transfer offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OfferId(pub Uuid);

impl OfferId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TransferId
// ---------------------------------------------------------------------------

/// Unique identifier for a settlement transfer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TransferId(pub Uuid);

impl TransferId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssessmentId
// ---------------------------------------------------------------------------

/// Unique identifier for a fraud assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssessmentId(pub Uuid);

impl AssessmentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assessment:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// NotificationId
// ---------------------------------------------------------------------------

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notif:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountRef
// ---------------------------------------------------------------------------

/// Opaque account handle on the external confirmation ledger.
///
/// The engine never interprets the contents; it only passes the handle to
/// the ledger client and compares for equality (authority checks).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountRef(pub String);

impl AccountRef {
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self(account.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TransferRef
// ---------------------------------------------------------------------------

/// The external ledger's numeric reference for a proposed transfer.
///
/// Assigned by the ledger at Propose time (a monotonically increasing
/// sequence on the remote side) and quoted back on every later step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TransferRef(pub u64);

impl fmt::Display for TransferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ledger:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
