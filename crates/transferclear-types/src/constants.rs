//! System-wide constants for the TransferClear settlement engine.

/// Number of projection rounds per fingerprint (bits per fingerprint).
pub const FINGERPRINT_BITS: usize = 10;

/// Lower bound of the legitimate similarity band (inclusive).
pub const SIMILARITY_LOWER: f64 = 0.3;

/// Upper bound of the legitimate similarity band (inclusive).
pub const SIMILARITY_UPPER: f64 = 0.8;

/// Maximum completed transfers pulled per club role when scoring.
pub const HISTORY_WINDOW: usize = 10;

/// Default offer validity in days.
pub const DEFAULT_OFFER_TTL_DAYS: i64 = 7;

/// Default timeout for the Propose ledger call in milliseconds.
pub const DEFAULT_PROPOSE_TIMEOUT_MS: u64 = 60_000;

/// Default timeout for the Accept ledger call in milliseconds.
pub const DEFAULT_ACCEPT_TIMEOUT_MS: u64 = 60_000;

/// Default timeout for the Validate ledger call in milliseconds.
pub const DEFAULT_VALIDATE_TIMEOUT_MS: u64 = 30_000;

/// Seed domain prefix for role-keyed projection streams.
pub const PROJECTION_SEED_DOMAIN: &[u8] = b"transferclear:projection:v1:";

/// Role label seeding the seller/income projection basis.
pub const INCOME_ROLE_LABEL: &str = "seller:income";

/// Role label seeding the buyer/expense projection basis.
pub const EXPENSE_ROLE_LABEL: &str = "buyer:expense";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TransferClear";
