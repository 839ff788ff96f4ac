//! # transferclear-fraud
//!
//! **Fraud plane**: pure deterministic scoring of a candidate transfer
//! against the counterparties' transaction histories — zero side effects.
//!
//! ## Pipeline
//!
//! 1. Vectorize each party's history plus the candidate into a flat
//!    feature vector ([`income_vector`] / [`expense_vector`])
//! 2. Hash each vector into a 10-bit fingerprint via seeded
//!    random-projection rounds ([`fingerprint`])
//! 3. Compare fingerprints by Hamming similarity and gate on the
//!    legitimate band ([`FraudScorer`])
//!
//! Everything here is bit-for-bit reproducible: projection streams are
//! explicit [`rand_chacha::ChaCha8Rng`] instances keyed by
//! `(role seed, round index)` — never a process-wide generator.

pub mod features;
pub mod projection;
pub mod scorer;

pub use features::{expense_vector, income_vector, ProposalSample, TransferSample};
pub use projection::{fingerprint, projection_bits, role_seed};
pub use scorer::FraudScorer;
