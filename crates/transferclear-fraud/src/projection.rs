//! Seeded random-projection hashing.
//!
//! One fingerprint bit per projection round: round `i` seeds its own
//! `ChaCha8Rng` with `role_seed + i`, draws one uniform value in `[-1, 1)`
//! per feature dimension (in index order), and emits `1` when the dot
//! product with the feature vector is non-negative.
//!
//! Both sides of a transfer use the same seed derivation per **role label**
//! — not per club — so fingerprints stay comparable across unrelated clubs.
//! The seed-to-bitstream mapping below is a compatibility contract; changing
//! it invalidates every stored fingerprint.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use transferclear_types::constants::{FINGERPRINT_BITS, PROJECTION_SEED_DOMAIN};
use transferclear_types::Fingerprint;

/// Derive the projection seed for a role label.
///
/// Domain-prefixed SHA-256, truncated little-endian to `u64`.
#[must_use]
pub fn role_seed(role: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(PROJECTION_SEED_DOMAIN);
    hasher.update(role.as_bytes());
    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA-256 produces 32 bytes");
    u64::from_le_bytes(bytes)
}

/// Compute `rounds` projection bits for a feature vector.
///
/// A zero or empty vector projects to all-ones (every dot product is zero,
/// and zero is binarized to `1`).
#[must_use]
pub fn projection_bits(features: &[f64], seed: u64, rounds: usize) -> Vec<bool> {
    (0..rounds)
        .map(|round| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(round as u64));
            let mut dot = 0.0_f64;
            // One draw per dimension, in order, even for zero features —
            // the stream position is part of the mapping contract.
            for &feature in features {
                dot += feature * rng.gen_range(-1.0..1.0);
            }
            dot >= 0.0
        })
        .collect()
}

/// Fingerprint a feature vector under a role label.
#[must_use]
pub fn fingerprint(features: &[f64], role: &str) -> Fingerprint {
    Fingerprint::from_bits(&projection_bits(features, role_seed(role), FINGERPRINT_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use transferclear_types::constants::{EXPENSE_ROLE_LABEL, INCOME_ROLE_LABEL};

    #[test]
    fn role_seed_is_stable() {
        assert_eq!(role_seed("seller:income"), role_seed("seller:income"));
    }

    #[test]
    fn role_seeds_differ_by_label() {
        assert_ne!(role_seed(INCOME_ROLE_LABEL), role_seed(EXPENSE_ROLE_LABEL));
    }

    #[test]
    fn bits_are_deterministic() {
        let features = [1_000_000.0, 1_100_000.0, 0.909];
        let seed = role_seed(INCOME_ROLE_LABEL);
        assert_eq!(
            projection_bits(&features, seed, 10),
            projection_bits(&features, seed, 10)
        );
    }

    #[test]
    fn bit_count_matches_rounds() {
        let features = [1.0, 2.0, 3.0];
        assert_eq!(projection_bits(&features, 7, 10).len(), 10);
        assert_eq!(projection_bits(&features, 7, 16).len(), 16);
    }

    #[test]
    fn zero_vector_projects_to_all_ones() {
        let bits = projection_bits(&[0.0, 0.0, 0.0], 42, 10);
        assert!(bits.iter().all(|b| *b));
    }

    #[test]
    fn empty_vector_projects_to_all_ones() {
        let bits = projection_bits(&[], 42, 10);
        assert!(bits.iter().all(|b| *b));
    }

    #[test]
    fn different_seeds_diverge() {
        let features = [3.5, -2.0, 900.0, 12.0, -77.0, 4.0];
        let a = projection_bits(&features, 1, 64);
        let b = projection_bits(&features, 2, 64);
        // With 64 rounds the chance of full agreement under different
        // bases is negligible.
        assert_ne!(a, b);
    }

    #[test]
    fn negated_vector_flips_nonzero_projections() {
        let features = [5.0, -3.0, 11.0];
        let negated: Vec<f64> = features.iter().map(|f| -f).collect();
        let seed = 9;
        let bits = projection_bits(&features, seed, 32);
        let flipped = projection_bits(&negated, seed, 32);
        for (a, b) in bits.iter().zip(flipped.iter()) {
            // dot(v, r) and dot(-v, r) only agree when the projection is
            // exactly zero, which these features never hit.
            assert_ne!(a, b);
        }
    }

    #[test]
    fn fingerprint_has_configured_width() {
        let fp = fingerprint(&[1.0, 2.0, 3.0], INCOME_ROLE_LABEL);
        assert_eq!(fp.len(), FINGERPRINT_BITS);
        assert!(fp.as_str().bytes().all(|b| b == b'0' || b == b'1'));
    }
}
