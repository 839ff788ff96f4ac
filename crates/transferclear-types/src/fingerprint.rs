//! Fixed-length bit-string fingerprints of financial patterns.
//!
//! A fingerprint is the output of random-projection hashing over a feature
//! vector: one bit per projection round, concatenated into a string of
//! `'0'`/`'1'` characters. Two fingerprints of equal length compare via
//! Hamming similarity; comparing different lengths is a hard error.

use serde::{Deserialize, Serialize};

use crate::{Result, TransferclearError};

/// A fixed-length bit string summarizing a party's financial pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Build a fingerprint from projection bits, most significant first.
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        Self(bits.iter().map(|b| if *b { '1' } else { '0' }).collect())
    }

    /// The bit string as text (e.g. `"1011010010"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the fingerprint carries no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hamming similarity with another fingerprint: matching positions
    /// divided by length, in `[0, 1]`.
    ///
    /// # Errors
    /// Returns [`TransferclearError::FingerprintLengthMismatch`] if the two
    /// fingerprints differ in length. This should never happen for
    /// fingerprints produced by the same scorer.
    pub fn similarity(&self, other: &Self) -> Result<f64> {
        if self.0.len() != other.0.len() {
            return Err(TransferclearError::FingerprintLengthMismatch {
                left: self.0.len(),
                right: other.0.len(),
            });
        }
        if self.0.is_empty() {
            return Ok(0.0);
        }
        let matching = self
            .0
            .bytes()
            .zip(other.0.bytes())
            .filter(|(a, b)| a == b)
            .count();
        #[allow(clippy::cast_precision_loss)]
        let score = matching as f64 / self.0.len() as f64;
        Ok(score)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bits_renders_binary() {
        let fp = Fingerprint::from_bits(&[true, false, true, true]);
        assert_eq!(fp.as_str(), "1011");
        assert_eq!(fp.len(), 4);
    }

    #[test]
    fn identical_fingerprints_full_similarity() {
        let a = Fingerprint::from_bits(&[true, false, true, false]);
        let b = a.clone();
        assert!((a.similarity(&b).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn opposite_fingerprints_zero_similarity() {
        let a = Fingerprint::from_bits(&[true, true, true, true]);
        let b = Fingerprint::from_bits(&[false, false, false, false]);
        assert!(a.similarity(&b).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn partial_similarity() {
        let a = Fingerprint::from_bits(&[true, true, false, false]);
        let b = Fingerprint::from_bits(&[true, false, false, true]);
        assert!((a.similarity(&b).unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = Fingerprint::from_bits(&[true, false, true, true, false]);
        let b = Fingerprint::from_bits(&[false, false, true, true, true]);
        assert_eq!(a.similarity(&b).unwrap(), b.similarity(&a).unwrap());
    }

    #[test]
    fn length_mismatch_is_hard_error() {
        let a = Fingerprint::from_bits(&[true, false]);
        let b = Fingerprint::from_bits(&[true, false, true]);
        let err = a.similarity(&b).unwrap_err();
        assert!(matches!(
            err,
            TransferclearError::FingerprintLengthMismatch { left: 2, right: 3 }
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let fp = Fingerprint::from_bits(&[true, false, true]);
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
