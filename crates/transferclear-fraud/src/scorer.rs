//! The fraud gate: fingerprints both sides of a candidate transfer and
//! decides legitimacy from their Hamming similarity.
//!
//! A normal transfer shows a *moderate* similarity between the seller's
//! income pattern and the buyer's expense pattern. Both extremes are
//! suspicious: near-zero similarity suggests manipulated records, while
//! near-identical patterns suggest layering — money moved in circles to
//! look like transfer activity.

use chrono::Utc;
use transferclear_types::constants::{
    EXPENSE_ROLE_LABEL, INCOME_ROLE_LABEL, SIMILARITY_LOWER, SIMILARITY_UPPER,
};
use transferclear_types::{AssessmentId, FraudAssessment, Result, RiskTier};

use crate::features::{expense_vector, income_vector, ProposalSample, TransferSample};
use crate::projection::fingerprint;

/// Scores candidate transfers against both parties' histories.
#[derive(Debug, Clone)]
pub struct FraudScorer {
    /// Inclusive lower bound of the legitimate similarity band.
    lower: f64,
    /// Inclusive upper bound of the legitimate similarity band.
    upper: f64,
}

impl FraudScorer {
    /// Scorer with the standard legitimacy band.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lower: SIMILARITY_LOWER,
            upper: SIMILARITY_UPPER,
        }
    }

    /// Scorer with a custom legitimacy band.
    ///
    /// # Panics
    /// Panics if the band is empty or outside `[0, 1]`.
    #[must_use]
    pub fn with_band(lower: f64, upper: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&lower) && (0.0..=1.0).contains(&upper) && lower <= upper,
            "legitimacy band must satisfy 0 <= lower <= upper <= 1"
        );
        Self { lower, upper }
    }

    /// Score a candidate transfer.
    ///
    /// `seller_history` and `buyer_history` are each party's most recent
    /// completed transfers in their respective role; the candidate is
    /// appended to both sides before fingerprinting, matching the stored
    /// fingerprints a completed transfer would contribute to future scores.
    ///
    /// # Errors
    /// The only hard error is a fingerprint-length mismatch, which cannot
    /// occur for fingerprints produced here; malformed history fields are
    /// absorbed by the vectorizer's conservative defaults.
    pub fn assess(
        &self,
        seller_history: &[TransferSample],
        buyer_history: &[TransferSample],
        current: &ProposalSample,
    ) -> Result<FraudAssessment> {
        let mut seller_samples = seller_history.to_vec();
        seller_samples.push(current.income_sample());
        let mut buyer_samples = buyer_history.to_vec();
        buyer_samples.push(current.expense_sample());

        let income_fingerprint = fingerprint(&income_vector(&seller_samples), INCOME_ROLE_LABEL);
        let expense_fingerprint = fingerprint(&expense_vector(&buyer_samples), EXPENSE_ROLE_LABEL);

        let similarity = income_fingerprint.similarity(&expense_fingerprint)?;
        let (is_legitimate, risk_tier, rationale) = self.classify(similarity);

        tracing::debug!(
            similarity,
            legitimate = is_legitimate,
            income = %income_fingerprint,
            expense = %expense_fingerprint,
            "fraud assessment computed"
        );

        Ok(FraudAssessment {
            id: AssessmentId::new(),
            transfer: None,
            income_fingerprint,
            expense_fingerprint,
            similarity,
            is_legitimate,
            risk_tier,
            rationale,
            assessed_at: Utc::now(),
        })
    }

    /// Classify a similarity score against the legitimacy band.
    ///
    /// Returns the verdict, the qualitative tier, and a rationale naming
    /// the crossed boundary (or stating the score is in range).
    #[must_use]
    pub fn classify(&self, similarity: f64) -> (bool, RiskTier, String) {
        if similarity < self.lower {
            (
                false,
                RiskTier::Elevated,
                format!(
                    "similarity {similarity:.4} below lower bound {:.2}: \
                     possible data manipulation",
                    self.lower
                ),
            )
        } else if similarity > self.upper {
            (
                false,
                RiskTier::High,
                format!(
                    "similarity {similarity:.4} above upper bound {:.2}: \
                     income and expense patterns nearly identical, possible layering",
                    self.upper
                ),
            )
        } else {
            (
                true,
                RiskTier::Low,
                format!(
                    "similarity {similarity:.4} within the legitimate band \
                     [{:.2}, {:.2}]",
                    self.lower, self.upper
                ),
            )
        }
    }
}

impl Default for FraudScorer {
    fn default() -> Self {
        Self::new()
    }
}
