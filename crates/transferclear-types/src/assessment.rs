//! Fraud assessment records produced by the scorer.
//!
//! One assessment exists per persisted [`crate::Transfer`]; the two are
//! written to the store as a single unit. Assessments for transfers that
//! failed the legitimacy gate are returned to the caller but never
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AssessmentId, Fingerprint, TransferId};

/// Qualitative risk tier derived from the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Similarity within the legitimate band.
    Low,
    /// Similarity below the lower bound — possible data manipulation.
    Elevated,
    /// Similarity above the upper bound — possible layering pattern.
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Elevated => write!(f, "ELEVATED"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// The scorer's verdict on one candidate transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAssessment {
    /// Unique assessment identifier.
    pub id: AssessmentId,
    /// The transfer this assessment belongs to. `None` until the
    /// coordinator binds the assessment to a persisted transfer row.
    pub transfer: Option<TransferId>,
    /// Fingerprint of the seller's income pattern.
    pub income_fingerprint: Fingerprint,
    /// Fingerprint of the buyer's expense pattern.
    pub expense_fingerprint: Fingerprint,
    /// Hamming similarity of the two fingerprints, in `[0, 1]`.
    pub similarity: f64,
    /// Whether the similarity falls inside the legitimate band.
    pub is_legitimate: bool,
    /// Qualitative risk tier.
    pub risk_tier: RiskTier,
    /// Human-readable explanation naming the crossed boundary, if any.
    pub rationale: String,
    /// When the assessment was computed.
    pub assessed_at: DateTime<Utc>,
}

impl FraudAssessment {
    /// Bind this assessment to the transfer row it will be persisted with.
    #[must_use]
    pub fn bound_to(mut self, transfer: TransferId) -> Self {
        self.transfer = Some(transfer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_assessment() -> FraudAssessment {
        FraudAssessment {
            id: AssessmentId::new(),
            transfer: None,
            income_fingerprint: Fingerprint::from_bits(&[true; 10]),
            expense_fingerprint: Fingerprint::from_bits(&[true; 10]),
            similarity: 0.6,
            is_legitimate: true,
            risk_tier: RiskTier::Low,
            rationale: "similarity within the legitimate band".to_string(),
            assessed_at: Utc::now(),
        }
    }

    #[test]
    fn bound_to_sets_transfer() {
        let transfer_id = TransferId::new();
        let assessment = make_assessment().bound_to(transfer_id);
        assert_eq!(assessment.transfer, Some(transfer_id));
    }

    #[test]
    fn risk_tier_display() {
        assert_eq!(format!("{}", RiskTier::Low), "LOW");
        assert_eq!(format!("{}", RiskTier::Elevated), "ELEVATED");
        assert_eq!(format!("{}", RiskTier::High), "HIGH");
    }

    #[test]
    fn serde_roundtrip() {
        let assessment = make_assessment();
        let json = serde_json::to_string(&assessment).unwrap();
        let back: FraudAssessment = serde_json::from_str(&json).unwrap();
        assert_eq!(assessment.id, back.id);
        assert_eq!(assessment.risk_tier, back.risk_tier);
        assert!((assessment.similarity - back.similarity).abs() < f64::EPSILON);
    }
}
