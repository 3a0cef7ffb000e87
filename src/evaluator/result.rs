use crate::variant::Gene;
use serde::{Deserialize, Serialize};

/// Returned for a drug with no rule.
pub const UNKNOWN_DRUG: &str = "Unknown drug";
/// Returned when none of the rule's genes appear in the input.
pub const GENE_NOT_FOUND: &str = "Unknown risk (gene not found)";
/// The resolved phenotype is not the rule's risk phenotype.
pub const SAFE: &str = "Safe";
/// A call was found but its star allele has no phenotype mapping.
pub const UNKNOWN_RISK: &str = "Unknown risk";
/// Returned by the analysis pipeline when there is nothing to evaluate.
pub const NO_INPUT: &str = "Please upload a VCF file";

/// The outcome of evaluating one drug against one set of variant calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene: Option<Gene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype: Option<String>,
    pub recommendation: String,
    /// Fraction of the rule's genes that had at least one call, two decimals.
    pub confidence: f64,
}

/// Typed view over the closed set of recommendation strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind<'a> {
    UnknownDrug,
    GeneNotFound,
    NoInput,
    Safe,
    UnknownRisk,
    /// The drug-specific label configured for the risk phenotype.
    Risk(&'a str),
}

impl EvaluationResult {
    fn sentinel(recommendation: &str) -> Self {
        Self {
            gene: None,
            phenotype: None,
            recommendation: recommendation.to_string(),
            confidence: 0.0,
        }
    }

    pub fn unknown_drug() -> Self {
        Self::sentinel(UNKNOWN_DRUG)
    }

    pub fn gene_not_found() -> Self {
        Self::sentinel(GENE_NOT_FOUND)
    }

    pub fn no_input() -> Self {
        Self::sentinel(NO_INPUT)
    }

    pub fn kind(&self) -> RecommendationKind<'_> {
        match self.recommendation.as_str() {
            UNKNOWN_DRUG => RecommendationKind::UnknownDrug,
            GENE_NOT_FOUND => RecommendationKind::GeneNotFound,
            NO_INPUT => RecommendationKind::NoInput,
            SAFE => RecommendationKind::Safe,
            UNKNOWN_RISK => RecommendationKind::UnknownRisk,
            other => RecommendationKind::Risk(other),
        }
    }

    /// True when the drug's risk phenotype was triggered.
    pub fn is_risk(&self) -> bool {
        matches!(self.kind(), RecommendationKind::Risk(_))
    }
}

/// Rounds to two decimal places.
pub(crate) fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
