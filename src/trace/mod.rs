mod formatter;

pub use formatter::TraceFormatter;

use crate::variant::{Gene, VariantRecord};

/// Which branch of the rule a single variant call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The resolved phenotype is the rule's risk phenotype. Ends the scan for this gene.
    RiskTriggered,
    /// A phenotype was resolved and it is not the risk phenotype.
    Safe,
    /// The star allele has no phenotype mapping.
    Unmapped,
}

/// One variant call inspected during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStep {
    pub gene: Gene,
    pub variant_id: String,
    pub star_allele: String,
    pub phenotype: Option<String>,
    pub outcome: StepOutcome,
}

impl MatchStep {
    pub(crate) fn new(record: &VariantRecord, phenotype: Option<&str>, outcome: StepOutcome) -> Self {
        Self {
            gene: record.gene,
            variant_id: record.variant_id.clone(),
            star_allele: record.star_allele.clone(),
            phenotype: phenotype.map(str::to_string),
            outcome,
        }
    }
}

/// A record of how a recommendation was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationTrace {
    pub drug: String,
    /// `false` when the drug has no rule; no steps are recorded then.
    pub rule_found: bool,
    pub steps: Vec<MatchStep>,
    pub genes_found: Vec<Gene>,
    pub genes_missing: Vec<Gene>,
}

impl EvaluationTrace {
    pub(crate) fn new(drug: &str, rule_found: bool) -> Self {
        Self {
            drug: drug.to_string(),
            rule_found,
            steps: Vec::new(),
            genes_found: Vec::new(),
            genes_missing: Vec::new(),
        }
    }

    /// The step that triggered the risk recommendation, if any.
    pub fn risk_step(&self) -> Option<&MatchStep> {
        self.steps
            .iter()
            .find(|step| step.outcome == StepOutcome::RiskTriggered)
    }
}
