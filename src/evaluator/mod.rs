use crate::knowledge::{PhenotypeTable, RuleTable};
use crate::trace::{EvaluationTrace, MatchStep, StepOutcome};
use crate::variant::VariantRecord;
use tracing::debug;

mod result;

pub use result::*;

/// Maps extracted variant calls to a drug recommendation.
///
/// An `Evaluator` owns its rule and phenotype tables and never mutates them, so
/// a single instance can be shared behind an `Arc` and used from any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct Evaluator {
    rules: RuleTable,
    phenotypes: PhenotypeTable,
}

impl Evaluator {
    pub fn new(rules: RuleTable, phenotypes: PhenotypeTable) -> Self {
        Self { rules, phenotypes }
    }

    /// An evaluator over the built-in drug rules.
    pub fn with_builtin_rules(phenotypes: PhenotypeTable) -> Self {
        Self::new(RuleTable::builtin(), phenotypes)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn phenotypes(&self) -> &PhenotypeTable {
        &self.phenotypes
    }

    /// Evaluates `drug` against the calls in `variants`.
    ///
    /// Never fails: an unknown drug or missing gene data degrade to a sentinel
    /// recommendation with zero confidence.
    pub fn evaluate(&self, drug: &str, variants: &[VariantRecord]) -> EvaluationResult {
        self.evaluate_traced(drug, variants).0
    }

    /// Same as [`Evaluator::evaluate`], also returning the steps that led to the result.
    ///
    /// For every required gene, calls are scanned in input order. A call whose
    /// phenotype is the rule's risk phenotype sets the risk recommendation and
    /// ends the scan for that gene; a resolved non-risk phenotype sets `Safe`;
    /// an unmapped allele sets `Unknown risk` without touching the phenotype.
    /// The last call inspected across all genes decides the recommendation, and
    /// the reported gene is the last required gene that had any call.
    pub fn evaluate_traced(
        &self,
        drug: &str,
        variants: &[VariantRecord],
    ) -> (EvaluationResult, EvaluationTrace) {
        let Some(rule) = self.rules.get(drug) else {
            debug!(drug, "No rule for drug");
            return (
                EvaluationResult::unknown_drug(),
                EvaluationTrace::new(drug, false),
            );
        };

        let mut trace = EvaluationTrace::new(drug, true);
        let mut found_genes = 0usize;
        let mut result_gene = None;
        let mut phenotype_result: Option<String> = None;
        let mut recommendation = String::new();

        for &gene in &rule.required_genes {
            let mut matched = false;

            for variant in variants.iter().filter(|v| v.gene == gene) {
                matched = true;
                let phenotype = self
                    .phenotypes
                    .lookup(gene, &variant.star_allele)
                    .filter(|p| !p.is_empty());

                let outcome = match phenotype {
                    Some(p) if p == rule.risk_phenotype => {
                        phenotype_result = Some(p.to_string());
                        recommendation.clone_from(&rule.recommendation_on_risk);
                        StepOutcome::RiskTriggered
                    }
                    Some(p) => {
                        phenotype_result = Some(p.to_string());
                        recommendation = SAFE.to_string();
                        StepOutcome::Safe
                    }
                    None => {
                        recommendation = UNKNOWN_RISK.to_string();
                        StepOutcome::Unmapped
                    }
                };

                trace.steps.push(MatchStep::new(variant, phenotype, outcome));
                if outcome == StepOutcome::RiskTriggered {
                    break;
                }
            }

            if matched {
                found_genes += 1;
                result_gene = Some(gene);
                trace.genes_found.push(gene);
            } else {
                trace.genes_missing.push(gene);
            }
        }

        if found_genes == 0 {
            debug!(drug, "None of the required genes were genotyped");
            return (EvaluationResult::gene_not_found(), trace);
        }

        let confidence =
            round_confidence(found_genes as f64 / rule.required_genes.len() as f64);
        debug!(drug, found_genes, confidence, %recommendation, "Evaluated drug rule");

        let result = EvaluationResult {
            gene: result_gene,
            phenotype: phenotype_result,
            recommendation,
            confidence,
        };
        (result, trace)
    }
}
