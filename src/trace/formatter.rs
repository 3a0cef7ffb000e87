use super::{EvaluationTrace, MatchStep, StepOutcome};
use itertools::Itertools;

/// Formats evaluation traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format an evaluation trace into a human-readable explanation.
    ///
    /// Each inspected call becomes one clause, e.g.
    /// `CYP2D6 rs3892097 *4 -> Poor metabolizer (risk)`; genes without any
    /// call are listed at the end.
    pub fn format_trace(trace: &EvaluationTrace) -> String {
        if !trace.rule_found {
            return format!("No rule registered for drug '{}'", trace.drug);
        }

        let mut clauses: Vec<String> = trace.steps.iter().map(Self::format_step).collect();
        if !trace.genes_missing.is_empty() {
            clauses.push(format!(
                "no calls for {}",
                trace.genes_missing.iter().join(", ")
            ));
        }
        clauses.join("; ")
    }

    fn format_step(step: &MatchStep) -> String {
        let phenotype = step.phenotype.as_deref().unwrap_or("unmapped allele");
        let marker = match step.outcome {
            StepOutcome::RiskTriggered => " (risk)",
            StepOutcome::Safe => "",
            StepOutcome::Unmapped => " (unknown)",
        };
        format!(
            "{} {} {} -> {}{}",
            step.gene, step.variant_id, step.star_allele, phenotype, marker
        )
    }
}
