//! Tests for the recommendation evaluator.
mod common;
use common::*;
use pharmaguard::evaluator::{GENE_NOT_FOUND, SAFE, UNKNOWN_DRUG, UNKNOWN_RISK};
use pharmaguard::prelude::*;
use pharmaguard::trace::StepOutcome;
use std::sync::Arc;
use std::thread;

#[test]
fn test_codeine_poor_metabolizer_is_ineffective() {
    let evaluator = builtin_evaluator();
    let variants = extract(&vcf_document(&[vcf_line(
        "rs3892097",
        "GENE=CYP2D6;STAR=*4",
    )]));

    let result = evaluator.evaluate("Codeine", &variants);
    assert_eq!(result.recommendation, "Ineffective");
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.gene, Some(Gene::Cyp2d6));
    assert_eq!(result.phenotype.as_deref(), Some("Poor metabolizer"));
    assert!(result.is_risk());
}

#[test]
fn test_normal_metabolizer_is_safe() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Cyp2d6, "*1")];

    let result = evaluator.evaluate("Codeine", &variants);
    assert_eq!(result.recommendation, SAFE);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.phenotype.as_deref(), Some("Normal metabolizer"));
    assert_eq!(result.kind(), RecommendationKind::Safe);
}

#[test]
fn test_missing_gene_returns_sentinel() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Tpmt, "*2"), record(Gene::Dpyd, "*2A")];

    let result = evaluator.evaluate("Codeine", &variants);
    assert_eq!(result.recommendation, GENE_NOT_FOUND);
    assert_eq!(result.confidence, 0.0);
    assert!(result.gene.is_none());
    assert!(result.phenotype.is_none());
    assert_eq!(result.kind(), RecommendationKind::GeneNotFound);
}

#[test]
fn test_unknown_drug_ignores_variants() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Cyp2d6, "*4")];

    for drug in ["QuantumDrug", "codeine", ""] {
        let result = evaluator.evaluate(drug, &variants);
        assert_eq!(result.recommendation, UNKNOWN_DRUG);
        assert_eq!(result.confidence, 0.0);
        assert!(result.gene.is_none());
        assert!(result.phenotype.is_none());
    }
}

#[test]
fn test_unmapped_allele_is_unknown_risk_with_full_confidence() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Cyp2d6, "*999")];

    let result = evaluator.evaluate("Codeine", &variants);
    assert_eq!(result.recommendation, UNKNOWN_RISK);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.gene, Some(Gene::Cyp2d6));
    assert!(result.phenotype.is_none());
}

#[test]
fn test_unmapped_allele_keeps_earlier_phenotype() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Cyp2d6, "*1"), record(Gene::Cyp2d6, ".")];

    let result = evaluator.evaluate("Codeine", &variants);
    assert_eq!(result.recommendation, UNKNOWN_RISK);
    assert_eq!(result.phenotype.as_deref(), Some("Normal metabolizer"));
}

#[test]
fn test_empty_phenotype_label_counts_as_unmapped() {
    let phenotypes = PhenotypeTable::new().with_phenotype(Gene::Cyp2d6, "*1", "");
    let evaluator = Evaluator::with_builtin_rules(phenotypes);

    let (result, trace) = evaluator.evaluate_traced("Codeine", &[record(Gene::Cyp2d6, "*1")]);
    assert_eq!(result.recommendation, UNKNOWN_RISK);
    assert!(result.phenotype.is_none());
    assert_eq!(result.confidence, 1.0);
    assert_eq!(trace.steps[0].outcome, StepOutcome::Unmapped);
}

#[test]
fn test_first_risk_match_stops_the_gene_scan() {
    let evaluator = builtin_evaluator();
    let variants = vec![
        record(Gene::Cyp2d6, "*1"),
        record(Gene::Cyp2d6, "*4"),
        record(Gene::Cyp2d6, "*1"),
    ];

    let (result, trace) = evaluator.evaluate_traced("Codeine", &variants);
    assert_eq!(result.recommendation, "Ineffective");
    assert_eq!(result.phenotype.as_deref(), Some("Poor metabolizer"));
    assert_eq!(trace.steps.len(), 2);
    assert_eq!(trace.steps[1].outcome, StepOutcome::RiskTriggered);
    assert_eq!(trace.risk_step().map(|s| s.star_allele.as_str()), Some("*4"));
}

#[test]
fn test_duplicate_calls_do_not_inflate_confidence() {
    let evaluator = builtin_evaluator();
    let variants = vec![
        record(Gene::Cyp2c9, "*1"),
        record(Gene::Cyp2c9, "*1"),
        record(Gene::Cyp2c9, "*2"),
    ];

    let result = evaluator.evaluate("Warfarin", &variants);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.recommendation, SAFE);
    assert_eq!(result.phenotype.as_deref(), Some("Intermediate metabolizer"));
}

#[test]
fn test_every_builtin_drug_triggers_on_its_risk_allele() {
    let evaluator = builtin_evaluator();
    let cases = [
        ("Codeine", Gene::Cyp2d6, "*4", "Ineffective"),
        ("Warfarin", Gene::Cyp2c9, "*3", "Reduce dose"),
        ("Simvastatin", Gene::Slco1b1, "*5", "Toxic risk"),
        ("Clopidogrel", Gene::Cyp2c19, "*2", "Reduce efficacy"),
        ("Azathioprine", Gene::Tpmt, "*3A", "Risk of toxicity"),
        ("Fluorouracil", Gene::Dpyd, "*2A", "Risk of severe toxicity"),
    ];

    for (drug, gene, star, expected) in cases {
        let result = evaluator.evaluate(drug, &[record(gene, star)]);
        assert_eq!(result.recommendation, expected, "drug {}", drug);
        assert_eq!(result.gene, Some(gene));
    }
}

#[test]
fn test_partial_confidence_for_multi_gene_rule() {
    let evaluator = Evaluator::new(two_gene_rules(), synthetic_phenotypes());
    let variants = vec![record(Gene::Cyp2c19, "*1")];

    let result = evaluator.evaluate("Dualdrug", &variants);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.gene, Some(Gene::Cyp2c19));
    assert_eq!(result.recommendation, SAFE);
}

#[test]
fn test_multi_gene_rule_reports_last_gene_with_calls() {
    let evaluator = Evaluator::new(two_gene_rules(), synthetic_phenotypes());
    // The risk comes from CYP2D6, but CYP2C19 is scanned afterwards and
    // overwrites the recommendation and the reported gene.
    let variants = vec![record(Gene::Cyp2d6, "*4"), record(Gene::Cyp2c19, "*1")];

    let result = evaluator.evaluate("Dualdrug", &variants);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.gene, Some(Gene::Cyp2c19));
    assert_eq!(result.phenotype.as_deref(), Some("Normal metabolizer"));
    assert_eq!(result.recommendation, SAFE);

    // Reversed gene presence: only CYP2D6 genotyped.
    let result = evaluator.evaluate("Dualdrug", &[record(Gene::Cyp2d6, "*4")]);
    assert_eq!(result.gene, Some(Gene::Cyp2d6));
    assert_eq!(result.recommendation, "Avoid");
    assert_eq!(result.confidence, 0.5);
}

#[test]
fn test_confidence_rounds_to_two_decimals() {
    let rules = RuleTable::builder()
        .with_rule(DrugRule::new(
            "Triple",
            [Gene::Cyp2d6, Gene::Tpmt, Gene::Dpyd],
            "Poor metabolizer",
            "Avoid",
        ))
        .build()
        .unwrap();
    let evaluator = Evaluator::new(rules, synthetic_phenotypes());

    let result = evaluator.evaluate("Triple", &[record(Gene::Cyp2d6, "*1")]);
    assert_eq!(result.confidence, 0.33);
    let result = evaluator.evaluate(
        "Triple",
        &[record(Gene::Cyp2d6, "*1"), record(Gene::Dpyd, "*1")],
    );
    assert_eq!(result.confidence, 0.67);
}

#[test]
fn test_confidence_stays_in_unit_interval() {
    let evaluator = builtin_evaluator();
    let variants: Vec<VariantRecord> = (0..25).map(|_| record(Gene::Tpmt, "*1")).collect();
    for drug in ["Azathioprine", "Codeine", "Nope"] {
        let result = evaluator.evaluate(drug, &variants);
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let evaluator = builtin_evaluator();
    let variants = vec![record(Gene::Cyp2c19, "*17"), record(Gene::Cyp2c19, "*2")];
    let first = evaluator.evaluate("Clopidogrel", &variants);
    let second = evaluator.evaluate("Clopidogrel", &variants);
    assert_eq!(first, second);
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
}

#[test]
fn test_evaluator_is_shareable_across_threads() {
    let evaluator = Arc::new(builtin_evaluator());
    let handles: Vec<_> = ["Codeine", "Warfarin", "Simvastatin"]
        .into_iter()
        .map(|drug| {
            let evaluator = Arc::clone(&evaluator);
            thread::spawn(move || evaluator.evaluate(drug, &[record(Gene::Cyp2d6, "*4")]))
        })
        .collect();

    let results: Vec<EvaluationResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0].recommendation, "Ineffective");
    assert_eq!(results[1].recommendation, GENE_NOT_FOUND);
    assert_eq!(results[2].recommendation, GENE_NOT_FOUND);
}

#[test]
fn test_trace_for_unknown_drug_and_missing_gene() {
    let evaluator = builtin_evaluator();

    let (_, trace) = evaluator.evaluate_traced("QuantumDrug", &[]);
    assert!(!trace.rule_found);
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "No rule registered for drug 'QuantumDrug'"
    );

    let (_, trace) = evaluator.evaluate_traced("Codeine", &[]);
    assert_eq!(trace.genes_missing, vec![Gene::Cyp2d6]);
    assert_eq!(TraceFormatter::format_trace(&trace), "no calls for CYP2D6");
}

#[test]
fn test_trace_formatting_of_steps() {
    let evaluator = builtin_evaluator();
    let variants = vec![
        VariantRecord::new(Gene::Cyp2d6, "rs1065852", "*10"),
        VariantRecord::new(Gene::Cyp2d6, "rs3892097", "*4"),
    ];
    let (_, trace) = evaluator.evaluate_traced("Codeine", &variants);
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "CYP2D6 rs1065852 *10 -> Intermediate metabolizer; \
         CYP2D6 rs3892097 *4 -> Poor metabolizer (risk)"
    );
}

#[test]
fn test_result_serialization_omits_absent_fields() {
    let evaluator = builtin_evaluator();
    let json = serde_json::to_value(evaluator.evaluate("QuantumDrug", &[])).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"recommendation": "Unknown drug", "confidence": 0.0})
    );

    let json = serde_json::to_value(evaluator.evaluate("Codeine", &[record(Gene::Cyp2d6, "*4")]))
        .unwrap();
    assert_eq!(json["gene"], "CYP2D6");
    assert_eq!(json["phenotype"], "Poor metabolizer");
}
