//! Common test utilities for building VCF inputs and knowledge tables.
use pharmaguard::prelude::*;

pub const VCF_HEADER: &str = "##fileformat=VCFv4.2\n\
     ##INFO=<ID=GENE,Number=1,Type=String,Description=\"Gene\">\n\
     #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

/// Builds one well-formed data line with the given ID and info column.
#[allow(dead_code)]
pub fn vcf_line(id: &str, info: &str) -> String {
    format!("22\t42130692\t{}\tG\tA\t99\tPASS\t{}", id, info)
}

/// Joins data lines under a standard header.
#[allow(dead_code)]
pub fn vcf_document(lines: &[String]) -> String {
    let mut doc = VCF_HEADER.to_string();
    for line in lines {
        doc.push_str(line);
        doc.push('\n');
    }
    doc
}

/// An evaluator over the built-in rules and the bundled phenotype table.
#[allow(dead_code)]
pub fn builtin_evaluator() -> Evaluator {
    Evaluator::new(
        RuleTable::builtin(),
        PhenotypeTable::bundled().expect("bundled phenotype table must parse"),
    )
}

/// A small phenotype table independent of the bundled resource.
///
/// CYP2D6: *4 poor, *1 normal. CYP2C19: *2 poor, *1 normal.
#[allow(dead_code)]
pub fn synthetic_phenotypes() -> PhenotypeTable {
    PhenotypeTable::new()
        .with_phenotype(Gene::Cyp2d6, "*4", "Poor metabolizer")
        .with_phenotype(Gene::Cyp2d6, "*1", "Normal metabolizer")
        .with_phenotype(Gene::Cyp2c19, "*2", "Poor metabolizer")
        .with_phenotype(Gene::Cyp2c19, "*1", "Normal metabolizer")
}

/// A rule table with a single two-gene drug, "Dualdrug" (CYP2D6 then CYP2C19).
#[allow(dead_code)]
pub fn two_gene_rules() -> RuleTable {
    RuleTable::builder()
        .with_rule(DrugRule::new(
            "Dualdrug",
            [Gene::Cyp2d6, Gene::Cyp2c19],
            "Poor metabolizer",
            "Avoid",
        ))
        .build()
        .expect("two-gene rule table must build")
}

#[allow(dead_code)]
pub fn record(gene: Gene, star: &str) -> VariantRecord {
    VariantRecord::new(gene, "rs0", star)
}
