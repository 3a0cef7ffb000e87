//! # PharmaGuard - Pharmacogenomic Risk Evaluation
//!
//! **PharmaGuard** reads VCF-style variant calls, keeps the calls for a fixed
//! panel of pharmacogenes, and judges a drug against a small table of
//! clinical rules. Every evaluation yields a recommendation and a confidence
//! score; the analysis pipeline adds a clinical explanation and a PDF report.
//!
//! ## Core Workflow
//!
//! 1.  **Load the knowledge tables**: a `PhenotypeTable` (star allele to phenotype,
//!     from JSON) and a `RuleTable` (drug to gene, risk phenotype and recommendation).
//! 2.  **Build an evaluator**: `Evaluator::new` takes both tables by value. They are
//!     never mutated afterwards, so the evaluator can be shared freely.
//! 3.  **Extract calls**: `variant::extract_path` (or `extract` for in-memory text)
//!     returns the target-gene calls of a file. Malformed rows are skipped, never fatal.
//! 4.  **Evaluate**: `Evaluator::evaluate` maps the calls to an `EvaluationResult`.
//!     Unknown drugs and missing genes produce sentinel recommendations, not errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pharmaguard::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     // 1. Load the bundled phenotype table and the built-in drug rules.
//!     let evaluator = Evaluator::new(RuleTable::builtin(), PhenotypeTable::bundled()?);
//!
//!     // 2. Extract calls from a VCF file.
//!     let vcf = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
//!                22\t42130692\trs3892097\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*4\n";
//!     let variants = extract(vcf);
//!
//!     // 3. Evaluate a drug.
//!     let result = evaluator.evaluate("Codeine", &variants);
//!     println!("-> Recommendation: {}", result.recommendation);
//!     println!("-> Confidence: {}", result.confidence);
//!
//!     // 4. Or run the whole pipeline, including explanation and PDF report.
//!     let analyzer = Analyzer::builder(evaluator).build();
//!     let response = analyzer.analyze("Codeine", VariantSource::Upload(vcf.as_bytes().to_vec()))?;
//!     println!("-> Report size: {} bytes (base64)", response.pdf_base64.len());
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod explain;
pub mod knowledge;
pub mod prelude;
pub mod report;
pub mod trace;
pub mod variant;
