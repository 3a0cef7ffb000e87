//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! pharmaguard crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use pharmaguard::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let evaluator = Evaluator::new(RuleTable::builtin(), PhenotypeTable::bundled()?);
//! let summary = extract_path("sample_vcf/patient_codeine_poor.vcf")?;
//! let result = evaluator.evaluate("Codeine", &summary.records);
//!
//! println!("Recommendation: {} ({:.0}%)", result.recommendation, result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::analysis::{AnalysisResponse, Analyzer, VariantSource};
pub use crate::config::Settings;

// Core evaluation
pub use crate::evaluator::{EvaluationResult, Evaluator, RecommendationKind};
pub use crate::knowledge::{DrugRule, PhenotypeTable, RuleTable};
pub use crate::variant::{
    ExtractionSummary, Gene, LineOutcome, SkipReason, VariantRecord, extract, extract_bytes,
    extract_path,
};

// Collaborators
pub use crate::explain::{ExplanationGenerator, ExplanationRequest, TemplateExplainer};
pub use crate::report::{ClinicalReport, PdfRenderer, ReportRenderer, RiskLevel};

// Trace formatting
pub use crate::trace::{EvaluationTrace, TraceFormatter};

// Error types
pub use crate::error::{AnalysisError, ConfigError, ExtractionError, ReportError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
