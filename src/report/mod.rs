use crate::error::ReportError;
use crate::evaluator::EvaluationResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

mod pdf;

pub use pdf::PdfRenderer;

pub const REPORT_TITLE: &str = "PharmaGuard Clinical Pharmacogenomics Report";

pub const DISCLAIMER: &str = "Disclaimer: This report is generated using rule-based pharmacogenomic \
     evaluation aligned with CPIC-style clinical guidelines. Clinical decisions should be \
     validated by a licensed healthcare professional.";

/// Colour band of the risk banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    /// Green.
    Safe,
    /// Orange: dose adjustment advised.
    Caution,
    /// Red: everything else, unknowns included.
    High,
}

impl RiskLevel {
    pub fn from_recommendation(recommendation: &str) -> Self {
        if recommendation.contains("Safe") {
            RiskLevel::Safe
        } else if recommendation.contains("Reduce") || recommendation.contains("Adjust") {
            RiskLevel::Caution
        } else {
            RiskLevel::High
        }
    }

    /// Fill colour as RGB components in `0.0..=1.0`.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            RiskLevel::Safe => (0.0, 0.5, 0.0),
            RiskLevel::Caution => (1.0, 0.65, 0.0),
            RiskLevel::High => (1.0, 0.0, 0.0),
        }
    }
}

/// Everything a clinical report shows, independent of how it is laid out.
#[derive(Debug, Clone)]
pub struct ClinicalReport {
    pub drug: String,
    pub result: EvaluationResult,
    pub explanation: Option<String>,
    pub generated_at: DateTime<Local>,
}

impl ClinicalReport {
    pub fn new(drug: impl Into<String>, result: EvaluationResult, explanation: Option<String>) -> Self {
        Self {
            drug: drug.into(),
            result,
            explanation,
            generated_at: Local::now(),
        }
    }

    pub fn generated_at(mut self, timestamp: DateTime<Local>) -> Self {
        self.generated_at = timestamp;
        self
    }

    pub fn timestamp_line(&self) -> String {
        format!("Generated on: {}", self.generated_at.format("%Y-%m-%d %H:%M"))
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_recommendation(&self.result.recommendation)
    }

    pub fn banner(&self) -> String {
        format!("RISK STATUS: {}", self.result.recommendation.to_uppercase())
    }

    /// Confidence as a whole percentage, truncated.
    pub fn confidence_percent(&self) -> i64 {
        (self.result.confidence * 100.0) as i64
    }

    /// Rows of the "Patient Drug Assessment" table.
    pub fn assessment_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Drug", self.drug.clone()),
            ("Recommendation", self.result.recommendation.clone()),
            ("Confidence Score", format!("{}%", self.confidence_percent())),
        ]
    }

    /// Rows of the "Genetic Findings" table, present only when a gene was resolved.
    pub fn findings_rows(&self) -> Option<Vec<(&'static str, String)>> {
        let gene = self.result.gene?;
        Some(vec![
            ("Gene", gene.to_string()),
            (
                "Phenotype",
                self.result
                    .phenotype
                    .clone()
                    .unwrap_or_else(|| "Not determined".to_string()),
            ),
        ])
    }
}

/// Turns a `ClinicalReport` into a document.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &ClinicalReport) -> Result<Vec<u8>, ReportError>;

    /// Renders and writes the document to `path`.
    fn render_to_file(&self, report: &ClinicalReport, path: &Path) -> Result<(), ReportError> {
        let bytes = self.render(report)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
