//! The end-to-end analysis flow: pick an input, extract calls, evaluate the
//! drug, explain the result and render the PDF report.

use crate::config::Settings;
use crate::error::{AnalysisError, ConfigError, ReportError};
use crate::evaluator::{EvaluationResult, Evaluator};
use crate::explain::{ExplanationGenerator, ExplanationRequest, TemplateExplainer, WithFallback};
use crate::knowledge::RuleTable;
use crate::report::{ClinicalReport, PdfRenderer, ReportRenderer};
use crate::variant::{VariantRecord, extract_bytes, extract_path};
use ahash::AHashMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

pub const NO_INPUT_EXPLANATION: &str =
    "No VCF file provided. Please upload a VCF file for analysis.";

/// Where the variant calls for an analysis come from.
#[derive(Debug, Clone)]
pub enum VariantSource {
    /// Raw file contents supplied by the caller.
    Upload(Vec<u8>),
    /// A file on disk.
    Path(PathBuf),
    /// The file pre-registered for the drug, if any.
    Default,
}

/// What an analysis returns to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub drug: String,
    pub result: EvaluationResult,
    pub confidence: f64,
    pub explanation: Option<String>,
    /// The PDF report, standard base64. Empty when nothing was evaluated.
    pub pdf_base64: String,
}

impl AnalysisResponse {
    /// The response when there is neither an input nor a default for the drug.
    pub fn no_input(drug: &str) -> Self {
        Self {
            drug: drug.to_string(),
            result: EvaluationResult::no_input(),
            confidence: 0.0,
            explanation: Some(NO_INPUT_EXPLANATION.to_string()),
            pdf_base64: String::new(),
        }
    }

    /// Decodes the embedded PDF report.
    pub fn pdf_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.pdf_base64)
    }
}

/// Runs analyses against a fixed evaluator and set of collaborators.
///
/// All state is read-only after construction, so one `Analyzer` can serve
/// concurrent requests.
pub struct Analyzer {
    evaluator: Evaluator,
    explainer: WithFallback<Box<dyn ExplanationGenerator>>,
    renderer: Box<dyn ReportRenderer>,
    default_inputs: AHashMap<String, PathBuf>,
}

pub struct AnalyzerBuilder {
    evaluator: Evaluator,
    explainer: Box<dyn ExplanationGenerator>,
    renderer: Box<dyn ReportRenderer>,
    default_inputs: AHashMap<String, PathBuf>,
}

impl AnalyzerBuilder {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            explainer: Box::new(TemplateExplainer),
            renderer: Box::new(PdfRenderer),
            default_inputs: AHashMap::new(),
        }
    }

    pub fn with_explainer(mut self, explainer: Box<dyn ExplanationGenerator>) -> Self {
        self.explainer = explainer;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Registers the file evaluated for `drug` when no input is supplied.
    pub fn with_default_input(mut self, drug: &str, path: impl Into<PathBuf>) -> Self {
        self.default_inputs.insert(drug.to_string(), path.into());
        self
    }

    pub fn build(self) -> Analyzer {
        Analyzer {
            evaluator: self.evaluator,
            explainer: WithFallback::new(self.explainer),
            renderer: self.renderer,
            default_inputs: self.default_inputs,
        }
    }
}

impl Analyzer {
    pub fn builder(evaluator: Evaluator) -> AnalyzerBuilder {
        AnalyzerBuilder::new(evaluator)
    }

    /// Builds an analyzer over the built-in rules, the configured phenotype
    /// table and the configured default inputs.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let evaluator = Evaluator::new(RuleTable::builtin(), settings.phenotype_table()?);
        let mut builder = Self::builder(evaluator);
        for drug in settings.inputs.defaults.keys() {
            if let Some(path) = settings.default_input(drug) {
                builder = builder.with_default_input(drug, path);
            }
        }
        info!(
            drugs = builder.evaluator.rules().len(),
            defaults = builder.default_inputs.len(),
            "Analyzer ready"
        );
        Ok(builder.build())
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn default_input(&self, drug: &str) -> Option<&PathBuf> {
        self.default_inputs.get(drug)
    }

    /// Analyzes `drug` against the calls in `source`.
    ///
    /// Fails only when the input cannot be read or the report cannot be
    /// rendered. A `Default` source with no usable registration yields the
    /// upload prompt instead of an error.
    pub fn analyze(
        &self,
        drug: &str,
        source: VariantSource,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let summary = match source {
            VariantSource::Upload(bytes) => extract_bytes(&bytes),
            VariantSource::Path(path) => extract_path(&path)?,
            VariantSource::Default => match self.default_input(drug) {
                Some(path) if path.exists() => {
                    debug!(drug, path = %path.display(), "Using default input");
                    extract_path(path)?
                }
                _ => {
                    debug!(drug, "No input and no default registered");
                    return Ok(AnalysisResponse::no_input(drug));
                }
            },
        };

        Ok(self.analyze_records(drug, &summary.records)?)
    }

    /// Evaluates already-extracted calls, then explains and renders the result.
    pub fn analyze_records(
        &self,
        drug: &str,
        records: &[VariantRecord],
    ) -> Result<AnalysisResponse, ReportError> {
        let result = self.evaluator.evaluate(drug, records);

        let explanation = result.gene.map(|gene| {
            let request = ExplanationRequest::new(drug, gene, result.phenotype.clone());
            self.explainer.explain_or_template(&request)
        });

        let report = ClinicalReport::new(drug, result.clone(), explanation.clone());
        let pdf = self.renderer.render(&report)?;

        Ok(AnalysisResponse {
            drug: drug.to_string(),
            confidence: result.confidence,
            result,
            explanation,
            pdf_base64: STANDARD.encode(pdf),
        })
    }
}
