//! Clinical explanation generators.
//!
//! The pipeline asks for an explanation only when an evaluation resolved a
//! gene. Remote text generation is left to implementors of
//! [`ExplanationGenerator`]; the crate ships the deterministic template used
//! whenever no backend is configured or a backend fails.

use crate::error::ExplanationError;
use crate::variant::Gene;
use tracing::warn;

/// The inputs an explanation is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationRequest {
    pub drug: String,
    pub gene: Gene,
    pub phenotype: Option<String>,
}

impl ExplanationRequest {
    pub fn new(drug: impl Into<String>, gene: Gene, phenotype: Option<String>) -> Self {
        Self {
            drug: drug.into(),
            gene,
            phenotype,
        }
    }

    fn phenotype_or_unknown(&self) -> &str {
        self.phenotype.as_deref().unwrap_or("unknown")
    }

    /// The prompt a language-model backend is expected to answer.
    pub fn prompt(&self) -> String {
        format!(
            "Explain pharmacogenomic impact:\n\n\
             Drug: {}\n\
             Gene: {}\n\
             Phenotype: {}\n\n\
             Include:\n\
             - Mechanism\n\
             - Clinical impact\n\
             - Recommendation\n\
             Keep concise.",
            self.drug,
            self.gene,
            self.phenotype_or_unknown()
        )
    }
}

/// Produces a clinician-facing explanation of an evaluation.
pub trait ExplanationGenerator: Send + Sync {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplanationError>;
}

impl<T: ExplanationGenerator + ?Sized> ExplanationGenerator for Box<T> {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        (**self).explain(request)
    }
}

/// Fills a fixed template. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn render(request: &ExplanationRequest) -> String {
        let phenotype = request.phenotype_or_unknown();
        format!(
            "This patient has {} status for {}.\n\
             This affects how {} is metabolized.\n\
             Clinical Recommendation: {}.",
            phenotype, request.gene, request.drug, phenotype
        )
    }
}

impl ExplanationGenerator for TemplateExplainer {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        Ok(Self::render(request))
    }
}

/// Wraps a primary generator and falls back to the template when it fails or
/// returns only whitespace.
pub struct WithFallback<P> {
    primary: P,
}

impl<P: ExplanationGenerator> WithFallback<P> {
    pub fn new(primary: P) -> Self {
        Self { primary }
    }

    /// Always returns some text.
    pub fn explain_or_template(&self, request: &ExplanationRequest) -> String {
        match self.primary.explain(request) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(drug = %request.drug, "Explanation backend returned empty text, using template");
                TemplateExplainer::render(request)
            }
            Err(e) => {
                warn!(drug = %request.drug, error = %e, "Explanation backend failed, using template");
                TemplateExplainer::render(request)
            }
        }
    }
}

impl<P: ExplanationGenerator> ExplanationGenerator for WithFallback<P> {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        Ok(self.explain_or_template(request))
    }
}
