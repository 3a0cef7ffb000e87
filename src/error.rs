use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading settings or the static knowledge tables.
///
/// These are startup failures: a process that hits one must not go on to serve
/// evaluations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration resource '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse phenotype table: {0}")]
    PhenotypeParse(#[from] serde_json::Error),

    #[error("Failed to parse settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Phenotype table lists '{0}', which is not a supported pharmacogene")]
    UnknownGene(String),

    #[error("Rule for drug '{0}' does not require any gene")]
    EmptyRule(String),

    #[error("Drug '{0}' is defined more than once in the rule table")]
    DuplicateRule(String),
}

/// The variant input could not be opened or read at all.
///
/// Malformed individual rows never produce this error; they are skipped.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid VCF file '{path}': {source}")]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid VCF input: {0}")]
    Unreadable(#[source] std::io::Error),
}

/// Errors reported by an explanation generator.
#[derive(Error, Debug, Clone)]
pub enum ExplanationError {
    #[error("Explanation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Explanation backend returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while rendering a clinical report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to encode PDF content stream: {0}")]
    Encode(String),

    #[error("Failed to write PDF document: {0}")]
    Write(#[from] std::io::Error),
}

/// Errors surfaced by the end-to-end analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidFile(#[from] ExtractionError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),
}
