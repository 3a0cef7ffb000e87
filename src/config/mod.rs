//! Settings loading for PharmaGuard.
//! Reads a TOML file from an explicit path or the path in `PHARMAGUARD_CONFIG`;
//! falls back to built-in defaults when neither is given.

use crate::error::ConfigError;
use crate::knowledge::PhenotypeTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "PHARMAGUARD_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON phenotype table. The bundled table is used when unset.
    pub phenotype_table: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    #[serde(default = "default_sample_dir")]
    pub sample_dir: PathBuf,
    /// Drug name -> VCF file evaluated when the caller supplies no input.
    /// Relative paths resolve against `sample_dir`.
    #[serde(default = "default_input_files")]
    pub defaults: BTreeMap<String, PathBuf>,
}

fn default_sample_dir() -> PathBuf {
    PathBuf::from("sample_vcf")
}

const FULL_PANEL_VCF: &str = "patient_full_pharmacogenomics.vcf";

fn default_input_files() -> BTreeMap<String, PathBuf> {
    [
        ("Codeine", "patient_codeine_poor.vcf"),
        ("Warfarin", "patient_warfarin_adjust.vcf"),
        ("Simvastatin", "patient_simvastatin_toxic.vcf"),
        ("Clopidogrel", FULL_PANEL_VCF),
        ("Azathioprine", FULL_PANEL_VCF),
        ("Fluorouracil", FULL_PANEL_VCF),
    ]
    .into_iter()
    .map(|(drug, file)| (drug.to_string(), PathBuf::from(file)))
    .collect()
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            sample_dir: default_sample_dir(),
            defaults: default_input_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "pharmaguard=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }
        Ok(settings)
    }

    /// Anchors relative paths at `base`, normally the settings file's directory.
    fn resolve_relative_to(&mut self, base: &Path) {
        if let Some(table) = &mut self.knowledge.phenotype_table {
            if table.is_relative() {
                *table = base.join(&*table);
            }
        }
        if self.inputs.sample_dir.is_relative() {
            self.inputs.sample_dir = base.join(&self.inputs.sample_dir);
        }
    }

    /// Explicit path first, then `PHARMAGUARD_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match env::var_os(CONFIG_ENV_VAR) {
                Some(path) => Self::from_file(PathBuf::from(path)),
                None => Ok(Self::default()),
            },
        }
    }

    /// Loads the configured phenotype table, or the bundled one.
    pub fn phenotype_table(&self) -> Result<PhenotypeTable, ConfigError> {
        match &self.knowledge.phenotype_table {
            Some(path) => PhenotypeTable::from_file(path),
            None => PhenotypeTable::bundled(),
        }
    }

    /// The default input registered for `drug`, resolved against the sample directory.
    pub fn default_input(&self, drug: &str) -> Option<PathBuf> {
        self.inputs
            .defaults
            .get(drug)
            .map(|file| self.inputs.sample_dir.join(file))
    }
}
