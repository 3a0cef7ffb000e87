use crate::error::ConfigError;
use crate::variant::Gene;
use ahash::AHashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// The phenotype resource compiled into the crate.
pub const BUNDLED_PHENOTYPES: &str = include_str!("../../data/phenotypes.json");

/// Maps a (gene, star allele) pair to its functional phenotype label.
///
/// The table is loaded once, usually at startup, and is never mutated after it
/// has been handed to an `Evaluator`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhenotypeTable {
    entries: AHashMap<Gene, AHashMap<String, String>>,
}

impl PhenotypeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a two-level JSON object: `{ "GENE": { "*allele": "phenotype" } }`.
    ///
    /// Every top-level key must be one of the supported pharmacogenes.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: AHashMap<String, AHashMap<String, String>> = serde_json::from_str(json)?;
        let mut entries = AHashMap::with_capacity(raw.len());
        for (symbol, alleles) in raw {
            let gene = Gene::from_symbol(&symbol).ok_or(ConfigError::UnknownGene(symbol))?;
            entries.insert(gene, alleles);
        }
        Ok(Self { entries })
    }

    /// Loads a table from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            genes = table.entries.len(),
            alleles = table.len(),
            "Loaded phenotype table"
        );
        Ok(table)
    }

    /// The table shipped with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json(BUNDLED_PHENOTYPES)
    }

    /// Adds or replaces one mapping. Intended for building synthetic tables.
    pub fn with_phenotype(
        mut self,
        gene: Gene,
        star_allele: impl Into<String>,
        phenotype: impl Into<String>,
    ) -> Self {
        self.entries
            .entry(gene)
            .or_default()
            .insert(star_allele.into(), phenotype.into());
        self
    }

    /// Resolves the phenotype for a star allele, `None` when it is not mapped.
    pub fn lookup(&self, gene: Gene, star_allele: &str) -> Option<&str> {
        self.entries
            .get(&gene)
            .and_then(|alleles| alleles.get(star_allele))
            .map(String::as_str)
    }

    pub fn contains_gene(&self, gene: Gene) -> bool {
        self.entries.contains_key(&gene)
    }

    /// Star alleles known for `gene`, sorted for stable output.
    pub fn alleles(&self, gene: Gene) -> Vec<&str> {
        let mut alleles: Vec<&str> = self
            .entries
            .get(&gene)
            .map(|a| a.keys().map(String::as_str).collect())
            .unwrap_or_default();
        alleles.sort_unstable();
        alleles
    }

    /// Total number of (gene, allele) mappings.
    pub fn len(&self) -> usize {
        self.entries.values().map(|alleles| alleles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
