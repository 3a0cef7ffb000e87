use super::gene::Gene;
use serde::{Deserialize, Serialize};

/// Placeholder used for a missing variant ID or star allele.
pub const MISSING_FIELD: &str = ".";

/// A single pharmacogene call extracted from one line of a VCF file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantRecord {
    pub gene: Gene,
    /// The ID column (usually an rsID), or `.` when the file does not name one.
    pub variant_id: String,
    /// The `STAR=` info value, or `.` when absent.
    pub star_allele: String,
}

impl VariantRecord {
    pub fn new(gene: Gene, variant_id: impl Into<String>, star_allele: impl Into<String>) -> Self {
        Self {
            gene,
            variant_id: variant_id.into(),
            star_allele: star_allele.into(),
        }
    }

    pub fn has_star_allele(&self) -> bool {
        self.star_allele != MISSING_FIELD
    }
}
