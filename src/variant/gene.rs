use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The pharmacogenes this engine knows how to interpret.
///
/// Variant calls for any other gene are dropped during extraction, so every
/// `VariantRecord` carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gene {
    #[serde(rename = "CYP2D6")]
    Cyp2d6,
    #[serde(rename = "CYP2C19")]
    Cyp2c19,
    #[serde(rename = "CYP2C9")]
    Cyp2c9,
    #[serde(rename = "SLCO1B1")]
    Slco1b1,
    #[serde(rename = "TPMT")]
    Tpmt,
    #[serde(rename = "DPYD")]
    Dpyd,
}

/// Every target gene, in allow-list order.
pub const TARGET_GENES: [Gene; 6] = [
    Gene::Cyp2d6,
    Gene::Cyp2c19,
    Gene::Cyp2c9,
    Gene::Slco1b1,
    Gene::Tpmt,
    Gene::Dpyd,
];

impl Gene {
    /// The HGNC symbol, exactly as it appears in `GENE=` info entries.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gene::Cyp2d6 => "CYP2D6",
            Gene::Cyp2c19 => "CYP2C19",
            Gene::Cyp2c9 => "CYP2C9",
            Gene::Slco1b1 => "SLCO1B1",
            Gene::Tpmt => "TPMT",
            Gene::Dpyd => "DPYD",
        }
    }

    /// Case-sensitive lookup against the allow-list.
    pub fn from_symbol(symbol: &str) -> Option<Gene> {
        TARGET_GENES.into_iter().find(|gene| gene.symbol() == symbol)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

/// Returned when a symbol is not one of the target genes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedGene(pub String);

impl fmt::Display for UnsupportedGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a supported pharmacogene", self.0)
    }
}

impl std::error::Error for UnsupportedGene {}

impl FromStr for Gene {
    type Err = UnsupportedGene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gene::from_symbol(s).ok_or_else(|| UnsupportedGene(s.to_string()))
    }
}
