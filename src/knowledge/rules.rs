use crate::error::ConfigError;
use crate::variant::Gene;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// How a single drug is judged from a patient's pharmacogene calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRule {
    pub drug: String,
    /// Genes consulted for this drug, in evaluation order. Never empty.
    pub required_genes: Vec<Gene>,
    /// The phenotype that triggers `recommendation_on_risk`.
    pub risk_phenotype: String,
    pub recommendation_on_risk: String,
}

impl DrugRule {
    pub fn new(
        drug: impl Into<String>,
        required_genes: impl IntoIterator<Item = Gene>,
        risk_phenotype: impl Into<String>,
        recommendation_on_risk: impl Into<String>,
    ) -> Self {
        Self {
            drug: drug.into(),
            required_genes: required_genes.into_iter().collect(),
            risk_phenotype: risk_phenotype.into(),
            recommendation_on_risk: recommendation_on_risk.into(),
        }
    }
}

/// (drug, gene, risk phenotype, recommendation on risk)
const BUILTIN_RULES: [(&str, Gene, &str, &str); 6] = [
    ("Codeine", Gene::Cyp2d6, "Poor metabolizer", "Ineffective"),
    ("Warfarin", Gene::Cyp2c9, "Poor metabolizer", "Reduce dose"),
    ("Simvastatin", Gene::Slco1b1, "High toxicity risk", "Toxic risk"),
    ("Clopidogrel", Gene::Cyp2c19, "Poor metabolizer", "Reduce efficacy"),
    ("Azathioprine", Gene::Tpmt, "Low activity", "Risk of toxicity"),
    ("Fluorouracil", Gene::Dpyd, "Deficient", "Risk of severe toxicity"),
];

/// The set of supported drugs and their rules, keyed by exact drug name.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<DrugRule>,
    index: AHashMap<String, usize>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    /// The six drugs the engine supports out of the box.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(drug, gene, risk, result)| DrugRule::new(*drug, [*gene], *risk, *result))
            .collect();
        Self::from_validated(rules)
    }

    fn from_validated(rules: Vec<DrugRule>) -> Self {
        let index = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.drug.clone(), i))
            .collect();
        Self { rules, index }
    }

    /// Looks a drug up by its exact, case-sensitive name.
    pub fn get(&self, drug: &str) -> Option<&DrugRule> {
        self.index.get(drug).map(|&i| &self.rules[i])
    }

    /// Supported drug names in registration order.
    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.drug.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrugRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Assembles a validated `RuleTable`.
pub struct RuleTableBuilder {
    rules: Vec<DrugRule>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Starts from the built-in drug rules.
    pub fn with_builtin_rules(mut self) -> Self {
        self.rules.extend(RuleTable::builtin().rules);
        self
    }

    pub fn with_rule(mut self, rule: DrugRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rejects rules without genes and drugs registered twice.
    pub fn build(self) -> Result<RuleTable, ConfigError> {
        let mut seen = AHashSet::with_capacity(self.rules.len());
        for rule in &self.rules {
            if rule.required_genes.is_empty() {
                return Err(ConfigError::EmptyRule(rule.drug.clone()));
            }
            if !seen.insert(rule.drug.as_str()) {
                return Err(ConfigError::DuplicateRule(rule.drug.clone()));
            }
        }
        Ok(RuleTable::from_validated(self.rules))
    }
}

impl Default for RuleTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
