pub mod phenotype;
pub mod rules;

pub use phenotype::*;
pub use rules::*;
