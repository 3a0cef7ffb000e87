pub mod extractor;
pub mod gene;
pub mod record;

pub use extractor::*;
pub use gene::*;
pub use record::*;
