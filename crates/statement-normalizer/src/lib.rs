//! Line-item normalization
//!
//! Maps free-text statement labels onto the canonical variable set used by
//! the forensic score calculators, and summarizes how complete the result is.

pub mod normalizer;
pub mod quality;
pub mod synonyms;

pub use normalizer::{LineItemNormalizer, NormalizedStatements};
pub use quality::DataQualitySummary;
pub use synonyms::{normalize_label, parse_aliases, SynonymTable};
