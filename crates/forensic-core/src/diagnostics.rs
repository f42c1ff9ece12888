use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CanonicalVariable, FiscalYear};

/// Non-fatal input problem recorded while building canonical variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Grid row that could not be read as a line item
    MalformedRow { row: usize, reason: String },
    /// Grid row whose Statement column is not a known statement; the line
    /// item is still matched
    UnknownStatement { row: usize, label: String },
    /// Cell that is neither blank nor numeric; treated as absent
    UnparseableCell {
        item: String,
        year: FiscalYear,
        raw: String,
    },
    /// Line item matching no canonical variable
    UnmappedLineItem { item: String },
    /// Line item ignored because an earlier row already mapped to the variable
    DuplicateLineItem {
        variable: CanonicalVariable,
        item: String,
        kept: String,
    },
    /// Canonical variable with no matching line item
    MissingVariable { variable: CanonicalVariable },
}

impl Diagnostic {
    /// Unmapped items and missing variables are expected for partial
    /// statements; everything else points at a malformed input.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            Diagnostic::UnmappedLineItem { .. } | Diagnostic::MissingVariable { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRow { row, reason } => write!(f, "row {}: {}", row, reason),
            Diagnostic::UnknownStatement { row, label } => {
                write!(f, "row {}: unknown statement '{}', matching item by name only", row, label)
            }
            Diagnostic::UnparseableCell { item, year, raw } => {
                write!(f, "'{}' {}: non-numeric value '{}' treated as missing", item, year, raw)
            }
            Diagnostic::UnmappedLineItem { item } => {
                write!(f, "'{}' does not match any canonical variable", item)
            }
            Diagnostic::DuplicateLineItem { variable, item, kept } => write!(
                f,
                "'{}' also maps to {}; using first occurrence '{}'",
                item, variable, kept
            ),
            Diagnostic::MissingVariable { variable } => {
                write!(f, "no line item found for {}", variable)
            }
        }
    }
}
