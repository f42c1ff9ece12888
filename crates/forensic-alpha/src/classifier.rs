use forensic_core::{FiscalYear, Recommendation};
use std::collections::BTreeMap;

use crate::AlphaSeries;

/// Recommendation for every year that has an alpha. Years without one are
/// left out rather than defaulted to Hold.
pub fn classify(alpha: &AlphaSeries) -> BTreeMap<FiscalYear, Recommendation> {
    alpha
        .rows
        .iter()
        .map(|row| (row.year.clone(), Recommendation::from_alpha(row.alpha)))
        .collect()
}
