use forensic_core::{CanonicalVariable, CanonicalVariableSet, FiscalYear};
use serde::{Deserialize, Serialize};

/// How much usable data the normalized table holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualitySummary {
    pub years: Vec<FiscalYear>,
    /// Canonical variables backed by an input row
    pub mapped_variables: usize,
    pub missing_variables: Vec<CanonicalVariable>,
    /// Present cells as a percentage of mapped variables × years
    pub completeness_pct: f64,
    /// Rows dropped because an earlier row mapped to the same variable
    pub duplicate_rows: usize,
    /// Cells treated as missing because they were not numeric
    pub unparseable_cells: usize,
}

impl DataQualitySummary {
    pub fn assess(
        variables: &CanonicalVariableSet,
        duplicate_rows: usize,
        unparseable_cells: usize,
    ) -> Self {
        let mapped = variables.mapped_count();
        let capacity = mapped * variables.years().len();
        let completeness_pct = if capacity > 0 {
            variables.present_count() as f64 / capacity as f64 * 100.0
        } else {
            0.0
        };

        Self {
            years: variables.years().to_vec(),
            mapped_variables: mapped,
            missing_variables: CanonicalVariable::ALL
                .into_iter()
                .filter(|v| !variables.is_mapped(*v))
                .collect(),
            completeness_pct,
            duplicate_rows,
            unparseable_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_completeness() {
        let mut vars = CanonicalVariableSet::new(&[2022.into(), 2023.into()])
            .with(CanonicalVariable::Revenue, 2022, 100.0)
            .with(CanonicalVariable::Revenue, 2023, 120.0)
            .with(CanonicalVariable::NetIncome, 2023, 10.0);
        vars.record_source(CanonicalVariable::Revenue, "Revenue");
        vars.record_source(CanonicalVariable::NetIncome, "Net Income");

        let summary = DataQualitySummary::assess(&vars, 1, 2);
        assert_eq!(summary.mapped_variables, 2);
        assert_relative_eq!(summary.completeness_pct, 75.0);
        assert_eq!(summary.missing_variables.len(), CanonicalVariable::ALL.len() - 2);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.unparseable_cells, 2);
    }

    #[test]
    fn test_empty_table_completeness() {
        let vars = CanonicalVariableSet::new(&[2023.into()]);
        let summary = DataQualitySummary::assess(&vars, 0, 0);
        assert_eq!(summary.completeness_pct, 0.0);
        assert_eq!(summary.years, vec![FiscalYear::from(2023)]);
    }
}
