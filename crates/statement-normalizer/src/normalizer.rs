use forensic_core::{
    CanonicalVariable, CanonicalVariableSet, CellReading, Diagnostic, RawStatementTable,
};
use serde::{Deserialize, Serialize};

use crate::{DataQualitySummary, SynonymTable};

/// Canonical variables plus everything learned while building them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStatements {
    pub variables: CanonicalVariableSet,
    pub diagnostics: Vec<Diagnostic>,
    pub quality: DataQualitySummary,
}

/// Maps raw statement rows onto canonical variables
#[derive(Debug, Clone, Default)]
pub struct LineItemNormalizer {
    synonyms: SynonymTable,
}

impl LineItemNormalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Build the canonical variable set for `table`.
    ///
    /// Never fails: unmatched rows, duplicate matches and unreadable cells
    /// become diagnostics and the affected values stay absent.
    pub fn normalize(&self, table: &RawStatementTable) -> NormalizedStatements {
        let mut variables = CanonicalVariableSet::new(table.years());
        let mut diagnostics: Vec<Diagnostic> = table.import_diagnostics().to_vec();
        let mut duplicate_rows = 0usize;
        let mut unparseable_cells = 0usize;

        for row in table.rows() {
            let Some(variable) = self.synonyms.lookup(&row.item) else {
                tracing::debug!("No canonical match for line item '{}'", row.item);
                diagnostics.push(Diagnostic::UnmappedLineItem {
                    item: row.item.clone(),
                });
                continue;
            };

            // First occurrence wins
            if let Some(kept) = variables.source(variable) {
                duplicate_rows += 1;
                tracing::warn!(
                    "Duplicate line item '{}' for {} (keeping '{}')",
                    row.item,
                    variable,
                    kept
                );
                diagnostics.push(Diagnostic::DuplicateLineItem {
                    variable,
                    item: row.item.clone(),
                    kept: kept.to_string(),
                });
                continue;
            }

            let statement = row.statement.map_or("unlabelled", |s| s.to_label());
            tracing::debug!("Mapped '{}' ({}) to {}", row.item, statement, variable);
            variables.record_source(variable, row.item.clone());

            for year in table.years() {
                let cell = row.cell(year);
                let value = match cell.read() {
                    CellReading::Value(v) => Some(v),
                    CellReading::Blank => None,
                    CellReading::Unparseable => {
                        unparseable_cells += 1;
                        diagnostics.push(Diagnostic::UnparseableCell {
                            item: row.item.clone(),
                            year: year.clone(),
                            raw: cell.as_text(),
                        });
                        None
                    }
                };
                variables.set(variable, year, value);
            }
        }

        for variable in CanonicalVariable::ALL {
            if !variables.is_mapped(variable) {
                diagnostics.push(Diagnostic::MissingVariable { variable });
            }
        }

        if unparseable_cells > 0 {
            tracing::warn!("{} non-numeric values treated as missing", unparseable_cells);
        }

        let quality = DataQualitySummary::assess(&variables, duplicate_rows, unparseable_cells);
        tracing::debug!(
            "Normalized {} of {} canonical variables ({:.1}% complete)",
            quality.mapped_variables,
            CanonicalVariable::ALL.len(),
            quality.completeness_pct
        );

        NormalizedStatements {
            variables,
            diagnostics,
            quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forensic_core::{FiscalYear, RawCell, RawRow, Statement};

    fn years() -> Vec<FiscalYear> {
        vec![2022.into(), 2023.into()]
    }

    #[test]
    fn test_net_sales_and_total_revenue_are_equivalent() {
        let normalizer = LineItemNormalizer::default();

        let a = RawStatementTable::new(
            years(),
            vec![RawRow::new(Statement::IncomeStatement, "Net Sales")
                .with(2022, 100.0)
                .with(2023, 120.0)],
        )
        .unwrap();
        let b = RawStatementTable::new(
            years(),
            vec![RawRow::new(Statement::IncomeStatement, "Total Revenue")
                .with(2022, 100.0)
                .with(2023, 120.0)],
        )
        .unwrap();

        let va = normalizer.normalize(&a).variables;
        let vb = normalizer.normalize(&b).variables;
        for year in years() {
            assert_eq!(
                va.get(CanonicalVariable::Revenue, &year),
                vb.get(CanonicalVariable::Revenue, &year)
            );
        }
        assert_eq!(va.get(CanonicalVariable::Revenue, &2023.into()), Some(120.0));
    }

    #[test]
    fn test_first_match_wins_with_diagnostic() {
        let table = RawStatementTable::new(
            years(),
            vec![
                RawRow::new(Statement::IncomeStatement, "Revenue").with(2022, 100.0),
                RawRow::new(Statement::IncomeStatement, "Net Sales").with(2022, 999.0),
            ],
        )
        .unwrap();

        let result = LineItemNormalizer::default().normalize(&table);
        assert_eq!(result.variables.get(CanonicalVariable::Revenue, &2022.into()), Some(100.0));
        assert_eq!(result.variables.source(CanonicalVariable::Revenue), Some("Revenue"));
        assert!(result.diagnostics.contains(&Diagnostic::DuplicateLineItem {
            variable: CanonicalVariable::Revenue,
            item: "Net Sales".to_string(),
            kept: "Revenue".to_string(),
        }));
        assert_eq!(result.quality.duplicate_rows, 1);
    }

    #[test]
    fn test_unmatched_variables_stay_absent() {
        let table = RawStatementTable::new(
            years(),
            vec![RawRow::new(Statement::BalanceSheet, "Goodwill").with(2022, 5.0)],
        )
        .unwrap();

        let result = LineItemNormalizer::default().normalize(&table);
        for variable in CanonicalVariable::ALL {
            for year in years() {
                assert_eq!(result.variables.get(variable, &year), None);
            }
            assert!(result
                .diagnostics
                .contains(&Diagnostic::MissingVariable { variable }));
        }
        assert!(result.diagnostics.contains(&Diagnostic::UnmappedLineItem {
            item: "Goodwill".to_string()
        }));
    }

    #[test]
    fn test_bad_cells_become_absent() {
        let table = RawStatementTable::new(
            years(),
            vec![RawRow::new(Statement::CashFlow, "Operating Cash Flow")
                .with(2022, "twelve")
                .with(2023, RawCell::Blank)],
        )
        .unwrap();

        let result = LineItemNormalizer::default().normalize(&table);
        assert_eq!(result.variables.get(CanonicalVariable::OperatingCashFlow, &2022.into()), None);
        assert_eq!(result.variables.get(CanonicalVariable::OperatingCashFlow, &2023.into()), None);
        assert!(result.variables.is_mapped(CanonicalVariable::OperatingCashFlow));
        assert_eq!(result.quality.unparseable_cells, 1);
        assert!(result.diagnostics.contains(&Diagnostic::UnparseableCell {
            item: "Operating Cash Flow".to_string(),
            year: 2022.into(),
            raw: "twelve".to_string(),
        }));
    }

    #[test]
    fn test_missing_year_cells_stay_absent() {
        let table = RawStatementTable::new(
            vec![2022.into(), 2023.into(), 2024.into()],
            vec![RawRow::new(Statement::BalanceSheet, "Total Assets")
                .with(2022, 10.0)
                .with(2024, 30.0)],
        )
        .unwrap();

        let vars = LineItemNormalizer::default().normalize(&table).variables;
        assert_eq!(vars.get(CanonicalVariable::TotalAssets, &2023.into()), None);
        assert_eq!(vars.get(CanonicalVariable::TotalAssets, &2024.into()), Some(30.0));
    }

    #[test]
    fn test_custom_alias() {
        let normalizer =
            LineItemNormalizer::new(SynonymTable::standard().with_alias("Umsatz", CanonicalVariable::Revenue));
        let table = RawStatementTable::new(
            years(),
            vec![RawRow::new(Statement::IncomeStatement, "Umsatz").with(2023, 50.0)],
        )
        .unwrap();

        let vars = normalizer.normalize(&table).variables;
        assert_eq!(vars.get(CanonicalVariable::Revenue, &2023.into()), Some(50.0));
    }

    #[test]
    fn test_import_diagnostics_are_carried() {
        let columns: Vec<String> = ["Statement", "Item", "2023"].iter().map(|s| s.to_string()).collect();
        let rows: Vec<Vec<RawCell>> = vec![vec!["Notes".into(), "Revenue".into(), 1.0.into()]];
        let table = RawStatementTable::from_grid(&columns, rows).unwrap();

        let result = LineItemNormalizer::default().normalize(&table);
        assert!(matches!(
            result.diagnostics.first(),
            Some(Diagnostic::UnknownStatement { row: 0, .. })
        ));
        assert_eq!(result.variables.get(CanonicalVariable::Revenue, &2023.into()), Some(1.0));
    }

    #[test]
    fn test_statement_label_does_not_gate_matching() {
        let columns: Vec<String> = ["Statement", "Item", "2023"].iter().map(|s| s.to_string()).collect();
        for label in ["Statement of Operations", "Profit & Loss", "Statement of Income", "Results", ""] {
            let rows: Vec<Vec<RawCell>> = vec![vec![label.into(), "Total Revenue".into(), 1000.0.into()]];
            let table = RawStatementTable::from_grid(&columns, rows).unwrap();

            let vars = LineItemNormalizer::default().normalize(&table).variables;
            assert_eq!(
                vars.get(CanonicalVariable::Revenue, &2023.into()),
                Some(1000.0),
                "statement '{}'",
                label
            );
        }
    }
}
