use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Diagnostic, ForensicError};

/// Fiscal year label as it appears in the input table (e.g. "2023").
///
/// Labels that parse as integers order numerically; anything else orders
/// after them, lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(String);

impl FiscalYear {
    pub fn new(label: impl Into<String>) -> Result<Self, ForensicError> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(ForensicError::InvalidLabel("empty year label".to_string()));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i32> for FiscalYear {
    fn from(year: i32) -> Self {
        Self(year.to_string())
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for FiscalYear {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for FiscalYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Financial statement a line item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    #[serde(rename = "Income Statement")]
    IncomeStatement,
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    #[serde(rename = "Cash Flow")]
    CashFlow,
}

impl Statement {
    pub fn to_label(&self) -> &'static str {
        match self {
            Statement::IncomeStatement => "Income Statement",
            Statement::BalanceSheet => "Balance Sheet",
            Statement::CashFlow => "Cash Flow",
        }
    }
}

impl FromStr for Statement {
    type Err = ForensicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "incomestatement" | "income" | "is" | "statementofincome" | "profitandloss"
            | "profitloss" | "pl" | "pnl" | "statementofoperations" | "operations"
            | "comprehensiveincome" | "statementofcomprehensiveincome" => {
                Ok(Statement::IncomeStatement)
            }
            "balancesheet" | "balance" | "bs" | "statementoffinancialposition" => {
                Ok(Statement::BalanceSheet)
            }
            "cashflow" | "cashflows" | "cashflowstatement" | "statementofcashflows" | "cf" => {
                Ok(Statement::CashFlow)
            }
            _ => Err(ForensicError::InvalidLabel(format!("unknown statement '{}'", s.trim()))),
        }
    }
}

/// A single input cell before numeric coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Blank,
}

/// Outcome of coercing a [`RawCell`] to a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellReading {
    Value(f64),
    Blank,
    Unparseable,
}

impl RawCell {
    /// Coerce the cell to a finite number.
    ///
    /// Accepts thousands separators, a currency sign on either side of the
    /// minus sign and accounting negatives such as `(1,200)` or `$(1,200)`.
    /// Placeholders like `-` or `n/a` read as blank.
    pub fn read(&self) -> CellReading {
        match self {
            RawCell::Blank => CellReading::Blank,
            RawCell::Number(v) if v.is_finite() => CellReading::Value(*v),
            RawCell::Number(_) => CellReading::Unparseable,
            RawCell::Text(text) => parse_numeric_text(text),
        }
    }

    /// Text form used for item labels and diagnostics
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Number(v) => v.to_string(),
            RawCell::Text(t) => t.trim().to_string(),
            RawCell::Blank => String::new(),
        }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<serde_json::Value> for RawCell {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawCell::Blank,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => RawCell::Number(v),
                None => RawCell::Text(n.to_string()),
            },
            serde_json::Value::String(s) => RawCell::Text(s),
            other => RawCell::Text(other.to_string()),
        }
    }
}

fn parse_numeric_text(text: &str) -> CellReading {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if matches!(lowered.as_str(), "" | "-" | "--" | "n/a" | "na" | "nan" | "none" | "null") {
        return CellReading::Blank;
    }

    let unsigned = trimmed.trim_start_matches('$').trim_start();
    let (negative, body) = match unsigned.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner.trim().trim_start_matches('$')),
        None => match unsigned.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start().trim_start_matches('$')),
            None => (false, unsigned),
        },
    };
    let cleaned: String = body
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    // "(-5)" and "--5" have no sensible reading
    if negative && cleaned.starts_with(['-', '+', '(']) {
        return CellReading::Unparseable;
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => CellReading::Value(if negative { -v } else { v }),
        _ => CellReading::Unparseable,
    }
}

/// One line item with its per-year cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// `None` when the grid's statement label was not recognized
    pub statement: Option<Statement>,
    pub item: String,
    pub values: BTreeMap<FiscalYear, RawCell>,
}

impl RawRow {
    pub fn new(statement: impl Into<Option<Statement>>, item: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            item: item.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style cell setter
    pub fn with(mut self, year: impl Into<FiscalYear>, cell: impl Into<RawCell>) -> Self {
        self.values.insert(year.into(), cell.into());
        self
    }

    /// Cell for `year`; blank when the row has none
    pub fn cell(&self, year: &FiscalYear) -> &RawCell {
        static BLANK: RawCell = RawCell::Blank;
        self.values.get(year).unwrap_or(&BLANK)
    }
}

/// Multi-year statement table as supplied by the caller.
///
/// Years are kept sorted and unique. Rows keep their input order, which
/// decides which row wins when two labels map to the same variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct RawStatementTable {
    years: Vec<FiscalYear>,
    rows: Vec<RawRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    import_diagnostics: Vec<Diagnostic>,
}

/// Wire form of [`RawStatementTable`]; deserialization goes through `new`
#[derive(Deserialize)]
struct TableParts {
    years: Vec<FiscalYear>,
    rows: Vec<RawRow>,
    #[serde(default)]
    import_diagnostics: Vec<Diagnostic>,
}

impl TryFrom<TableParts> for RawStatementTable {
    type Error = ForensicError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        let mut table = Self::new(parts.years, parts.rows)?;
        table.import_diagnostics = parts.import_diagnostics;
        Ok(table)
    }
}

impl RawStatementTable {
    pub fn new(years: Vec<FiscalYear>, rows: Vec<RawRow>) -> Result<Self, ForensicError> {
        if years.is_empty() {
            return Err(ForensicError::NoYears);
        }
        let mut years = years;
        years.sort();
        if let Some(pair) = years.windows(2).find(|w| w[0] == w[1]) {
            return Err(ForensicError::DuplicateYear(pair[0].to_string()));
        }

        Ok(Self {
            years,
            rows,
            import_diagnostics: Vec::new(),
        })
    }

    /// Build a table from a column grid `{Statement, Item, Year1..YearN}`.
    ///
    /// Column names are matched case-insensitively; every other column is a
    /// year. An unrecognized statement label is recorded as a diagnostic but
    /// the row is kept, since items are matched by name alone. Rows with an
    /// empty item are skipped.
    pub fn from_grid(columns: &[String], rows: Vec<Vec<RawCell>>) -> Result<Self, ForensicError> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ForensicError::MissingColumn(name.to_string()))
        };
        let statement_idx = position("Statement")?;
        let item_idx = position("Item")?;

        let year_columns: Vec<(usize, FiscalYear)> = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != statement_idx && *i != item_idx)
            .map(|(i, label)| FiscalYear::new(label.as_str()).map(|y| (i, y)))
            .collect::<Result<_, _>>()?;
        let years: Vec<FiscalYear> = year_columns.iter().map(|(_, y)| y.clone()).collect();

        let mut diagnostics = Vec::new();
        let mut parsed_rows = Vec::with_capacity(rows.len());

        for (row_idx, row) in rows.into_iter().enumerate() {
            let cell_at = |i: usize| row.get(i).cloned().unwrap_or(RawCell::Blank);

            let statement_label = cell_at(statement_idx).as_text();
            let statement = statement_label.parse::<Statement>().ok();
            if statement.is_none() {
                diagnostics.push(Diagnostic::UnknownStatement {
                    row: row_idx,
                    label: statement_label,
                });
            }

            let item = cell_at(item_idx).as_text();
            if item.is_empty() {
                diagnostics.push(Diagnostic::MalformedRow {
                    row: row_idx,
                    reason: "empty item label".to_string(),
                });
                continue;
            }

            let values = year_columns
                .iter()
                .map(|(i, year)| (year.clone(), cell_at(*i)))
                .collect();
            parsed_rows.push(RawRow {
                statement,
                item,
                values,
            });
        }

        let mut table = Self::new(years, parsed_rows)?;
        table.import_diagnostics = diagnostics;
        Ok(table)
    }

    pub fn years(&self) -> &[FiscalYear] {
        &self.years
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Problems found while building the table from a grid
    pub fn import_diagnostics(&self) -> &[Diagnostic] {
        &self.import_diagnostics
    }
}
