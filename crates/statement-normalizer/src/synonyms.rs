use forensic_core::{CanonicalVariable, ForensicError};
use std::collections::BTreeMap;

use CanonicalVariable::*;

/// Built-in label dictionary, written in normalized form
const STANDARD_SYNONYMS: &[(&str, CanonicalVariable)] = &[
    // Income statement
    ("revenue", Revenue),
    ("revenues", Revenue),
    ("total revenue", Revenue),
    ("total revenues", Revenue),
    ("net revenue", Revenue),
    ("net revenues", Revenue),
    ("sales", Revenue),
    ("net sales", Revenue),
    ("total sales", Revenue),
    ("sales revenue", Revenue),
    ("turnover", Revenue),
    ("cost of goods sold", CostOfGoodsSold),
    ("cogs", CostOfGoodsSold),
    ("cost of sales", CostOfGoodsSold),
    ("cost of revenue", CostOfGoodsSold),
    ("cost of revenues", CostOfGoodsSold),
    ("gross profit", GrossProfit),
    ("gross income", GrossProfit),
    ("selling general and administrative", SellingGeneralAdministrative),
    ("selling general & administrative", SellingGeneralAdministrative),
    ("selling general and administrative expenses", SellingGeneralAdministrative),
    ("selling general & administrative expenses", SellingGeneralAdministrative),
    ("sg&a", SellingGeneralAdministrative),
    ("sga", SellingGeneralAdministrative),
    ("depreciation", Depreciation),
    ("depreciation expense", Depreciation),
    ("depreciation and amortization", Depreciation),
    ("depreciation & amortization", Depreciation),
    ("d&a", Depreciation),
    ("ebit", Ebit),
    ("operating income", Ebit),
    ("operating profit", Ebit),
    ("income from operations", Ebit),
    ("earnings before interest and taxes", Ebit),
    ("net income", NetIncome),
    ("net income loss", NetIncome),
    ("net profit", NetIncome),
    ("net earnings", NetIncome),
    ("profit after tax", NetIncome),
    // Cash flow
    ("operating cash flow", OperatingCashFlow),
    ("cash flow from operations", OperatingCashFlow),
    ("cash from operations", OperatingCashFlow),
    ("cash flow from operating activities", OperatingCashFlow),
    ("net cash from operating activities", OperatingCashFlow),
    ("net cash provided by operating activities", OperatingCashFlow),
    ("cfo", OperatingCashFlow),
    // Balance sheet
    ("total assets", TotalAssets),
    ("assets", TotalAssets),
    ("total liabilities", TotalLiabilities),
    ("liabilities", TotalLiabilities),
    ("current assets", CurrentAssets),
    ("total current assets", CurrentAssets),
    ("current liabilities", CurrentLiabilities),
    ("total current liabilities", CurrentLiabilities),
    ("receivables", Receivables),
    ("accounts receivable", Receivables),
    ("accounts receivable net", Receivables),
    ("net receivables", Receivables),
    ("trade receivables", Receivables),
    ("trade and other receivables", Receivables),
    ("property plant and equipment", PropertyPlantEquipment),
    ("property plant & equipment", PropertyPlantEquipment),
    ("property plant and equipment net", PropertyPlantEquipment),
    ("pp&e", PropertyPlantEquipment),
    ("ppe", PropertyPlantEquipment),
    ("net ppe", PropertyPlantEquipment),
    ("fixed assets", PropertyPlantEquipment),
    ("net fixed assets", PropertyPlantEquipment),
    ("retained earnings", RetainedEarnings),
    ("accumulated earnings", RetainedEarnings),
    ("retained profits", RetainedEarnings),
    ("total equity", TotalEquity),
    ("equity", TotalEquity),
    ("book equity", TotalEquity),
    ("shareholders equity", TotalEquity),
    ("stockholders equity", TotalEquity),
    ("total shareholders equity", TotalEquity),
    ("total stockholders equity", TotalEquity),
    ("market value of equity", MarketValueEquity),
    ("market value equity", MarketValueEquity),
    ("market capitalization", MarketValueEquity),
    ("market cap", MarketValueEquity),
    ("long term debt", LongTermDebt),
    ("long term borrowings", LongTermDebt),
    ("non current borrowings", LongTermDebt),
    ("shares outstanding", SharesOutstanding),
    ("common shares outstanding", SharesOutstanding),
    ("weighted average shares", SharesOutstanding),
    ("number of shares", SharesOutstanding),
];

/// Canonical form of a line-item label.
///
/// Lowercases, treats `-`, `_` and `/` as spaces, drops `.` `,` `'` `(` `)` `:`,
/// then trims and collapses runs of whitespace.
pub fn normalize_label(label: &str) -> String {
    let spaced: String = label
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '-' | '_' | '/' => Some(' '),
            '.' | ',' | '\'' | '(' | ')' | ':' => None,
            c => Some(c),
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Label → canonical variable dictionary
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: BTreeMap<String, CanonicalVariable>,
}

impl SynonymTable {
    /// The built-in dictionary
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_SYNONYMS
                .iter()
                .map(|(label, variable)| (normalize_label(label), *variable))
                .collect(),
        }
    }

    /// Add or override a label. Aliases take precedence over built-ins.
    pub fn with_alias(mut self, label: &str, variable: CanonicalVariable) -> Self {
        self.entries.insert(normalize_label(label), variable);
        self
    }

    pub fn with_aliases<'a>(
        self,
        aliases: impl IntoIterator<Item = &'a (String, CanonicalVariable)>,
    ) -> Self {
        aliases
            .into_iter()
            .fold(self, |table, (label, variable)| table.with_alias(label, *variable))
    }

    pub fn lookup(&self, label: &str) -> Option<CanonicalVariable> {
        self.entries.get(&normalize_label(label)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parse `label=variable;label=variable` into alias pairs.
///
/// Empty segments are ignored; an unknown variable name is an error.
pub fn parse_aliases(input: &str) -> Result<Vec<(String, CanonicalVariable)>, ForensicError> {
    input.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| -> Result<(String, CanonicalVariable), ForensicError> {
            let (label, variable) = segment.split_once('=').ok_or_else(|| {
                ForensicError::InvalidLabel(format!("alias '{}' is not label=variable", segment))
            })?;
            let label = label.trim();
            if label.is_empty() {
                return Err(ForensicError::InvalidLabel(format!("alias '{}' has no label", segment)));
            }
            Ok((label.to_string(), variable.parse()?))
        })
        .collect()
}
