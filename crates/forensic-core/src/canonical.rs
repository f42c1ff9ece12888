use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{FiscalYear, ForensicError};

/// Financial variables the score calculators understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalVariable {
    Revenue,
    CostOfGoodsSold,
    GrossProfit,
    SellingGeneralAdministrative,
    Depreciation,
    Ebit,
    NetIncome,
    OperatingCashFlow,
    TotalAssets,
    TotalLiabilities,
    CurrentAssets,
    CurrentLiabilities,
    Receivables,
    PropertyPlantEquipment,
    RetainedEarnings,
    TotalEquity,
    MarketValueEquity,
    LongTermDebt,
    SharesOutstanding,
}

impl CanonicalVariable {
    pub const ALL: [CanonicalVariable; 19] = [
        CanonicalVariable::Revenue,
        CanonicalVariable::CostOfGoodsSold,
        CanonicalVariable::GrossProfit,
        CanonicalVariable::SellingGeneralAdministrative,
        CanonicalVariable::Depreciation,
        CanonicalVariable::Ebit,
        CanonicalVariable::NetIncome,
        CanonicalVariable::OperatingCashFlow,
        CanonicalVariable::TotalAssets,
        CanonicalVariable::TotalLiabilities,
        CanonicalVariable::CurrentAssets,
        CanonicalVariable::CurrentLiabilities,
        CanonicalVariable::Receivables,
        CanonicalVariable::PropertyPlantEquipment,
        CanonicalVariable::RetainedEarnings,
        CanonicalVariable::TotalEquity,
        CanonicalVariable::MarketValueEquity,
        CanonicalVariable::LongTermDebt,
        CanonicalVariable::SharesOutstanding,
    ];

    /// Stable snake_case key, identical to the serialized form
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalVariable::Revenue => "revenue",
            CanonicalVariable::CostOfGoodsSold => "cost_of_goods_sold",
            CanonicalVariable::GrossProfit => "gross_profit",
            CanonicalVariable::SellingGeneralAdministrative => "selling_general_administrative",
            CanonicalVariable::Depreciation => "depreciation",
            CanonicalVariable::Ebit => "ebit",
            CanonicalVariable::NetIncome => "net_income",
            CanonicalVariable::OperatingCashFlow => "operating_cash_flow",
            CanonicalVariable::TotalAssets => "total_assets",
            CanonicalVariable::TotalLiabilities => "total_liabilities",
            CanonicalVariable::CurrentAssets => "current_assets",
            CanonicalVariable::CurrentLiabilities => "current_liabilities",
            CanonicalVariable::Receivables => "receivables",
            CanonicalVariable::PropertyPlantEquipment => "property_plant_equipment",
            CanonicalVariable::RetainedEarnings => "retained_earnings",
            CanonicalVariable::TotalEquity => "total_equity",
            CanonicalVariable::MarketValueEquity => "market_value_equity",
            CanonicalVariable::LongTermDebt => "long_term_debt",
            CanonicalVariable::SharesOutstanding => "shares_outstanding",
        }
    }
}

impl fmt::Display for CanonicalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CanonicalVariable {
    type Err = ForensicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        CanonicalVariable::ALL
            .into_iter()
            .find(|v| v.key() == key)
            .ok_or_else(|| ForensicError::InvalidLabel(format!("unknown canonical variable '{}'", s.trim())))
    }
}

/// Canonical variables by year, with explicit absence.
///
/// Every variable carries an entry for every year so the serialized form is
/// a complete grid with `null` for absent cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVariableSet {
    years: Vec<FiscalYear>,
    values: BTreeMap<CanonicalVariable, BTreeMap<FiscalYear, Option<f64>>>,
    /// Raw item label each mapped variable was read from
    sources: BTreeMap<CanonicalVariable, String>,
}

impl CanonicalVariableSet {
    /// Empty grid over `years`; the years are sorted and de-duplicated.
    pub fn new(years: &[FiscalYear]) -> Self {
        let mut years = years.to_vec();
        years.sort();
        years.dedup();

        let empty_row: BTreeMap<FiscalYear, Option<f64>> =
            years.iter().map(|y| (y.clone(), None)).collect();
        let values = CanonicalVariable::ALL
            .iter()
            .map(|v| (*v, empty_row.clone()))
            .collect();

        Self {
            years,
            values,
            sources: BTreeMap::new(),
        }
    }

    pub fn years(&self) -> &[FiscalYear] {
        &self.years
    }

    /// The year immediately preceding `year` in this set, if any
    pub fn prior_year(&self, year: &FiscalYear) -> Option<&FiscalYear> {
        let idx = self.years.iter().position(|y| y == year)?;
        idx.checked_sub(1).map(|i| &self.years[i])
    }

    pub fn get(&self, variable: CanonicalVariable, year: &FiscalYear) -> Option<f64> {
        self.values.get(&variable)?.get(year).copied().flatten()
    }

    /// Store a value. Non-finite values are stored as absent.
    /// Returns false when `year` is not part of this set.
    pub fn set(&mut self, variable: CanonicalVariable, year: &FiscalYear, value: Option<f64>) -> bool {
        let Some(slot) = self.values.get_mut(&variable).and_then(|row| row.get_mut(year)) else {
            return false;
        };
        *slot = value.filter(|v| v.is_finite());
        true
    }

    /// Builder-style setter, mostly for assembling fixtures
    pub fn with(mut self, variable: CanonicalVariable, year: impl Into<FiscalYear>, value: f64) -> Self {
        let year = year.into();
        self.set(variable, &year, Some(value));
        self
    }

    pub fn record_source(&mut self, variable: CanonicalVariable, item: impl Into<String>) {
        self.sources.insert(variable, item.into());
    }

    pub fn source(&self, variable: CanonicalVariable) -> Option<&str> {
        self.sources.get(&variable).map(|s| s.as_str())
    }

    /// Whether some input row was mapped to `variable`
    pub fn is_mapped(&self, variable: CanonicalVariable) -> bool {
        self.sources.contains_key(&variable)
    }

    pub fn mapped_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of present cells across mapped variables
    pub fn present_count(&self) -> usize {
        self.values
            .values()
            .flat_map(|row| row.values())
            .filter(|v| v.is_some())
            .count()
    }

    pub fn series(&self, variable: CanonicalVariable) -> impl Iterator<Item = (&FiscalYear, Option<f64>)> {
        self.values
            .get(&variable)
            .into_iter()
            .flat_map(|row| row.iter().map(|(y, v)| (y, *v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_keys_round_trip() {
        for variable in CanonicalVariable::ALL {
            assert_eq!(variable.key().parse::<CanonicalVariable>().unwrap(), variable);
            let json = serde_json::to_string(&variable).unwrap();
            assert_eq!(json, format!("\"{}\"", variable.key()));
        }
        assert_eq!(
            "Total Assets".parse::<CanonicalVariable>().unwrap(),
            CanonicalVariable::TotalAssets
        );
        assert!("goodwill".parse::<CanonicalVariable>().is_err());
    }

    #[test]
    fn test_new_grid_is_all_absent() {
        let set = CanonicalVariableSet::new(&[2023.into(), 2022.into()]);
        assert_eq!(set.years(), &[FiscalYear::from(2022), FiscalYear::from(2023)]);
        assert_eq!(set.present_count(), 0);
        assert_eq!(set.get(CanonicalVariable::Revenue, &2022.into()), None);
    }

    #[test]
    fn test_prior_year() {
        let set = CanonicalVariableSet::new(&[2022.into(), 2023.into(), 2024.into()]);
        assert_eq!(set.prior_year(&2022.into()), None);
        assert_eq!(set.prior_year(&2024.into()), Some(&FiscalYear::from(2023)));
        assert_eq!(set.prior_year(&2030.into()), None);
    }

    #[test]
    fn test_set_rejects_non_finite_and_unknown_years() {
        let mut set = CanonicalVariableSet::new(&[2023.into()]);
        assert!(set.set(CanonicalVariable::Revenue, &2023.into(), Some(f64::NAN)));
        assert_eq!(set.get(CanonicalVariable::Revenue, &2023.into()), None);

        assert!(!set.set(CanonicalVariable::Revenue, &2019.into(), Some(1.0)));

        let set = set.with(CanonicalVariable::Revenue, 2023, 10.0);
        assert_eq!(set.get(CanonicalVariable::Revenue, &2023.into()), Some(10.0));
        assert_eq!(set.present_count(), 1);
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let set = CanonicalVariableSet::new(&[2023.into()]).with(CanonicalVariable::NetIncome, 2023, 5.0);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["values"]["net_income"]["2023"], serde_json::json!(5.0));
        assert!(json["values"]["revenue"]["2023"].is_null());
    }
}
