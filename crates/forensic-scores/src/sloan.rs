//! Sloan accrual ratio: `(net income - operating cash flow) / average total assets`.
//!
//! Average total assets uses the current and prior year, so the first year of
//! a table never has a value.

use forensic_core::{
    stats::safe_div, CanonicalVariable, CanonicalVariableSet, FiscalYear, ScoreCalculator,
    ScoreKind,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SloanAccrualRatio;

impl SloanAccrualRatio {
    fn average_assets(vars: &CanonicalVariableSet, year: &FiscalYear, prior: &FiscalYear) -> Option<f64> {
        let current = vars.get(CanonicalVariable::TotalAssets, year)?;
        let previous = vars.get(CanonicalVariable::TotalAssets, prior)?;
        Some((current + previous) / 2.0)
    }
}

impl ScoreCalculator for SloanAccrualRatio {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Sloan
    }

    fn compute(
        &self,
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        prior: Option<&FiscalYear>,
    ) -> Option<f64> {
        let net_income = vars.get(CanonicalVariable::NetIncome, year)?;
        let cash_flow = vars.get(CanonicalVariable::OperatingCashFlow, year)?;
        let avg_assets = Self::average_assets(vars, year, prior?)?;
        safe_div(net_income - cash_flow, avg_assets)
    }
}
