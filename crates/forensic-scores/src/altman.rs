//! Altman Z-Score.
//!
//! ```text
//! Z = 1.2*A + 1.4*B + 3.3*C + 0.6*D + 1.0*E
//!   A = working capital / total assets
//!   B = retained earnings / total assets
//!   C = EBIT / total assets
//!   D = equity / total liabilities
//!   E = revenue / total assets
//! ```
//!
//! `D` uses market value of equity when the table provides it, book equity
//! otherwise. Only the current year is needed.

use forensic_core::{
    stats::safe_div, CanonicalVariable, CanonicalVariableSet, FiscalYear, ScoreCalculator,
    ScoreKind,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AltmanZScore;

impl ScoreCalculator for AltmanZScore {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Altman
    }

    fn compute(
        &self,
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        _prior: Option<&FiscalYear>,
    ) -> Option<f64> {
        use CanonicalVariable::*;

        let total_assets = vars.get(TotalAssets, year)?;
        let working_capital = vars.get(CurrentAssets, year)? - vars.get(CurrentLiabilities, year)?;
        let equity = vars
            .get(MarketValueEquity, year)
            .or_else(|| vars.get(TotalEquity, year))?;

        let a = safe_div(working_capital, total_assets)?;
        let b = safe_div(vars.get(RetainedEarnings, year)?, total_assets)?;
        let c = safe_div(vars.get(Ebit, year)?, total_assets)?;
        let d = safe_div(equity, vars.get(TotalLiabilities, year)?)?;
        let e = safe_div(vars.get(Revenue, year)?, total_assets)?;

        let z = 1.2 * a + 1.4 * b + 3.3 * c + 0.6 * d + 1.0 * e;
        z.is_finite().then_some(z)
    }
}
