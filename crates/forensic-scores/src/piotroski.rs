//! Piotroski F-Score.
//!
//! Nine binary tests across profitability, leverage/liquidity and operating
//! efficiency. Each passing test adds one point, so the score runs 0..=9.
//! A test whose inputs are missing counts as failed; the score as a whole
//! only needs a prior year to compare against.

use forensic_core::{
    stats::safe_div, CanonicalVariable, CanonicalVariableSet, FiscalYear, ScoreCalculator,
    ScoreKind,
};
use serde::{Deserialize, Serialize};

use crate::gross_margin;

/// Outcome of each of the nine tests for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiotroskiSignals {
    // Profitability
    pub positive_net_income: bool,
    pub positive_operating_cash_flow: bool,
    pub improving_roa: bool,
    pub cash_flow_exceeds_income: bool,
    // Leverage, liquidity, source of funds
    pub lower_leverage: bool,
    pub higher_current_ratio: bool,
    pub no_new_shares: bool,
    // Operating efficiency
    pub higher_gross_margin: bool,
    pub higher_asset_turnover: bool,
}

impl PiotroskiSignals {
    pub fn evaluate(vars: &CanonicalVariableSet, year: &FiscalYear, prior: &FiscalYear) -> Self {
        use CanonicalVariable::*;

        let ratio = |num: CanonicalVariable, den: CanonicalVariable, y: &FiscalYear| -> Option<f64> {
            safe_div(vars.get(num, y)?, vars.get(den, y)?)
        };
        let increased = |cur: Option<f64>, prev: Option<f64>| matches!((cur, prev), (Some(c), Some(p)) if c > p);

        let roa = ratio(NetIncome, TotalAssets, year);
        let cfo = vars.get(OperatingCashFlow, year);
        let net_income = vars.get(NetIncome, year);

        Self {
            positive_net_income: net_income.is_some_and(|n| n > 0.0),
            positive_operating_cash_flow: cfo.is_some_and(|c| c > 0.0),
            improving_roa: increased(roa, ratio(NetIncome, TotalAssets, prior)),
            cash_flow_exceeds_income: increased(cfo, net_income),
            lower_leverage: increased(
                ratio(LongTermDebt, TotalAssets, prior),
                ratio(LongTermDebt, TotalAssets, year),
            ),
            higher_current_ratio: increased(
                ratio(CurrentAssets, CurrentLiabilities, year),
                ratio(CurrentAssets, CurrentLiabilities, prior),
            ),
            no_new_shares: matches!(
                (vars.get(SharesOutstanding, year), vars.get(SharesOutstanding, prior)),
                (Some(cur), Some(prev)) if cur <= prev
            ),
            higher_gross_margin: increased(gross_margin(vars, year), gross_margin(vars, prior)),
            higher_asset_turnover: increased(
                ratio(Revenue, TotalAssets, year),
                ratio(Revenue, TotalAssets, prior),
            ),
        }
    }

    fn all(&self) -> [bool; 9] {
        [
            self.positive_net_income,
            self.positive_operating_cash_flow,
            self.improving_roa,
            self.cash_flow_exceeds_income,
            self.lower_leverage,
            self.higher_current_ratio,
            self.no_new_shares,
            self.higher_gross_margin,
            self.higher_asset_turnover,
        ]
    }

    /// Number of passing tests
    pub fn score(&self) -> u8 {
        self.all().iter().filter(|passed| **passed).count() as u8
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PiotroskiFScore;

impl ScoreCalculator for PiotroskiFScore {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Piotroski
    }

    fn compute(
        &self,
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        prior: Option<&FiscalYear>,
    ) -> Option<f64> {
        let signals = PiotroskiSignals::evaluate(vars, year, prior?);
        Some(f64::from(signals.score()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{healthy_company, without};

    #[test]
    fn test_healthy_company_signals() {
        let vars = healthy_company();
        let signals = PiotroskiSignals::evaluate(&vars, &2023.into(), &2022.into());

        assert!(signals.positive_net_income);
        assert!(signals.positive_operating_cash_flow);
        // ROA is 10% in both years
        assert!(!signals.improving_roa);
        assert!(signals.cash_flow_exceeds_income);
        assert!(signals.lower_leverage);
        assert!(signals.higher_current_ratio);
        assert!(signals.no_new_shares);
        assert!(signals.higher_gross_margin);
        assert!(signals.higher_asset_turnover);
        assert_eq!(signals.score(), 8);
    }

    #[test]
    fn test_piotroski_series() {
        let series = PiotroskiFScore.series(&healthy_company());
        assert_eq!(series.get(&2022.into()), None);
        assert_eq!(series.get(&2023.into()), Some(8.0));
        assert_eq!(series.get(&2024.into()), Some(8.0));
    }

    #[test]
    fn test_missing_input_fails_only_its_tests() {
        let vars = without(CanonicalVariable::SharesOutstanding, 2023);
        let score = PiotroskiFScore.compute(&vars, &2023.into(), Some(&2022.into()));
        assert_eq!(score, Some(7.0));

        let vars = without(CanonicalVariable::OperatingCashFlow, 2023);
        let signals = PiotroskiSignals::evaluate(&vars, &2023.into(), &2022.into());
        assert!(!signals.positive_operating_cash_flow);
        assert!(!signals.cash_flow_exceeds_income);
        assert_eq!(signals.score(), 6);
    }

    #[test]
    fn test_empty_year_scores_zero() {
        let vars = CanonicalVariableSet::new(&[2022.into(), 2023.into()]);
        assert_eq!(PiotroskiFScore.compute(&vars, &2023.into(), Some(&2022.into())), Some(0.0));
        assert_eq!(PiotroskiFScore.compute(&vars, &2023.into(), None), None);
    }

    #[test]
    fn test_dilution_and_losses() {
        let vars = healthy_company()
            .with(CanonicalVariable::SharesOutstanding, 2023, 120_000.0)
            .with(CanonicalVariable::NetIncome, 2023, -50_000.0);
        let signals = PiotroskiSignals::evaluate(&vars, &2023.into(), &2022.into());
        assert!(!signals.no_new_shares);
        assert!(!signals.positive_net_income);
        assert!(!signals.improving_roa);
        // Cash flow still beats a loss
        assert!(signals.cash_flow_exceeds_income);
        assert_eq!(signals.score(), 6);
    }

    #[test]
    fn test_score_is_bounded() {
        let all_pass = PiotroskiSignals {
            positive_net_income: true,
            positive_operating_cash_flow: true,
            improving_roa: true,
            cash_flow_exceeds_income: true,
            lower_leverage: true,
            higher_current_ratio: true,
            no_new_shares: true,
            higher_gross_margin: true,
            higher_asset_turnover: true,
        };
        assert_eq!(all_pass.score(), 9);
        assert_eq!(PiotroskiSignals::default().score(), 0);
    }
}
