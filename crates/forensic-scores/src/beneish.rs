//! Beneish M-Score.
//!
//! Eight-variable model from Beneish (1999), "The Detection of Earnings
//! Manipulation":
//!
//! ```text
//! M = -4.84 + 0.920*DSRI + 0.528*GMI + 0.404*AQI + 0.892*SGI
//!     + 0.115*DEPI - 0.172*SGAI + 4.679*TATA - 0.327*LVGI
//! ```
//!
//! Higher values indicate a higher likelihood of earnings manipulation.

use forensic_core::{
    stats::safe_div, CanonicalVariable, CanonicalVariableSet, FiscalYear, ScoreCalculator,
    ScoreKind,
};
use serde::{Deserialize, Serialize};

use crate::gross_margin;

const INTERCEPT: f64 = -4.84;
const DSRI_COEF: f64 = 0.920;
const GMI_COEF: f64 = 0.528;
const AQI_COEF: f64 = 0.404;
const SGI_COEF: f64 = 0.892;
const DEPI_COEF: f64 = 0.115;
const SGAI_COEF: f64 = -0.172;
const TATA_COEF: f64 = 4.679;
const LVGI_COEF: f64 = -0.327;

/// The eight year-over-year indices behind an M-Score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeneishIndices {
    /// Days sales in receivables index
    pub dsri: f64,
    /// Gross margin index
    pub gmi: f64,
    /// Asset quality index
    pub aqi: f64,
    /// Sales growth index
    pub sgi: f64,
    /// Depreciation index
    pub depi: f64,
    /// SG&A expense index
    pub sgai: f64,
    /// Leverage index
    pub lvgi: f64,
    /// Total accruals to total assets
    pub tata: f64,
}

impl BeneishIndices {
    pub fn m_score(&self) -> f64 {
        INTERCEPT
            + DSRI_COEF * self.dsri
            + GMI_COEF * self.gmi
            + AQI_COEF * self.aqi
            + SGI_COEF * self.sgi
            + DEPI_COEF * self.depi
            + SGAI_COEF * self.sgai
            + TATA_COEF * self.tata
            + LVGI_COEF * self.lvgi
    }
}

/// Balance sheet and income items the indices read from both years
struct YearInputs {
    receivables: f64,
    revenue: f64,
    gross_margin: f64,
    current_assets: f64,
    total_assets: f64,
    ppe: f64,
    depreciation: f64,
    sga: f64,
    total_liabilities: f64,
}

impl YearInputs {
    fn read(vars: &CanonicalVariableSet, year: &FiscalYear) -> Option<Self> {
        use CanonicalVariable::*;

        Some(Self {
            receivables: vars.get(Receivables, year)?,
            revenue: vars.get(Revenue, year)?,
            gross_margin: gross_margin(vars, year)?,
            current_assets: vars.get(CurrentAssets, year)?,
            total_assets: vars.get(TotalAssets, year)?,
            ppe: vars.get(PropertyPlantEquipment, year)?,
            depreciation: vars.get(Depreciation, year)?,
            sga: vars.get(SellingGeneralAdministrative, year)?,
            total_liabilities: vars.get(TotalLiabilities, year)?,
        })
    }

    fn receivables_to_sales(&self) -> Option<f64> {
        safe_div(self.receivables, self.revenue)
    }

    /// Share of assets that are neither current nor PP&E
    fn soft_asset_share(&self) -> Option<f64> {
        Some(1.0 - safe_div(self.current_assets + self.ppe, self.total_assets)?)
    }

    fn depreciation_rate(&self) -> Option<f64> {
        safe_div(self.depreciation, self.depreciation + self.ppe)
    }

    fn sga_to_sales(&self) -> Option<f64> {
        safe_div(self.sga, self.revenue)
    }

    fn leverage(&self) -> Option<f64> {
        safe_div(self.total_liabilities, self.total_assets)
    }
}

/// Net income less operating cash flow
fn total_accruals(vars: &CanonicalVariableSet, year: &FiscalYear) -> Option<f64> {
    Some(
        vars.get(CanonicalVariable::NetIncome, year)?
            - vars.get(CanonicalVariable::OperatingCashFlow, year)?,
    )
}

/// Beneish M-Score calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct BeneishMScore;

impl BeneishMScore {
    /// The eight indices for `year` against `prior`; absent if any input is
    /// missing in either year or any ratio is undefined.
    pub fn indices(
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        prior: &FiscalYear,
    ) -> Option<BeneishIndices> {
        let cur = YearInputs::read(vars, year)?;
        let prev = YearInputs::read(vars, prior)?;
        let accruals = total_accruals(vars, year)?;
        // Prior-year earnings and cash flow must be reported too
        total_accruals(vars, prior)?;

        Some(BeneishIndices {
            dsri: safe_div(cur.receivables_to_sales()?, prev.receivables_to_sales()?)?,
            gmi: safe_div(prev.gross_margin, cur.gross_margin)?,
            aqi: safe_div(cur.soft_asset_share()?, prev.soft_asset_share()?)?,
            sgi: safe_div(cur.revenue, prev.revenue)?,
            depi: safe_div(prev.depreciation_rate()?, cur.depreciation_rate()?)?,
            sgai: safe_div(cur.sga_to_sales()?, prev.sga_to_sales()?)?,
            lvgi: safe_div(cur.leverage()?, prev.leverage()?)?,
            tata: safe_div(accruals, cur.total_assets)?,
        })
    }
}

impl ScoreCalculator for BeneishMScore {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Beneish
    }

    fn compute(
        &self,
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        prior: Option<&FiscalYear>,
    ) -> Option<f64> {
        let m = Self::indices(vars, year, prior?)?.m_score();
        m.is_finite().then_some(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{healthy_company, without};
    use approx::assert_relative_eq;

    const BOTH_YEARS: [CanonicalVariable; 11] = [
        CanonicalVariable::Receivables,
        CanonicalVariable::Revenue,
        CanonicalVariable::CostOfGoodsSold,
        CanonicalVariable::CurrentAssets,
        CanonicalVariable::TotalAssets,
        CanonicalVariable::PropertyPlantEquipment,
        CanonicalVariable::Depreciation,
        CanonicalVariable::SellingGeneralAdministrative,
        CanonicalVariable::TotalLiabilities,
        CanonicalVariable::NetIncome,
        CanonicalVariable::OperatingCashFlow,
    ];

    #[test]
    fn test_beneish_indices() {
        let vars = healthy_company();
        let idx = BeneishMScore::indices(&vars, &2023.into(), &2022.into()).unwrap();

        // DSRI = (140k/1.2M) / (120k/1.0M)
        assert_relative_eq!(idx.dsri, 0.972_222_222, epsilon = 1e-6);
        // GMI = 0.40 / 0.41667
        assert_relative_eq!(idx.gmi, 0.96, epsilon = 1e-9);
        assert_relative_eq!(idx.sgi, 1.2, epsilon = 1e-9);
        assert_relative_eq!(idx.depi, 1.0, epsilon = 1e-9);
        assert_relative_eq!(idx.tata, -40_000.0 / 1_700_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beneish_m_score() {
        let vars = healthy_company();
        let m = BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())).unwrap();
        assert_relative_eq!(m, -2.407_188_067, epsilon = 1e-6);

        let m = BeneishMScore.compute(&vars, &2024.into(), Some(&2023.into())).unwrap();
        assert_relative_eq!(m, -2.457_610_023, epsilon = 1e-6);
    }

    #[test]
    fn test_beneish_needs_prior_year() {
        let vars = healthy_company();
        assert_eq!(BeneishMScore.compute(&vars, &2022.into(), None), None);
    }

    #[test]
    fn test_beneish_absent_when_any_input_missing() {
        let missing = BOTH_YEARS
            .iter()
            .flat_map(|v| [(*v, 2022), (*v, 2023)]);
        for (variable, year) in missing {
            let vars = without(variable, year);
            assert_eq!(
                BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())),
                None,
                "{} missing in {} should blank the score",
                variable,
                year
            );
        }
    }

    #[test]
    fn test_beneish_needs_prior_year_accruals() {
        for variable in [CanonicalVariable::NetIncome, CanonicalVariable::OperatingCashFlow] {
            let vars = without(variable, 2022);
            assert_eq!(BeneishMScore::indices(&vars, &2023.into(), &2022.into()), None);
            assert_eq!(BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())), None);
        }

        // 2024 against 2023 does not read 2022
        let vars = without(CanonicalVariable::NetIncome, 2022);
        let m = BeneishMScore.compute(&vars, &2024.into(), Some(&2023.into())).unwrap();
        assert_relative_eq!(m, -2.457_610_023, epsilon = 1e-6);
    }

    #[test]
    fn test_beneish_zero_prior_revenue() {
        let vars = healthy_company().with(CanonicalVariable::Revenue, 2022, 0.0);
        assert_eq!(BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())), None);
    }

    #[test]
    fn test_beneish_zero_receivables_in_prior_year() {
        let vars = healthy_company().with(CanonicalVariable::Receivables, 2022, 0.0);
        assert_eq!(BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())), None);
    }

    #[test]
    fn test_beneish_uses_gross_profit_when_cogs_missing() {
        let vars = without(CanonicalVariable::CostOfGoodsSold, 2022)
            .with(CanonicalVariable::GrossProfit, 2022, 400_000.0);
        let m = BeneishMScore.compute(&vars, &2023.into(), Some(&2022.into())).unwrap();
        assert_relative_eq!(m, -2.407_188_067, epsilon = 1e-6);
    }

    #[test]
    fn test_beneish_aggressive_receivables_raise_score() {
        let base = BeneishMScore
            .compute(&healthy_company(), &2023.into(), Some(&2022.into()))
            .unwrap();
        let inflated = healthy_company().with(CanonicalVariable::Receivables, 2023, 400_000.0);
        let m = BeneishMScore.compute(&inflated, &2023.into(), Some(&2022.into())).unwrap();
        assert!(m > base);
    }
}
