//! Forensic accounting scores
//!
//! Four independent calculators over the canonical variable set:
//! Beneish M-Score, Sloan accrual ratio, Piotroski F-Score and Altman Z-Score.

use forensic_core::{
    stats::safe_div, CanonicalVariable, CanonicalVariableSet, FiscalYear, ScoreBoard,
    ScoreCalculator, ScoreKind,
};

pub mod altman;
pub mod beneish;
pub mod interpretation;
pub mod piotroski;
pub mod sloan;

pub use altman::AltmanZScore;
pub use beneish::{BeneishIndices, BeneishMScore};
pub use interpretation::{AltmanZone, BeneishFlag, PiotroskiStrength, ScoreInterpretation};
pub use piotroski::{PiotroskiFScore, PiotroskiSignals};
pub use sloan::SloanAccrualRatio;

/// Runs all four calculators over one canonical variable set
#[derive(Debug, Clone, Copy, Default)]
pub struct ForensicScoreEngine;

impl ForensicScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn calculator(kind: ScoreKind) -> &'static dyn ScoreCalculator {
        match kind {
            ScoreKind::Beneish => &BeneishMScore,
            ScoreKind::Sloan => &SloanAccrualRatio,
            ScoreKind::Piotroski => &PiotroskiFScore,
            ScoreKind::Altman => &AltmanZScore,
        }
    }

    /// Score every year. The kinds are independent, so they run in parallel;
    /// the result does not depend on scheduling.
    pub fn score(&self, vars: &CanonicalVariableSet) -> ScoreBoard {
        let ((beneish, sloan), (piotroski, altman)) = rayon::join(
            || {
                rayon::join(
                    || BeneishMScore.series(vars),
                    || SloanAccrualRatio.series(vars),
                )
            },
            || {
                rayon::join(
                    || PiotroskiFScore.series(vars),
                    || AltmanZScore.series(vars),
                )
            },
        );

        let board = ScoreBoard {
            beneish,
            sloan,
            piotroski,
            altman,
        };
        for series in board.iter() {
            tracing::debug!(
                "{}: {} of {} years scored",
                series.kind,
                series.present_count(),
                vars.years().len()
            );
        }
        board
    }
}

/// Gross margin for `year`.
///
/// Uses cost of goods sold when present, otherwise revenue minus gross profit.
pub(crate) fn gross_margin(vars: &CanonicalVariableSet, year: &FiscalYear) -> Option<f64> {
    let revenue = vars.get(CanonicalVariable::Revenue, year)?;
    let cogs = match vars.get(CanonicalVariable::CostOfGoodsSold, year) {
        Some(cogs) => cogs,
        None => revenue - vars.get(CanonicalVariable::GrossProfit, year)?,
    };
    safe_div(revenue - cogs, revenue)
}
