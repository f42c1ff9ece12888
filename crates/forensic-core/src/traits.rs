use crate::{CanonicalVariableSet, FiscalYear, ScoreKind, ScoreSeries};

/// A forensic score computed from canonical variables.
///
/// Implementations are pure: the same variables always give the same value,
/// and any missing input or undefined ratio gives `None`.
pub trait ScoreCalculator: Send + Sync {
    fn kind(&self) -> ScoreKind;

    /// Score for `year`, with `prior` the preceding year in the table (if any)
    fn compute(
        &self,
        vars: &CanonicalVariableSet,
        year: &FiscalYear,
        prior: Option<&FiscalYear>,
    ) -> Option<f64>;

    /// Score every year of `vars`
    fn series(&self, vars: &CanonicalVariableSet) -> ScoreSeries {
        let values = vars
            .years()
            .iter()
            .map(|year| (year.clone(), self.compute(vars, year, vars.prior_year(year))));
        ScoreSeries::new(self.kind(), values)
    }
}
