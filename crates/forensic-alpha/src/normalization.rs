use forensic_core::{stats::z_score_of, ForensicError, ScoreBoard, ScoreSeries};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How each score series is standardized before aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Z-score against every present year of the series
    #[default]
    FullSeries,
    /// Z-score against present years up to and including the current one
    Expanding,
}

impl FromStr for NormalizationMode {
    type Err = ForensicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "full_series" | "full-series" => Ok(NormalizationMode::FullSeries),
            "expanding" => Ok(NormalizationMode::Expanding),
            other => Err(ForensicError::InvalidLabel(format!(
                "unknown normalization mode '{}'",
                other
            ))),
        }
    }
}

/// Standardize one series. Absent years stay absent; a series without
/// variation maps every present year to 0.
pub fn normalize_series(series: &ScoreSeries, mode: NormalizationMode) -> ScoreSeries {
    let values = match mode {
        NormalizationMode::FullSeries => {
            let present: Vec<f64> = series.present().map(|(_, v)| v).collect();
            series
                .values
                .iter()
                .map(|(year, v)| (year.clone(), v.map(|x| z_score_of(x, &present))))
                .collect::<Vec<_>>()
        }
        NormalizationMode::Expanding => {
            let mut window: Vec<f64> = Vec::with_capacity(series.values.len());
            series
                .values
                .iter()
                .map(|(year, v)| {
                    let z = v.map(|x| {
                        window.push(x);
                        // z_score_of is 0 for a single value
                        z_score_of(x, &window)
                    });
                    (year.clone(), z)
                })
                .collect::<Vec<_>>()
        }
    };
    ScoreSeries::new(series.kind, values)
}

pub fn normalize_board(board: &ScoreBoard, mode: NormalizationMode) -> ScoreBoard {
    board.map(|series| normalize_series(series, mode))
}
