use forensic_core::{stats::finite, FiscalYear, ScoreBoard, ScoreKind};
use serde::{Deserialize, Serialize};

pub const BENEISH_WEIGHT: f64 = 0.35;
pub const SLOAN_WEIGHT: f64 = 0.25;
pub const PIOTROSKI_WEIGHT: f64 = 0.25;
pub const ALTMAN_WEIGHT: f64 = 0.15;

/// Weight of each score kind in the alpha. Sums to 1.0; the recommendation
/// bands assume exactly these values.
pub fn weight(kind: ScoreKind) -> f64 {
    match kind {
        ScoreKind::Beneish => BENEISH_WEIGHT,
        ScoreKind::Sloan => SLOAN_WEIGHT,
        ScoreKind::Piotroski => PIOTROSKI_WEIGHT,
        ScoreKind::Altman => ALTMAN_WEIGHT,
    }
}

/// Normalized score with its sign flipped where a lower raw score is better
pub fn directional_signal(kind: ScoreKind, normalized: f64) -> f64 {
    if kind.higher_is_better() {
        normalized
    } else {
        -normalized
    }
}

/// Alpha for one year, with the direction-adjusted signals behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaRow {
    pub year: FiscalYear,
    pub beneish_signal: f64,
    pub sloan_signal: f64,
    pub piotroski_signal: f64,
    pub altman_signal: f64,
    pub alpha: f64,
}

impl AlphaRow {
    fn from_board(board: &ScoreBoard, year: &FiscalYear) -> Option<Self> {
        let signal = |kind: ScoreKind| -> Option<f64> {
            Some(directional_signal(kind, board.get(kind).get(year)?))
        };

        let beneish_signal = signal(ScoreKind::Beneish)?;
        let sloan_signal = signal(ScoreKind::Sloan)?;
        let piotroski_signal = signal(ScoreKind::Piotroski)?;
        let altman_signal = signal(ScoreKind::Altman)?;

        let alpha = finite(
            BENEISH_WEIGHT * beneish_signal
                + SLOAN_WEIGHT * sloan_signal
                + PIOTROSKI_WEIGHT * piotroski_signal
                + ALTMAN_WEIGHT * altman_signal,
        )?;

        Some(Self {
            year: year.clone(),
            beneish_signal,
            sloan_signal,
            piotroski_signal,
            altman_signal,
            alpha,
        })
    }
}

/// Year-ordered alpha rows; only years where all four scores are present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlphaSeries {
    pub rows: Vec<AlphaRow>,
}

impl AlphaSeries {
    pub fn get(&self, year: &FiscalYear) -> Option<f64> {
        self.rows.iter().find(|r| &r.year == year).map(|r| r.alpha)
    }

    pub fn years(&self) -> impl Iterator<Item = &FiscalYear> {
        self.rows.iter().map(|r| &r.year)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Combine normalized scores into alpha.
///
/// Years missing any of the four scores are skipped; weights are never
/// redistributed over the scores that remain.
pub fn aggregate(normalized: &ScoreBoard) -> AlphaSeries {
    let rows = normalized
        .beneish
        .years()
        .filter_map(|year| {
            let row = AlphaRow::from_board(normalized, year);
            if row.is_none() {
                tracing::debug!("No alpha for {}: incomplete scores", year);
            }
            row
        })
        .collect();
    AlphaSeries { rows }
}
