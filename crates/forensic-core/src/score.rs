use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::FiscalYear;

/// The four forensic scores combined into alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Beneish,
    Sloan,
    Piotroski,
    Altman,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 4] = [
        ScoreKind::Beneish,
        ScoreKind::Sloan,
        ScoreKind::Piotroski,
        ScoreKind::Altman,
    ];

    pub fn to_label(&self) -> &'static str {
        match self {
            ScoreKind::Beneish => "Beneish M-Score",
            ScoreKind::Sloan => "Sloan Accrual",
            ScoreKind::Piotroski => "Piotroski F-Score",
            ScoreKind::Altman => "Altman Z-Score",
        }
    }

    /// Beneish and Sloan rise with earnings manipulation risk
    pub fn higher_is_better(&self) -> bool {
        matches!(self, ScoreKind::Piotroski | ScoreKind::Altman)
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Per-year values of one score; absent where the inputs did not allow it.
///
/// Used for both raw and normalized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSeries {
    pub kind: ScoreKind,
    pub values: BTreeMap<FiscalYear, Option<f64>>,
}

impl ScoreSeries {
    /// Non-finite values are stored as absent.
    pub fn new(kind: ScoreKind, values: impl IntoIterator<Item = (FiscalYear, Option<f64>)>) -> Self {
        Self {
            kind,
            values: values
                .into_iter()
                .map(|(y, v)| (y, v.filter(|x| x.is_finite())))
                .collect(),
        }
    }

    pub fn get(&self, year: &FiscalYear) -> Option<f64> {
        self.values.get(year).copied().flatten()
    }

    pub fn years(&self) -> impl Iterator<Item = &FiscalYear> {
        self.values.keys()
    }

    /// Years with a value, in year order
    pub fn present(&self) -> impl Iterator<Item = (&FiscalYear, f64)> {
        self.values.iter().filter_map(|(y, v)| v.map(|x| (y, x)))
    }

    pub fn present_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }
}

/// One series per score kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub beneish: ScoreSeries,
    pub sloan: ScoreSeries,
    pub piotroski: ScoreSeries,
    pub altman: ScoreSeries,
}

impl ScoreBoard {
    pub fn get(&self, kind: ScoreKind) -> &ScoreSeries {
        match kind {
            ScoreKind::Beneish => &self.beneish,
            ScoreKind::Sloan => &self.sloan,
            ScoreKind::Piotroski => &self.piotroski,
            ScoreKind::Altman => &self.altman,
        }
    }

    /// Series in [`ScoreKind::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &ScoreSeries> {
        [&self.beneish, &self.sloan, &self.piotroski, &self.altman].into_iter()
    }

    /// Apply `f` to every series, keeping the kind slots
    pub fn map(&self, f: impl Fn(&ScoreSeries) -> ScoreSeries) -> Self {
        Self {
            beneish: f(&self.beneish),
            sloan: f(&self.sloan),
            piotroski: f(&self.piotroski),
            altman: f(&self.altman),
        }
    }
}

/// Discrete recommendation derived from forensic alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Long")]
    StrongLong,
    Long,
    Hold,
    Short,
    #[serde(rename = "Strong Short")]
    StrongShort,
}

impl Recommendation {
    pub const STRONG_THRESHOLD: f64 = 1.0;
    pub const HOLD_THRESHOLD: f64 = 0.3;

    /// Map an alpha value to its band.
    ///
    /// Hold owns both ±0.3 edges; ±1.0 belong to Long and Short. The bands
    /// are calibrated against the 0.35/0.25/0.25/0.15 alpha weights. NaN
    /// maps to Hold so the function stays total.
    pub fn from_alpha(alpha: f64) -> Self {
        if alpha > Self::STRONG_THRESHOLD {
            Recommendation::StrongLong
        } else if alpha > Self::HOLD_THRESHOLD {
            Recommendation::Long
        } else if alpha >= -Self::HOLD_THRESHOLD {
            Recommendation::Hold
        } else if alpha >= -Self::STRONG_THRESHOLD {
            Recommendation::Short
        } else if alpha < -Self::STRONG_THRESHOLD {
            Recommendation::StrongShort
        } else {
            Recommendation::Hold
        }
    }

    /// Human-readable label for the recommendation
    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongLong => "Strong Long",
            Recommendation::Long => "Long",
            Recommendation::Hold => "Hold",
            Recommendation::Short => "Short",
            Recommendation::StrongShort => "Strong Short",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}
