use forensic_core::{FiscalYear, ScoreBoard};
use serde::{Deserialize, Serialize};

/// Beneish cut-off above which a company is flagged as a likely manipulator
pub const BENEISH_MANIPULATION_THRESHOLD: f64 = -1.78;
pub const ALTMAN_SAFE_THRESHOLD: f64 = 2.99;
pub const ALTMAN_DISTRESS_THRESHOLD: f64 = 1.81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneishFlag {
    LikelyManipulator,
    UnlikelyManipulator,
}

impl BeneishFlag {
    pub fn from_score(m: f64) -> Self {
        if m > BENEISH_MANIPULATION_THRESHOLD {
            BeneishFlag::LikelyManipulator
        } else {
            BeneishFlag::UnlikelyManipulator
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltmanZone {
    Safe,
    Grey,
    Distress,
}

impl AltmanZone {
    pub fn from_score(z: f64) -> Self {
        match z {
            z if z > ALTMAN_SAFE_THRESHOLD => AltmanZone::Safe,
            z if z < ALTMAN_DISTRESS_THRESHOLD => AltmanZone::Distress,
            _ => AltmanZone::Grey,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiotroskiStrength {
    Strong,
    Neutral,
    Weak,
}

impl PiotroskiStrength {
    pub fn from_score(f: f64) -> Self {
        match f {
            f if f >= 8.0 => PiotroskiStrength::Strong,
            f if f <= 2.0 => PiotroskiStrength::Weak,
            _ => PiotroskiStrength::Neutral,
        }
    }
}

/// Conventional reading of one year's raw scores; absent where the score is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInterpretation {
    pub beneish: Option<BeneishFlag>,
    pub altman: Option<AltmanZone>,
    pub piotroski: Option<PiotroskiStrength>,
}

impl ScoreInterpretation {
    pub fn interpret(board: &ScoreBoard, year: &FiscalYear) -> Self {
        Self {
            beneish: board.beneish.get(year).map(BeneishFlag::from_score),
            altman: board.altman.get(year).map(AltmanZone::from_score),
            piotroski: board.piotroski.get(year).map(PiotroskiStrength::from_score),
        }
    }
}
