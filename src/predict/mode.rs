use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// What to predict, and from which kind of table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Holistic quality from a ReaderBench table.
    HolisticQualityFromReaderbench,
    /// Holistic quality from a Coh-Metrix table.
    HolisticQualityFromCohmetrix,
    /// CWS and CIWS from a merged ReaderBench + GAMET table.
    CwsCiwsFromMerged,
}

impl Mode {
    pub const ALL: [Mode; 3] = [
        Mode::HolisticQualityFromReaderbench,
        Mode::HolisticQualityFromCohmetrix,
        Mode::CwsCiwsFromMerged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::HolisticQualityFromReaderbench => "holistic-quality-from-readerbench",
            Mode::HolisticQualityFromCohmetrix => "holistic-quality-from-cohmetrix",
            Mode::CwsCiwsFromMerged => "cws-ciws-from-merged",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ScoreError::UnknownMode(s.to_string()))
    }
}
