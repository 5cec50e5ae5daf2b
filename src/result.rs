use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mode::{Difficulty, Mode};

/// Character totals in display order: correct, incorrect, extra, missed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClassCounts {
    pub correct: u32,
    pub incorrect: u32,
    pub extra: u32,
    pub missed: u32,
}

/// Immutable snapshot of one finished test. Speeds are canonical wpm;
/// unit conversion happens at display time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub mode: Mode,
    #[serde(default)]
    pub submode: String,
    pub speed: f64,
    pub raw_speed: f64,
    pub accuracy: f64,
    pub consistency: f64,
    #[serde(default)]
    pub key_consistency: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub afk_seconds: f64,
    #[serde(default)]
    pub char_counts: CharClassCounts,
    #[serde(default)]
    pub speed_samples: Vec<f64>,
    #[serde(default)]
    pub raw_samples: Vec<f64>,
    #[serde(default)]
    pub error_samples: Vec<u32>,
    #[serde(default)]
    pub punctuation: bool,
    #[serde(default)]
    pub numbers: bool,
    #[serde(default)]
    pub blind: bool,
    #[serde(default)]
    pub lazy_mode: bool,
    #[serde(default)]
    pub bailed_out: bool,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub funbox: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

fn default_language() -> String {
    "english".to_string()
}

impl TestResult {
    /// Basic sanity only. Out-of-range speeds are a validity concern, not an
    /// error; a snapshot fails here only when no meaningful report could be
    /// produced from it.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(Error::InvalidResult(format!(
                "duration must be positive, got {}s",
                self.duration_seconds
            )));
        }
        if !self.afk_seconds.is_finite() || self.afk_seconds < 0.0 {
            return Err(Error::InvalidResult(format!(
                "afk time must be non-negative, got {}s",
                self.afk_seconds
            )));
        }
        if self.afk_seconds > self.duration_seconds {
            return Err(Error::InvalidResult(format!(
                "afk time {}s exceeds duration {}s",
                self.afk_seconds, self.duration_seconds
            )));
        }
        for (name, value) in [
            ("speed", self.speed),
            ("raw speed", self.raw_speed),
            ("accuracy", self.accuracy),
            ("consistency", self.consistency),
            ("key consistency", self.key_consistency),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidResult(format!("{name} is not finite")));
            }
        }
        Ok(())
    }
}
