use serde::{Deserialize, Serialize};

/// Top-level test mode. The submode string narrows it (seconds for time
/// tests, word count for word tests, length class for quotes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Time,
    Words,
    Quote,
    Zen,
    Custom,
}

impl Mode {
    pub fn as_key(&self) -> &'static str {
        match self {
            Mode::Time => "time",
            Mode::Words => "words",
            Mode::Quote => "quote",
            Mode::Zen => "zen",
            Mode::Custom => "custom",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Expert,
    Master,
}

impl Difficulty {
    pub fn as_key(&self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }
}

/// Per-mode policy bundle. Keeps the mode-dependent rules in one place
/// instead of scattered string comparisons.
#[derive(Clone, Debug)]
pub struct ModeRule {
    mode: Mode,
    submode: String,
    submode_count: Option<u64>,
}

const SPEED_CEILING_WPM: f64 = 350.0;
// Ten-word sprints legitimately spike past the normal ceiling.
const SHORT_WORDS_CEILING_WPM: f64 = 420.0;
const SHORT_WORDS_COUNT: u64 = 10;

impl ModeRule {
    pub fn for_test(mode: Mode, submode: &str) -> Self {
        Self {
            mode,
            submode: submode.to_string(),
            submode_count: submode.trim().parse().ok(),
        }
    }

    /// Highest believable speed in wpm. Applies to both wpm and raw.
    pub fn speed_ceiling(&self) -> f64 {
        if self.mode == Mode::Words && self.submode_count == Some(SHORT_WORDS_COUNT) {
            SHORT_WORDS_CEILING_WPM
        } else {
            SPEED_CEILING_WPM
        }
    }

    /// Time tests always end on a whole second; every other mode can end
    /// mid-second and may have its trailing partial sample dropped.
    pub fn trims_partial_sample(&self) -> bool {
        self.mode != Mode::Time
    }

    /// Quote results never write to the record ledger.
    pub fn can_set_records(&self) -> bool {
        self.mode != Mode::Quote
    }

    /// Heading for the test type summary, e.g. "time 60" or "zen".
    pub fn heading(&self) -> String {
        let submode = self.submode.trim();
        if submode.is_empty() {
            self.mode.as_key().to_string()
        } else {
            format!("{} {}", self.mode.as_key(), submode)
        }
    }
}
