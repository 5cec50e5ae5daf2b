use crate::engine::math::round_to2;
use crate::mode::ModeRule;
use crate::result::{CharClassCounts, TestResult};
use crate::units::SpeedUnit;

/// Speeds at or above this read as a glitch, not a measurement; displays
/// show them as infinite.
pub const INFINITE_SPEED_WPM: f64 = 1000.0;
const MIN_ACCURACY_PERCENT: f64 = 75.0;

/// Per-field range classification. Advisory: a breach never blocks display,
/// it only gates ledger writes and adds a diagnostic line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub valid: bool,
    pub speed_out_of_range: bool,
    pub raw_out_of_range: bool,
    pub accuracy_out_of_range: bool,
}

/// Scalar values ready for the results screen, converted into the display
/// unit and rounded according to the decimals setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMetrics {
    pub speed: f64,
    pub raw_speed: f64,
    pub speed_is_infinite: bool,
    pub accuracy: f64,
    pub consistency: f64,
    pub key_consistency: f64,
    pub duration_seconds: f64,
    pub afk_percent: f64,
    pub char_counts: CharClassCounts,
    pub validity: Validity,
}

pub fn classify_validity(result: &TestResult) -> Validity {
    let ceiling = ModeRule::for_test(result.mode, &result.submode).speed_ceiling();
    let speed_out_of_range = result.speed < 0.0 || result.speed > ceiling;
    let raw_out_of_range = result.raw_speed < 0.0 || result.raw_speed > ceiling;
    let accuracy_out_of_range =
        result.accuracy < MIN_ACCURACY_PERCENT || result.accuracy > 100.0;
    Validity {
        valid: !(speed_out_of_range || raw_out_of_range || accuracy_out_of_range),
        speed_out_of_range,
        raw_out_of_range,
        accuracy_out_of_range,
    }
}

pub fn compute_display_metrics(
    result: &TestResult,
    unit: &SpeedUnit,
    show_decimals: bool,
) -> DisplayMetrics {
    let speed_is_infinite = result.speed >= INFINITE_SPEED_WPM;
    let (speed, raw_speed, accuracy, consistency, key_consistency, duration_seconds) =
        if show_decimals {
            (
                unit.convert(result.speed),
                unit.convert(result.raw_speed),
                round_to2(result.accuracy),
                round_to2(result.consistency),
                round_to2(result.key_consistency),
                round_to2(result.duration_seconds),
            )
        } else {
            (
                unit.from_wpm(result.speed).round(),
                unit.from_wpm(result.raw_speed).round(),
                result.accuracy.floor(),
                result.consistency.round(),
                result.key_consistency.round(),
                result.duration_seconds.round(),
            )
        };
    let afk_percent = round_to2(result.afk_seconds / result.duration_seconds * 100.0);

    DisplayMetrics {
        speed,
        raw_speed,
        speed_is_infinite,
        accuracy,
        consistency,
        key_consistency,
        duration_seconds,
        afk_percent,
        char_counts: result.char_counts,
        validity: classify_validity(result),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::mode::{Difficulty, Mode};
    use crate::units::UnitRegistry;

    fn make_result(mode: Mode, submode: &str, speed: f64, accuracy: f64) -> TestResult {
        TestResult {
            mode,
            submode: submode.to_string(),
            speed,
            raw_speed: speed + 4.0,
            accuracy,
            consistency: 70.5,
            key_consistency: 62.3,
            duration_seconds: 60.0,
            afk_seconds: 3.0,
            char_counts: CharClassCounts {
                correct: 300,
                incorrect: 10,
                extra: 2,
                missed: 1,
            },
            speed_samples: Vec::new(),
            raw_samples: Vec::new(),
            error_samples: Vec::new(),
            punctuation: false,
            numbers: false,
            blind: false,
            lazy_mode: false,
            bailed_out: false,
            difficulty: Difficulty::Normal,
            language: "english".to_string(),
            funbox: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    fn wpm() -> crate::units::SpeedUnit {
        UnitRegistry::new().get("wpm").unwrap().clone()
    }

    #[test]
    fn test_speed_within_ceiling_is_valid() {
        // The fixture derives raw as speed + 4, so raw lands exactly on the
        // ceiling here; at the ceiling is still in range.
        let validity = classify_validity(&make_result(Mode::Words, "25", 346.0, 96.0));
        assert!(validity.valid);
        assert!(!validity.speed_out_of_range);
        assert!(!validity.raw_out_of_range);
    }

    #[test]
    fn test_speed_over_ceiling_is_flagged() {
        let validity = classify_validity(&make_result(Mode::Words, "25", 360.0, 96.0));
        assert!(!validity.valid);
        assert!(validity.speed_out_of_range);
        assert!(validity.raw_out_of_range);
        assert!(!validity.accuracy_out_of_range);
    }

    #[test]
    fn test_ten_word_sprint_allows_higher_speed() {
        let validity = classify_validity(&make_result(Mode::Words, "10", 400.0, 96.0));
        assert!(!validity.speed_out_of_range);
        // The same speed in a longer test is out of range
        let validity = classify_validity(&make_result(Mode::Words, "50", 400.0, 96.0));
        assert!(validity.speed_out_of_range);
    }

    #[test]
    fn test_negative_speed_is_flagged() {
        let validity = classify_validity(&make_result(Mode::Time, "60", -5.0, 96.0));
        assert!(validity.speed_out_of_range);
    }

    #[test]
    fn test_accuracy_band() {
        assert!(classify_validity(&make_result(Mode::Time, "60", 80.0, 74.9)).accuracy_out_of_range);
        assert!(!classify_validity(&make_result(Mode::Time, "60", 80.0, 75.0)).accuracy_out_of_range);
        assert!(!classify_validity(&make_result(Mode::Time, "60", 80.0, 100.0)).accuracy_out_of_range);
        assert!(classify_validity(&make_result(Mode::Time, "60", 80.0, 100.5)).accuracy_out_of_range);
    }

    #[test]
    fn test_metrics_with_decimals() {
        let result = make_result(Mode::Time, "60", 81.333, 96.789);
        let metrics = compute_display_metrics(&result, &wpm(), true);
        assert_eq!(metrics.speed, 81.33);
        assert_eq!(metrics.accuracy, 96.79);
        assert_eq!(metrics.consistency, 70.5);
        assert!(!metrics.speed_is_infinite);
    }

    #[test]
    fn test_metrics_without_decimals_floor_accuracy() {
        let result = make_result(Mode::Time, "60", 81.6, 96.789);
        let metrics = compute_display_metrics(&result, &wpm(), false);
        assert_eq!(metrics.speed, 82.0);
        assert_eq!(metrics.accuracy, 96.0);
        assert_eq!(metrics.consistency, 71.0);
    }

    #[test]
    fn test_speed_converts_through_unit() {
        let registry = UnitRegistry::new();
        let cpm = registry.get("cpm").unwrap();
        let result = make_result(Mode::Time, "60", 80.0, 96.0);
        let metrics = compute_display_metrics(&result, cpm, false);
        assert_eq!(metrics.speed, 400.0);
        assert_eq!(metrics.raw_speed, 420.0);
    }

    #[test]
    fn test_afk_percent() {
        let result = make_result(Mode::Time, "60", 80.0, 96.0);
        let metrics = compute_display_metrics(&result, &wpm(), true);
        assert_eq!(metrics.afk_percent, 5.0);
    }

    #[test]
    fn test_thousand_wpm_reads_as_infinite() {
        let result = make_result(Mode::Time, "60", 1000.0, 96.0);
        let metrics = compute_display_metrics(&result, &wpm(), false);
        assert!(metrics.speed_is_infinite);
    }
}
