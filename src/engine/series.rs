use crate::engine::math::{format_seconds, round_to2, series_max, series_min, smooth};
use crate::mode::ModeRule;
use crate::result::TestResult;
use crate::units::SpeedUnit;

const RAW_SMOOTHING_RADIUS: usize = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
    pub error_max: u32,
}

/// Chart-ready data. Speeds are converted into the display unit; errors
/// stay as raw counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub primary: Vec<f64>,
    pub raw: Vec<f64>,
    pub errors: Vec<u32>,
    pub bounds: ScaleBounds,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SeriesOptions {
    pub unsmoothed_raw: bool,
    pub start_at_zero: bool,
}

/// Turn per-second samples into chart series.
///
/// Order matters: labels first, then per-sample unit conversion with
/// two-decimal rounding, then the partial-sample trim, then raw smoothing.
/// The error series is never converted and never trimmed.
pub fn build_chart_series(
    result: &TestResult,
    unit: &SpeedUnit,
    options: SeriesOptions,
) -> ChartSeries {
    let rule = ModeRule::for_test(result.mode, &result.submode);
    let duration = result.duration_seconds;
    let last_second_not_round = duration.fract() > 0.0;

    let mut labels: Vec<String> = (1..=result.speed_samples.len())
        .map(|i| i.to_string())
        .collect();
    if last_second_not_round && let Some(last) = labels.last_mut() {
        *last = format_seconds(duration);
    }

    let mut primary: Vec<f64> = result
        .speed_samples
        .iter()
        .map(|&wpm| round_to2(unit.from_wpm(wpm)))
        .collect();
    let mut converted_raw: Vec<f64> = result
        .raw_samples
        .iter()
        .map(|&wpm| round_to2(unit.from_wpm(wpm)))
        .collect();

    // A trailing sample covering less than half a second says more about
    // the cutoff than about the typist.
    if rule.trims_partial_sample() && last_second_not_round && duration.fract() < 0.5 {
        labels.pop();
        primary.pop();
        converted_raw.pop();
    }

    let raw: Vec<f64> = if options.unsmoothed_raw {
        converted_raw
    } else {
        smooth(&converted_raw, RAW_SMOOTHING_RADIUS)
            .iter()
            .map(|v| v.round())
            .collect()
    };

    let max = series_max(&primary).max(series_max(&raw));
    let min = if options.start_at_zero {
        0.0
    } else {
        series_min(&primary).min(series_min(&raw))
    };
    let error_max = result.error_samples.iter().copied().max().unwrap_or(0);

    ChartSeries {
        labels,
        primary,
        raw,
        errors: result.error_samples.clone(),
        bounds: ScaleBounds {
            min,
            max,
            error_max,
        },
    }
}
