/// Round to two decimal places, half away from zero.
pub fn round_to2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Centered moving average. Each output sample averages the window
/// `[i - radius, i + radius]`, clamped at both edges, so short series and
/// endpoints are averaged over whatever neighbors exist.
pub fn smooth(values: &[f64], radius: usize) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = i.saturating_sub(radius);
        let end = (i + radius + 1).min(values.len());
        let window = &values[start..end];
        let sum: f64 = window.iter().sum();
        smoothed.push(sum / window.len() as f64);
    }
    smoothed
}

pub fn series_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

pub fn series_min(values: &[f64]) -> f64 {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if min.is_finite() { min } else { 0.0 }
}

/// Two-decimal rounding, then minimal formatting: "12", "12.5", "12.34".
pub fn format_seconds(value: f64) -> String {
    let mut formatted = format!("{:.2}", round_to2(value));
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }
    formatted
}
