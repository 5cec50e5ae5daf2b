pub mod annotations;
pub mod math;
pub mod metrics;
pub mod series;

pub use series::{ChartSeries, ScaleBounds};
