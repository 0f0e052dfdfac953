use chrono::{DateTime, Duration, Utc};

use super::types::{LookAngleOracle, LookAngleSample};

/// Sample the visible arc between `start` and `end`.
///
/// Fixed-step scan keeping only samples at or above the horizon. The window
/// endpoint is always evaluated, so arcs whose length is not a multiple of
/// the step still end exactly at `end`. Empty when the window is degenerate
/// or the oracle never answers inside it. Consumers draw straight segments
/// between consecutive points; no interpolation happens here.
pub fn sample_track(
    oracle: &impl LookAngleOracle,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Vec<LookAngleSample> {
    if end <= start || step <= Duration::zero() {
        return Vec::new();
    }

    let mut points = Vec::new();
    let mut cursor = start;
    while cursor < end {
        if let Some(sample) = oracle.evaluate(cursor) {
            if sample.is_above_horizon() {
                points.push(sample);
            }
        }
        cursor += step;
    }

    if let Some(sample) = oracle.evaluate(end) {
        if sample.is_above_horizon() {
            points.push(sample);
        }
    }

    points
}
