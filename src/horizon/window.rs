use chrono::Duration;

use super::refine::refine_crossing;
use super::track::sample_track;
use super::types::{LookAngleOracle, LookAngleSample, Pass};
use super::{
    LOS_SEARCH_LIMIT_SECONDS, MAX_PASS_DURATION_SECONDS, PASS_SCAN_STEP_SECONDS,
    TRACK_STEP_SECONDS,
};

/// Reconstruct the full pass window around an already-visible object.
///
/// `current` must be at or above the horizon. Either crossing may come back
/// absent when it lies beyond the 24 h scan limit; the track is then clamped
/// to the maximum pass duration so it can never grow without bound.
pub fn current_pass_window(oracle: &impl LookAngleOracle, current: &LookAngleSample) -> Pass {
    let aos = find_aos_before(oracle, current);
    let los = find_los_after(oracle, current);

    let track_start = aos.map_or(current.time, |s| s.time);
    let track_end = match los {
        Some(los) if los.time > track_start => los.time,
        _ => track_start + Duration::seconds(MAX_PASS_DURATION_SECONDS),
    };

    let track = sample_track(
        oracle,
        track_start,
        track_end,
        Duration::seconds(TRACK_STEP_SECONDS),
    );

    let mut peak = *current;
    for point in &track {
        if point.elevation_deg > peak.elevation_deg {
            peak = *point;
        }
    }

    Pass {
        aos,
        los,
        peak,
        track,
    }
}

/// Step backward until the object dips below the horizon, then refine the
/// rise instant inside the last bracket. `None` when the object has been up
/// for longer than the whole lookback window.
fn find_aos_before(
    oracle: &impl LookAngleOracle,
    current: &LookAngleSample,
) -> Option<LookAngleSample> {
    let mut last_above = *current;

    let mut elapsed = PASS_SCAN_STEP_SECONDS;
    while elapsed <= LOS_SEARCH_LIMIT_SECONDS {
        let time = current.time - Duration::seconds(elapsed);
        if let Some(candidate) = oracle.evaluate(time) {
            if candidate.elevation_deg < 0.0 {
                return refine_crossing(oracle, time, last_above.time, true).or(Some(last_above));
            }
            last_above = candidate;
        }
        elapsed += PASS_SCAN_STEP_SECONDS;
    }

    None
}

/// Forward twin of [`find_aos_before`] for the set event.
fn find_los_after(
    oracle: &impl LookAngleOracle,
    current: &LookAngleSample,
) -> Option<LookAngleSample> {
    let mut last_above = *current;

    let mut elapsed = PASS_SCAN_STEP_SECONDS;
    while elapsed <= LOS_SEARCH_LIMIT_SECONDS {
        let time = current.time + Duration::seconds(elapsed);
        if let Some(candidate) = oracle.evaluate(time) {
            if candidate.elevation_deg < 0.0 {
                return refine_crossing(oracle, last_above.time, time, false).or(Some(candidate));
            }
            last_above = candidate;
        }
        elapsed += PASS_SCAN_STEP_SECONDS;
    }

    None
}
