use chrono::{DateTime, Duration, Utc};

use super::refine::refine_crossing;
use super::track::sample_track;
use super::types::{LookAngleOracle, LookAngleSample, Pass};
use super::{
    MAX_PASS_DURATION_SECONDS, PASS_SCAN_STEP_SECONDS, PEAK_SCAN_STEP_SECONDS, TRACK_STEP_SECONDS,
};

/// Find the next pass whose rise lies strictly after `reference`.
///
/// The coarse scan watches for the elevation sign flipping from negative to
/// non-negative between consecutive samples, so a pass already in progress at
/// `reference` is never reported; use
/// [`current_pass_window`](super::current_pass_window) for that case.
/// Returns `None` when no rise event occurs within `max_search` or the
/// oracle never produces a sample.
pub fn find_next_pass(
    oracle: &impl LookAngleOracle,
    reference: DateTime<Utc>,
    max_search: Duration,
) -> Option<Pass> {
    let mut prev_time = reference;
    let mut prev = oracle.evaluate(reference);

    let mut elapsed = PASS_SCAN_STEP_SECONDS;
    while elapsed <= max_search.num_seconds() {
        let time = reference + Duration::seconds(elapsed);
        elapsed += PASS_SCAN_STEP_SECONDS;

        // Unavailable samples leave the previous bracket edge in place.
        let Some(current) = oracle.evaluate(time) else {
            continue;
        };

        let rising_edge =
            current.is_above_horizon() && prev.is_some_and(|p| p.elevation_deg < 0.0);
        if rising_edge {
            let aos = refine_crossing(oracle, prev_time, time, true).unwrap_or(current);
            return Some(scan_pass_from(oracle, aos));
        }

        prev_time = time;
        prev = Some(current);
    }

    None
}

/// Fine scan from the rise instant: running peak, set-event watch, and the
/// sampled track. Exhausting the maximum pass duration without a set event
/// leaves `los` unset and clamps the track.
fn scan_pass_from(oracle: &impl LookAngleOracle, aos: LookAngleSample) -> Pass {
    let mut peak = aos;
    let mut los = None;
    let mut last_above = aos;

    let limit = aos.time + Duration::seconds(MAX_PASS_DURATION_SECONDS);
    let mut scan = aos.time + Duration::seconds(PEAK_SCAN_STEP_SECONDS);

    while scan <= limit {
        let Some(candidate) = oracle.evaluate(scan) else {
            break;
        };

        if candidate.elevation_deg > peak.elevation_deg {
            peak = candidate;
        }

        if candidate.is_above_horizon() {
            last_above = candidate;
        } else if last_above.time > aos.time {
            los = refine_crossing(oracle, last_above.time, scan, false).or(Some(candidate));
            break;
        }

        scan += Duration::seconds(PEAK_SCAN_STEP_SECONDS);
    }

    let end = los.map_or(limit, |s| s.time);
    let track = sample_track(oracle, aos.time, end, Duration::seconds(TRACK_STEP_SECONDS));

    Pass {
        aos: Some(aos),
        los,
        peak,
        track,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::testing::{at, t0, DeadOracle, LateOracle, SineOracle};

    #[test]
    fn brackets_analytic_crossings() {
        let oracle = SineOracle::leo();

        let pass = find_next_pass(&oracle, t0(), Duration::hours(24)).unwrap();

        let aos = pass.aos.unwrap();
        let los = pass.los.unwrap();
        assert!((oracle.elapsed(aos.time) - oracle.first_rise_s()).abs() < 0.1);
        assert!((oracle.elapsed(los.time) - oracle.first_set_s()).abs() < 0.1);
        assert!((pass.peak.elevation_deg - 35.0).abs() < 0.01);
        assert!((oracle.elapsed(pass.peak.time) - 1350.0).abs() <= 10.0);
        assert!(!pass.track.is_empty());
        for pair in pass.track.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn pass_in_progress_is_skipped() {
        let oracle = SineOracle::leo();
        // t=1000 is inside the first pass; the next reported rise belongs to
        // the second one.
        let reference = at(1000.0);

        let pass = find_next_pass(&oracle, reference, Duration::hours(24)).unwrap();

        let aos = pass.aos.unwrap();
        assert!(aos.time > reference);
        let second_rise = oracle.period_s + oracle.first_rise_s();
        assert!((oracle.elapsed(aos.time) - second_rise).abs() < 0.1);
    }

    #[test]
    fn none_when_object_never_rises() {
        let oracle = SineOracle {
            period_s: 5400.0,
            amplitude: 45.0,
            offset: -100.0,
        };

        assert!(find_next_pass(&oracle, t0(), Duration::hours(24)).is_none());
    }

    #[test]
    fn none_when_oracle_unavailable() {
        assert!(find_next_pass(&DeadOracle, t0(), Duration::hours(24)).is_none());
    }

    #[test]
    fn scan_survives_an_unavailable_prefix() {
        // No solution until t=3000, inside the below-horizon gap between the
        // first and second pass.
        let oracle = LateOracle {
            start_s: 3000.0,
            inner: SineOracle::leo(),
        };

        let pass = find_next_pass(&oracle, t0(), Duration::hours(24)).unwrap();

        let aos = pass.aos.unwrap();
        let second_rise = oracle.inner.period_s + oracle.inner.first_rise_s();
        assert!((oracle.inner.elapsed(aos.time) - second_rise).abs() < 0.1);
    }

    #[test]
    fn search_window_shorter_than_one_step_finds_nothing() {
        let oracle = SineOracle::leo();
        assert!(find_next_pass(&oracle, t0(), Duration::seconds(20)).is_none());
    }
}
