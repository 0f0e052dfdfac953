//! Pass prediction and horizon-crossing event search.
//!
//! Everything here is a pure function over a [`LookAngleOracle`]: the engine
//! keeps no state between calls and performs no I/O. Scans use fixed step
//! sizes, so a pass shorter than one coarse step can go undetected.

mod finder;
mod refine;
mod schedule;
mod track;
mod types;
mod window;

pub use finder::find_next_pass;
pub use refine::{refine_crossing, BISECTION_ITERATIONS};
pub use schedule::{upcoming_passes, CURSOR_ADVANCE_SECONDS, MAX_PASSES_PER_SCAN};
pub use track::sample_track;
pub use types::{LookAngleOracle, LookAngleSample, NextPassCache, Pass};
pub use window::current_pass_window;

/// Longest pass the scanners will follow before clamping the track.
pub const MAX_PASS_DURATION_SECONDS: i64 = 2 * 3600;
/// Coarse step for rise/set scans.
pub const PASS_SCAN_STEP_SECONDS: i64 = 30;
/// Fine step used inside a pass to locate the peak and the set event.
pub const PEAK_SCAN_STEP_SECONDS: i64 = 10;
/// How far the backward/forward scans around an in-progress pass may look.
pub const LOS_SEARCH_LIMIT_SECONDS: i64 = 24 * 3600;
/// Step between trajectory samples.
pub const TRACK_STEP_SECONDS: i64 = 30;
/// Default forward search window for the next rise event.
pub const NEXT_PASS_SEARCH_LIMIT_SECONDS: i64 = 24 * 3600;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::types::{LookAngleOracle, LookAngleSample};

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    pub fn at(seconds: f64) -> DateTime<Utc> {
        t0() + Duration::milliseconds((seconds * 1000.0).round() as i64)
    }

    /// Synthetic object with `elevation(t) = amplitude * sin(2π t / period) + offset`
    /// measured from [`t0`], azimuth drifting linearly.
    pub struct SineOracle {
        pub period_s: f64,
        pub amplitude: f64,
        pub offset: f64,
    }

    impl SineOracle {
        pub fn leo() -> Self {
            Self {
                period_s: 5400.0,
                amplitude: 45.0,
                offset: -10.0,
            }
        }

        pub fn elapsed(&self, time: DateTime<Utc>) -> f64 {
            (time - t0()).num_milliseconds() as f64 / 1000.0
        }

        /// First instant after `t0` where the elevation crosses zero upward.
        pub fn first_rise_s(&self) -> f64 {
            self.period_s * (-self.offset / self.amplitude).asin() / std::f64::consts::TAU
        }

        /// Matching downward crossing of the first pass.
        pub fn first_set_s(&self) -> f64 {
            self.period_s / 2.0 - self.first_rise_s()
        }
    }

    impl LookAngleOracle for SineOracle {
        fn evaluate(&self, time: DateTime<Utc>) -> Option<LookAngleSample> {
            let t = self.elapsed(time);
            let phase = std::f64::consts::TAU * t / self.period_s;
            Some(LookAngleSample {
                time,
                azimuth_deg: (t * 0.067).rem_euclid(360.0),
                elevation_deg: self.amplitude * phase.sin() + self.offset,
                range_km: 2000.0 - 1200.0 * phase.sin().max(0.0),
            })
        }
    }

    /// Oracle with no valid solution at any instant.
    pub struct DeadOracle;

    impl LookAngleOracle for DeadOracle {
        fn evaluate(&self, _time: DateTime<Utc>) -> Option<LookAngleSample> {
            None
        }
    }

    /// Object that never sets.
    pub struct AlwaysUpOracle;

    impl LookAngleOracle for AlwaysUpOracle {
        fn evaluate(&self, time: DateTime<Utc>) -> Option<LookAngleSample> {
            Some(LookAngleSample {
                time,
                azimuth_deg: 180.0,
                elevation_deg: 45.0,
                range_km: 800.0,
            })
        }
    }

    /// Sine oracle that has no solution before `start_s`.
    pub struct LateOracle {
        pub start_s: f64,
        pub inner: SineOracle,
    }

    impl LookAngleOracle for LateOracle {
        fn evaluate(&self, time: DateTime<Utc>) -> Option<LookAngleSample> {
            if self.inner.elapsed(time) < self.start_s {
                return None;
            }
            self.inner.evaluate(time)
        }
    }
}
