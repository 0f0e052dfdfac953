use chrono::{DateTime, Utc};

use super::types::{LookAngleOracle, LookAngleSample};

/// Bisection steps per crossing. Fourteen halvings of a coarse-scan bracket
/// land well under a second of timing error at a fixed, predictable cost.
pub const BISECTION_ITERATIONS: u32 = 14;

/// Narrow a bracketed horizon crossing to its instant.
///
/// The caller guarantees that the elevation sign differs between `low` and
/// `high` in the direction given by `rising` (negative to non-negative when
/// rising, the reverse when setting). Returns the last sample seen on the far
/// side of the crossing; `None` if the oracle stopped answering before any
/// far-side sample was found.
pub fn refine_crossing(
    oracle: &impl LookAngleOracle,
    low: DateTime<Utc>,
    high: DateTime<Utc>,
    rising: bool,
) -> Option<LookAngleSample> {
    let mut low = low;
    let mut high = high;
    let mut best = None;

    for _ in 0..BISECTION_ITERATIONS {
        let mid = low + (high - low) / 2;
        let Some(sample) = oracle.evaluate(mid) else {
            break;
        };

        if sample.is_above_horizon() == rising {
            best = Some(sample);
            high = mid;
        } else {
            low = mid;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::testing::{at, DeadOracle, SineOracle};

    #[test]
    fn pins_rising_crossing_inside_bracket() {
        let oracle = SineOracle::leo();
        let rise = oracle.first_rise_s();
        let low = at(rise - 25.0);
        let high = at(rise + 35.0);

        let refined = refine_crossing(&oracle, low, high, true).unwrap();

        assert!(refined.time > low && refined.time < high);
        assert!(refined.elevation_deg >= 0.0);
        assert!((oracle.elapsed(refined.time) - rise).abs() < 0.05);
    }

    #[test]
    fn pins_setting_crossing() {
        let oracle = SineOracle::leo();
        let set = oracle.first_set_s();

        let refined = refine_crossing(&oracle, at(set - 30.0), at(set + 30.0), false).unwrap();

        assert!(refined.elevation_deg < 0.0);
        assert!((oracle.elapsed(refined.time) - set).abs() < 0.05);
    }

    #[test]
    fn unavailable_oracle_yields_none() {
        assert!(refine_crossing(&DeadOracle, at(0.0), at(60.0), true).is_none());
    }
}
