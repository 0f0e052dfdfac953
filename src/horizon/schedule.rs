use chrono::{DateTime, Duration, Utc};

use super::finder::find_next_pass;
use super::types::{LookAngleOracle, Pass};
use super::MAX_PASS_DURATION_SECONDS;

/// Upper bound on passes returned by one enumeration; bounds the cost when
/// an oracle reports near-continuous visibility.
pub const MAX_PASSES_PER_SCAN: usize = 100;
/// Gap placed after each found pass before the search resumes.
pub const CURSOR_ADVANCE_SECONDS: i64 = 60;

/// Enumerate the passes between `start` and `start + horizon`.
///
/// Repeated [`find_next_pass`] with a cursor that jumps past each found pass:
/// to just after its set event, or past the maximum pass duration when the
/// set is unknown. The per-call search budget shrinks as the cursor nears
/// the horizon, so no reported pass rises beyond it. Results are strictly
/// time-ordered and non-overlapping by construction.
pub fn upcoming_passes(
    oracle: &impl LookAngleOracle,
    start: DateTime<Utc>,
    horizon: Duration,
) -> Vec<Pass> {
    let limit = start + horizon;
    let mut cursor = start;
    let mut passes = Vec::new();

    for _ in 0..MAX_PASSES_PER_SCAN {
        let remaining = limit - cursor;
        if remaining <= Duration::zero() {
            break;
        }

        let Some(pass) = find_next_pass(oracle, cursor, remaining) else {
            break;
        };

        let resume_from = match (pass.los, pass.aos) {
            (Some(los), _) => los.time,
            (None, Some(aos)) => aos.time + Duration::seconds(MAX_PASS_DURATION_SECONDS),
            (None, None) => pass.peak.time + Duration::seconds(MAX_PASS_DURATION_SECONDS),
        };
        cursor = resume_from + Duration::seconds(CURSOR_ADVANCE_SECONDS);
        passes.push(pass);

        if cursor > limit {
            break;
        }
    }

    passes
}
