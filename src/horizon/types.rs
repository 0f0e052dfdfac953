use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Look angles of the tracked object at one instant, as produced by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LookAngleSample {
    pub time: DateTime<Utc>,
    /// Degrees clockwise from true north, normalized into [0, 360).
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

impl LookAngleSample {
    pub fn is_above_horizon(&self) -> bool {
        self.elevation_deg >= 0.0
    }
}

/// Propagation backend the engine scans over.
///
/// `None` means the model has no valid solution at `time` (decayed satellite,
/// epoch out of range); scans skip the sample and keep going. Implementations
/// must return `None` rather than panic for instants they cannot handle.
pub trait LookAngleOracle {
    fn evaluate(&self, time: DateTime<Utc>) -> Option<LookAngleSample>;
}

/// One visibility window.
///
/// `aos` is absent when the pass was already in progress at the start of the
/// search; `los` is absent when no set event was found within the search
/// limits. When both are present, `aos.time < los.time` and the peak lies
/// between them. The track holds only samples at or above the horizon and may
/// be empty if the oracle never answered inside the window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Pass {
    pub aos: Option<LookAngleSample>,
    pub los: Option<LookAngleSample>,
    pub peak: LookAngleSample,
    pub track: Vec<LookAngleSample>,
}

/// Caller-owned memoization of a [`find_next_pass`](super::find_next_pass)
/// result. The engine itself never caches; holders decide when to recompute
/// by consulting [`is_current`](NextPassCache::is_current).
#[derive(Debug, Clone, PartialEq)]
pub struct NextPassCache {
    pass: Pass,
}

impl NextPassCache {
    pub fn new(pass: Pass) -> Self {
        Self { pass }
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    /// A cached pass stays usable until its rise time is no longer in the
    /// future. A pass without a known rise is never considered current.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.pass.aos.is_some_and(|aos| aos.time > now)
    }
}
