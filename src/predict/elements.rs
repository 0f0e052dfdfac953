use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::Elements;
use utoipa::ToSchema;

const EARTH_RADIUS_KM: f64 = 6378.137;
const GM_KM3_S2: f64 = 398_600.4418;

/// Orbital-data readout derived from a parsed element set, for display next
/// to the tracking view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ElementSummary {
    pub name: Option<String>,
    pub norad_id: u64,
    pub international_designator: Option<String>,
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub right_ascension_deg: f64,
    pub eccentricity: f64,
    pub argument_of_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_day: f64,
    pub period_minutes: f64,
    pub perigee_altitude_km: f64,
    pub apogee_altitude_km: f64,
}

impl ElementSummary {
    pub fn from_elements(elements: &Elements) -> Self {
        let period_minutes = 1440.0 / elements.mean_motion;
        let period_s = period_minutes * 60.0;
        let semi_major_km =
            (GM_KM3_S2 * (period_s / std::f64::consts::TAU).powi(2)).cbrt();

        Self {
            name: elements.object_name.clone(),
            norad_id: elements.norad_id,
            international_designator: elements.international_designator.clone(),
            epoch: DateTime::from_naive_utc_and_offset(elements.datetime, Utc),
            inclination_deg: elements.inclination,
            right_ascension_deg: elements.right_ascension,
            eccentricity: elements.eccentricity,
            argument_of_perigee_deg: elements.argument_of_perigee,
            mean_anomaly_deg: elements.mean_anomaly,
            mean_motion_rev_day: elements.mean_motion,
            period_minutes,
            perigee_altitude_km: semi_major_km * (1.0 - elements.eccentricity) - EARTH_RADIUS_KM,
            apogee_altitude_km: semi_major_km * (1.0 + elements.eccentricity) - EARTH_RADIUS_KM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn derives_orbit_geometry_from_iss_elements() {
        let elements = Elements::from_tle(
            Some("ISS (ZARYA)".to_string()),
            ISS_LINE1.as_bytes(),
            ISS_LINE2.as_bytes(),
        )
        .unwrap();

        let summary = ElementSummary::from_elements(&elements);

        assert_eq!(summary.norad_id, 25544);
        assert!((summary.inclination_deg - 51.6416).abs() < 1e-4);
        assert!((summary.period_minutes - 91.6).abs() < 0.5);
        assert!(summary.perigee_altitude_km > 250.0 && summary.perigee_altitude_km < 450.0);
        assert!(summary.apogee_altitude_km >= summary.perigee_altitude_km);
        assert!(summary.eccentricity < 0.01);
    }
}
