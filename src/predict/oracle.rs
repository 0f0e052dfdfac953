use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::horizon::{LookAngleOracle, LookAngleSample};
use crate::predict::error::PredictError;
use crate::predict::observer::Observer;

/// SGP4-backed look-angle oracle for one satellite and one observer.
///
/// Propagation failures (epoch out of range, decayed orbit) surface as `None`
/// samples; the scanning code treats those as gaps and keeps going.
pub struct SatelliteOracle {
    observer: Observer,
    elements: Elements,
    constants: Constants,
}

impl SatelliteOracle {
    pub fn new(observer: Observer, elements: Elements) -> Result<Self, PredictError> {
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::Elements(e.to_string()))?;
        Ok(Self {
            observer,
            elements,
            constants,
        })
    }

    pub fn observer(&self) -> Observer {
        self.observer
    }
}

impl LookAngleOracle for SatelliteOracle {
    fn evaluate(&self, time: DateTime<Utc>) -> Option<LookAngleSample> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .ok()?;
        let prediction = self.constants.propagate(minutes).ok()?;

        let gmst =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()));
        let sat_ecef = teme_to_ecef_position(prediction.position, gmst);
        let obs_ecef = self.observer.position_ecef_km();

        let dr = [
            sat_ecef[0] - obs_ecef[0],
            sat_ecef[1] - obs_ecef[1],
            sat_ecef[2] - obs_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, self.observer.lat_rad(), self.observer.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (up / range_km).asin().to_degrees()
        } else {
            0.0
        };

        Some(LookAngleSample {
            time,
            azimuth_deg,
            elevation_deg,
            range_km,
        })
    }
}

fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // AIAA 2006-6753 appendix test case with valid checksums.
    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn iss_oracle() -> SatelliteOracle {
        let elements = Elements::from_tle(
            Some("ISS (ZARYA)".to_string()),
            ISS_LINE1.as_bytes(),
            ISS_LINE2.as_bytes(),
        )
        .unwrap();
        SatelliteOracle::new(Observer::new(35.6812, 139.7671, 40.0), elements).unwrap()
    }

    #[test]
    fn produces_normalized_look_angles_near_epoch() {
        let oracle = iss_oracle();
        let near_epoch = Utc.with_ymd_and_hms(2008, 9, 20, 12, 30, 0).unwrap();

        let sample = oracle.evaluate(near_epoch).unwrap();

        assert_eq!(sample.time, near_epoch);
        assert!((0.0..360.0).contains(&sample.azimuth_deg));
        assert!((-90.0..=90.0).contains(&sample.elevation_deg));
        // LEO slant range from the ground is bounded by a few Earth radii.
        assert!(sample.range_km > 300.0 && sample.range_km < 20_000.0);
    }

    #[test]
    fn consecutive_samples_move_smoothly() {
        let oracle = iss_oracle();
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();

        let a = oracle.evaluate(start).unwrap();
        let b = oracle.evaluate(start + chrono::Duration::seconds(1)).unwrap();

        // ~7.7 km/s orbital velocity bounds the per-second range change.
        assert!((a.range_km - b.range_km).abs() < 10.0);
        assert!((a.elevation_deg - b.elevation_deg).abs() < 1.0);
    }

    #[test]
    fn enu_axes_match_cardinal_directions() {
        // Looking straight up from the equator/prime meridian: +x is up.
        let (east, north, up) = ecef_to_enu([1.0, 0.0, 0.0], 0.0, 0.0);
        assert!((east - 0.0).abs() < 1e-12);
        assert!((north - 0.0).abs() < 1e-12);
        assert!((up - 1.0).abs() < 1e-12);

        // +z is north there.
        let (east, north, up) = ecef_to_enu([0.0, 0.0, 1.0], 0.0, 0.0);
        assert!((east - 0.0).abs() < 1e-12);
        assert!((north - 1.0).abs() < 1e-12);
        assert!((up - 0.0).abs() < 1e-12);
    }
}
