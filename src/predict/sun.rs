//! Low-precision solar position for the observation overlay.
//!
//! Truncated Meeus-style series, good to a fraction of a degree — enough to
//! warn an optical observer that a pass runs close to the sun, not enough
//! for ephemeris work.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::horizon::LookAngleSample;
use crate::predict::observer::Observer;

/// Angular window around the sun that counts as a conjunction.
const CONJUNCTION_AZIMUTH_DEG: f64 = 5.0;
const CONJUNCTION_ELEVATION_DEG: f64 = 3.0;

/// Solar look angles for the observer, present only while the sun is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SunPosition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// Apparent solar azimuth/elevation at `time`. `None` once the sun is at or
/// below the horizon, which is all the overlay needs.
pub fn sun_position(observer: &Observer, time: DateTime<Utc>) -> Option<SunPosition> {
    let t = sgp4::julian_years_since_j2000(&time.naive_utc()) / 100.0;

    let mean_lon = normalize_deg(280.46646 + t * (36000.76983 + 0.0003032 * t));
    let mean_anomaly = (357.52911 + t * (35999.05029 - 0.0001537 * t)).to_radians();
    let eq_center = mean_anomaly.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * mean_anomaly).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * mean_anomaly).sin() * 0.000289;
    let true_lon = normalize_deg(mean_lon + eq_center).to_radians();

    let omega = (125.04 - 1934.136 * t).to_radians();
    let mean_obliquity = (23.0
        + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0)
        .to_radians();
    let obliquity = mean_obliquity + 0.00256_f64.to_radians() * omega.cos();
    let apparent_lon = (true_lon - 0.00569_f64.to_radians() - 0.00478_f64.to_radians() * omega.sin())
        .rem_euclid(std::f64::consts::TAU);

    let declination = (obliquity.sin() * apparent_lon.sin()).asin();
    let right_ascension = (obliquity.cos() * apparent_lon.sin()).atan2(apparent_lon.cos());

    let gmst = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()));
    let hour_angle = wrap_pi(gmst + observer.lon_rad() - right_ascension);

    let lat = observer.lat_rad();
    let sin_elevation =
        lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    let elevation_deg = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();
    if elevation_deg <= 0.0 {
        return None;
    }

    let azimuth = (-hour_angle.sin())
        .atan2(declination.tan() * lat.cos() - lat.sin() * hour_angle.cos());

    Some(SunPosition {
        azimuth_deg: azimuth.to_degrees().rem_euclid(360.0),
        elevation_deg,
    })
}

/// Sun positions matched to the sample times of a pass track. Instants where
/// the sun is down are simply omitted.
pub fn sun_track(observer: &Observer, track: &[LookAngleSample]) -> Vec<SunPosition> {
    track
        .iter()
        .filter_map(|point| sun_position(observer, point.time))
        .collect()
}

/// True when any track point comes close enough to any sun position to
/// matter for an optical observer.
pub fn sun_conjunction(track: &[LookAngleSample], sun: &[SunPosition]) -> bool {
    track.iter().any(|point| {
        sun.iter().any(|sun_point| {
            let az_diff = (point.azimuth_deg - sun_point.azimuth_deg).abs();
            let az_diff = az_diff.min(360.0 - az_diff);
            az_diff <= CONJUNCTION_AZIMUTH_DEG
                && (point.elevation_deg - sun_point.elevation_deg).abs()
                    <= CONJUNCTION_ELEVATION_DEG
        })
    })
}

fn normalize_deg(value: f64) -> f64 {
    value.rem_euclid(360.0)
}

fn wrap_pi(value: f64) -> f64 {
    (value + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(time: DateTime<Utc>, azimuth_deg: f64, elevation_deg: f64) -> LookAngleSample {
        LookAngleSample {
            time,
            azimuth_deg,
            elevation_deg,
            range_km: 1000.0,
        }
    }

    #[test]
    fn equinox_morning_sun_stands_east() {
        let observer = Observer::new(0.0, 0.0, 0.0);
        let morning = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();

        let sun = sun_position(&observer, morning).unwrap();

        assert!((80.0..100.0).contains(&sun.azimuth_deg), "az {}", sun.azimuth_deg);
        assert!((30.0..60.0).contains(&sun.elevation_deg), "el {}", sun.elevation_deg);
    }

    #[test]
    fn night_side_has_no_sun() {
        let observer = Observer::new(0.0, 0.0, 0.0);
        let midnight = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();

        assert!(sun_position(&observer, midnight).is_none());
    }

    #[test]
    fn conjunction_requires_both_axes_close() {
        let time = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let sun = vec![SunPosition {
            azimuth_deg: 90.0,
            elevation_deg: 40.0,
        }];

        assert!(sun_conjunction(&[sample(time, 93.0, 41.0)], &sun));
        assert!(!sun_conjunction(&[sample(time, 99.0, 40.0)], &sun));
        assert!(!sun_conjunction(&[sample(time, 90.0, 48.0)], &sun));
    }

    #[test]
    fn conjunction_wraps_across_north() {
        let time = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let sun = vec![SunPosition {
            azimuth_deg: 359.0,
            elevation_deg: 20.0,
        }];

        assert!(sun_conjunction(&[sample(time, 2.0, 20.0)], &sun));
    }

    #[test]
    fn sun_track_skips_night_samples() {
        let observer = Observer::new(0.0, 0.0, 0.0);
        let day = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let track = vec![sample(day, 100.0, 10.0), sample(night, 200.0, 10.0)];

        assert_eq!(sun_track(&observer, &track).len(), 1);
    }
}
