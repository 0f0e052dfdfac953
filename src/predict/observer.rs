/// Geodetic location of the ground observer.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Parse a `"lat, lon"` string in decimal degrees. Rejects coordinates
    /// outside the ±90°/±180° ranges.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() < 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self::new(lat, lon, altitude_m.unwrap_or(0.0)))
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// WGS-84 geodetic position in the Earth-fixed frame, kilometers.
    pub fn position_ecef_km(&self) -> [f64; 3] {
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_pair() {
        let observer = Observer::from_coordinates("35.6812, 139.7671", Some(40.0)).unwrap();
        assert_eq!(observer.latitude_deg, 35.6812);
        assert_eq!(observer.longitude_deg, 139.7671);
        assert_eq!(observer.altitude_m, 40.0);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Observer::from_coordinates("91.0, 0.0", None).is_none());
        assert!(Observer::from_coordinates("0.0, 181.0", None).is_none());
        assert!(Observer::from_coordinates("garbage", None).is_none());
    }

    #[test]
    fn equatorial_position_is_on_the_ellipsoid() {
        let observer = Observer::new(0.0, 0.0, 0.0);
        let [x, y, z] = observer.position_ecef_km();
        assert!((x - 6378.137).abs() < 1e-6);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }

    #[test]
    fn polar_position_uses_the_minor_axis() {
        let observer = Observer::new(90.0, 0.0, 0.0);
        let [x, _, z] = observer.position_ecef_km();
        assert!(x.abs() < 1e-6);
        assert!((z - 6356.752).abs() < 1e-2);
    }
}
