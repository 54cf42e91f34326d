use serde::Serialize;

/// WGS-84 semi-major axis in km.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 first eccentricity squared.
pub const WGS84_E2: f64 = 0.00669437999014;

/// Geodetic position of an antenna on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl Site {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equator_prime_meridian_sits_on_x_axis() {
        let p = Site::default().position_ecef_km();
        assert_relative_eq!(p[0], WGS84_A_KM);
        assert_relative_eq!(p[1], 0.0);
        assert_relative_eq!(p[2], 0.0);
    }

    #[test]
    fn pole_uses_polar_radius() {
        let p = Site::new(90.0, 0.0, 0.0).position_ecef_km();
        // WGS-84 semi-minor axis
        assert_relative_eq!(p[2], 6356.752, epsilon = 1e-3);
    }
}
