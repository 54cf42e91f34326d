use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::GroundTrackConfig;
use crate::predict::{PredictError, Propagator};

/// Sub-satellite point for drawing the orbit on a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub time: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Sub-satellite points across the window, `steps_per_orbit` per orbit.
/// Empty for windows longer than `max_window`.
pub fn ground_track<P: Propagator + ?Sized>(
    propagator: &P,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    orbit_duration_s: f64,
    config: &GroundTrackConfig,
) -> Result<Vec<TrackPoint>, PredictError> {
    if end - start > config.max_window {
        log::info!(
            "window longer than {}, skipping ground track",
            humantime::format_duration(config.max_window.to_std().unwrap_or_default())
        );
        return Ok(Vec::new());
    }
    if config.steps_per_orbit == 0 || orbit_duration_s <= 0.0 {
        return Ok(Vec::new());
    }

    let step_ms = (orbit_duration_s * 1000.0 / config.steps_per_orbit as f64).round() as i64;
    if step_ms <= 0 {
        return Ok(Vec::new());
    }
    let step = Duration::milliseconds(step_ms);

    let mut points = Vec::new();
    let mut time = start;
    while time < end {
        let subpoint = propagator.subpoint(time)?;
        points.push(TrackPoint {
            time,
            latitude_deg: subpoint.latitude_rad.to_degrees(),
            longitude_deg: subpoint.longitude_rad.to_degrees(),
            altitude_m: subpoint.altitude_m,
        });
        time += step;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{Observation, Site, Subpoint};
    use chrono::TimeZone;

    struct Equator;

    impl Propagator for Equator {
        fn observe(&self, _site: &Site, _time: DateTime<Utc>) -> Result<Observation, PredictError> {
            Err(PredictError::Propagation("not needed".to_string()))
        }

        fn subpoint(&self, time: DateTime<Utc>) -> Result<Subpoint, PredictError> {
            Ok(Subpoint {
                latitude_rad: 0.0,
                longitude_rad: (time.timestamp() % 360) as f64,
                altitude_m: 400_000.0,
            })
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn samples_each_orbit() {
        let config = GroundTrackConfig::default();
        let track = ground_track(&Equator, start(), start() + Duration::seconds(12_000), 6000.0, &config)
            .unwrap();
        assert_eq!(track.len(), 200);
        assert_eq!(track[1].time - track[0].time, Duration::seconds(60));
        assert_eq!(track[0].altitude_m, 400_000.0);
    }

    #[test]
    fn long_windows_have_no_track() {
        let config = GroundTrackConfig {
            max_window: Duration::days(1),
            steps_per_orbit: 100,
        };
        let track = ground_track(&Equator, start(), start() + Duration::days(2), 6000.0, &config).unwrap();
        assert!(track.is_empty());
    }
}
