use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::propagation::Propagator;
use crate::predict::site::Site;
use crate::predict::types::{EventKind, EventSearch, HorizonEvent};

/// Find all rise, culmination and set events within a time range.
///
/// Elevation is sampled every `coarse_step`; threshold crossings are then
/// refined by bisection and culminations by ternary search down to
/// `fine_step` (at least a millisecond). A pass already in progress at
/// `start` has no rise event and one still in progress at `end` has no set
/// event. A pass short enough to fit between two samples still yields all
/// three events.
pub fn find_events<P: Propagator + ?Sized>(
    propagator: &P,
    site: &Site,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    search: &EventSearch,
) -> Result<Vec<HorizonEvent>, PredictError> {
    let mut events = Vec::new();
    if end <= start {
        return Ok(events);
    }

    let search = &EventSearch {
        coarse_step: search.coarse_step.max(Duration::seconds(1)),
        fine_step: search.fine_step.max(Duration::milliseconds(1)),
        ..*search
    };
    let coarse_step = search.coarse_step;
    let threshold = search.min_elevation_deg;
    let elevation = |t: DateTime<Utc>| -> Result<f64, PredictError> {
        Ok(propagator.observe(site, t)?.elevation_deg)
    };

    let mut times = Vec::new();
    let mut cursor = start;
    while cursor < end {
        times.push(cursor);
        cursor += coarse_step;
    }
    times.push(end);

    let elevations = times
        .iter()
        .map(|t| elevation(*t))
        .collect::<Result<Vec<_>, _>>()?;

    for i in 1..times.len() {
        let above_before = elevations[i - 1] >= threshold;
        let above_now = elevations[i] >= threshold;

        if !above_before && above_now {
            let t = refine_crossing(&elevation, times[i - 1], times[i], true, search)?;
            events.push(HorizonEvent::new(EventKind::Rise, t));
        } else if above_before && !above_now {
            let t = refine_crossing(&elevation, times[i - 1], times[i], false, search)?;
            events.push(HorizonEvent::new(EventKind::Set, t));
        }

        // Interior local maximum: the culmination lies between the neighbours.
        if i + 1 < times.len()
            && elevations[i] > elevations[i - 1]
            && elevations[i] >= elevations[i + 1]
        {
            let (t, max_el) = refine_culmination(&elevation, times[i - 1], times[i + 1], search)?;
            if max_el >= threshold {
                // Above the threshold only between samples: no crossing seen yet.
                let unseen = elevations[i - 1] < threshold
                    && elevations[i] < threshold
                    && elevations[i + 1] < threshold;
                if unseen {
                    let rise = refine_crossing(&elevation, times[i - 1], t, true, search)?;
                    let set = refine_crossing(&elevation, t, times[i + 1], false, search)?;
                    events.push(HorizonEvent::new(EventKind::Rise, rise));
                    events.push(HorizonEvent::new(EventKind::Culminate, t));
                    events.push(HorizonEvent::new(EventKind::Set, set));
                } else {
                    events.push(HorizonEvent::new(EventKind::Culminate, t));
                }
            }
        }
    }

    events.sort_by_key(|e| e.time);
    log::debug!(
        "found {} horizon events between {} and {}",
        events.len(),
        start,
        end
    );
    Ok(events)
}

/// Binary search for the threshold crossing time.
fn refine_crossing<F>(
    elevation: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
    search: &EventSearch,
) -> Result<DateTime<Utc>, PredictError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let mut low = before;
    let mut high = after;

    while high - low > search.fine_step {
        let mid = low + (high - low) / 2;
        let above = elevation(mid)? >= search.min_elevation_deg;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(if rising { high } else { low })
}

/// Ternary search for the time of maximum elevation.
fn refine_culmination<F>(
    elevation: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    search: &EventSearch,
) -> Result<(DateTime<Utc>, f64), PredictError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let mut low = before;
    let mut high = after;

    while high - low > search.fine_step {
        let third = (high - low) / 3;
        if third <= Duration::zero() {
            break;
        }
        let m1 = low + third;
        let m2 = high - third;
        if elevation(m1)? < elevation(m2)? {
            low = m1;
        } else {
            high = m2;
        }
    }

    let mid = low + (high - low) / 2;
    Ok((mid, elevation(mid)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::types::{Observation, Subpoint};
    use chrono::TimeZone;

    /// Elevation follows a triangle wave: one symmetric pass every period.
    struct TriangleSky {
        epoch: DateTime<Utc>,
        period_s: f64,
        peak_deg: f64,
    }

    impl TriangleSky {
        fn elevation(&self, t: DateTime<Utc>) -> f64 {
            let s = (t - self.epoch).num_milliseconds() as f64 / 1000.0;
            let phase = s.rem_euclid(self.period_s) / self.period_s;
            // -peak at phase 0, +peak at phase 0.5
            self.peak_deg * (1.0 - 4.0 * (phase - 0.5).abs())
        }
    }

    impl Propagator for TriangleSky {
        fn observe(&self, _site: &Site, time: DateTime<Utc>) -> Result<Observation, PredictError> {
            Ok(Observation {
                time,
                range_m: 1.0e6,
                azimuth_deg: 0.0,
                elevation_deg: self.elevation(time),
                subpoint: self.subpoint(time)?,
            })
        }

        fn subpoint(&self, _time: DateTime<Utc>) -> Result<Subpoint, PredictError> {
            Ok(Subpoint {
                latitude_rad: 0.0,
                longitude_rad: 0.0,
                altitude_m: 500_000.0,
            })
        }
    }

    fn sky() -> TriangleSky {
        TriangleSky {
            epoch: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            period_s: 6000.0,
            peak_deg: 45.0,
        }
    }

    fn kinds(events: &[HorizonEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn full_passes_come_in_triples() {
        let sky = sky();
        let start = sky.epoch;
        let end = start + Duration::seconds(12_000);
        let events = find_events(&sky, &Site::default(), start, end, &EventSearch::default()).unwrap();
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::Rise,
                EventKind::Culminate,
                EventKind::Set,
                EventKind::Rise,
                EventKind::Culminate,
                EventKind::Set,
            ]
        );
        // Peak at phase 0.5 of the first period.
        let culmination = events[1].time;
        assert!((culmination - (start + Duration::seconds(3000))).num_seconds().abs() <= 2);
        // Elevation 5 deg at phase 0.25 + 5/180.
        let rise = events[0].time;
        let expected_rise = 6000.0 * (0.25 + 5.0 / 180.0);
        let got = (rise - start).num_milliseconds() as f64 / 1000.0;
        assert!((got - expected_rise).abs() <= 1.5, "rise at {got}, expected {expected_rise}");
    }

    #[test]
    fn window_starting_mid_pass_has_no_rise() {
        let sky = sky();
        let start = sky.epoch + Duration::seconds(2500);
        let end = start + Duration::seconds(3000);
        let events = find_events(&sky, &Site::default(), start, end, &EventSearch::default()).unwrap();
        assert_eq!(kinds(&events), vec![EventKind::Culminate, EventKind::Set]);
    }

    #[test]
    fn empty_window_has_no_events() {
        let sky = sky();
        let events =
            find_events(&sky, &Site::default(), sky.epoch, sky.epoch, &EventSearch::default()).unwrap();
        assert!(events.is_empty());
    }

    /// A low pass above the threshold only during [98, 102] s, peaking at
    /// 6 deg at 100 s, optionally followed by a long pass centred on 2000 s.
    struct GrazingSky {
        epoch: DateTime<Utc>,
        with_long_pass: bool,
    }

    impl Propagator for GrazingSky {
        fn observe(&self, _site: &Site, time: DateTime<Utc>) -> Result<Observation, PredictError> {
            let s = (time - self.epoch).num_milliseconds() as f64 / 1000.0;
            let mut elevation_deg = 6.0 - 0.5 * (s - 100.0).abs();
            if self.with_long_pass {
                elevation_deg = elevation_deg.max(40.0 - 0.1 * (s - 2000.0).abs());
            }
            Ok(Observation {
                time,
                range_m: 1.0e6,
                azimuth_deg: 0.0,
                elevation_deg,
                subpoint: self.subpoint(time)?,
            })
        }

        fn subpoint(&self, _time: DateTime<Utc>) -> Result<Subpoint, PredictError> {
            Ok(Subpoint {
                latitude_rad: 0.0,
                longitude_rad: 0.0,
                altitude_m: 500_000.0,
            })
        }
    }

    fn seconds(sky_epoch: DateTime<Utc>, event: &HorizonEvent) -> f64 {
        (event.time - sky_epoch).num_milliseconds() as f64 / 1000.0
    }

    #[test]
    fn pass_between_samples_gets_rise_and_set() {
        let sky = GrazingSky {
            epoch: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            with_long_pass: false,
        };
        let end = sky.epoch + Duration::seconds(600);
        let events =
            find_events(&sky, &Site::default(), sky.epoch, end, &EventSearch::default()).unwrap();
        assert_eq!(
            kinds(&events),
            vec![EventKind::Rise, EventKind::Culminate, EventKind::Set]
        );
        assert!((seconds(sky.epoch, &events[0]) - 98.0).abs() <= 1.5);
        assert!((seconds(sky.epoch, &events[1]) - 100.0).abs() <= 1.5);
        assert!((seconds(sky.epoch, &events[2]) - 102.0).abs() <= 1.5);
    }

    #[test]
    fn short_pass_before_long_pass_forms_two_contacts() {
        let sky = GrazingSky {
            epoch: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            with_long_pass: true,
        };
        let end = sky.epoch + Duration::seconds(3600);
        let events =
            find_events(&sky, &Site::default(), sky.epoch, end, &EventSearch::default()).unwrap();
        assert_eq!(events.len(), 6);
        let passes = crate::contact::partition_events(&events, sky.epoch, end).unwrap();
        assert_eq!(passes.len(), 2);
        assert!(passes[0][2] - passes[0][0] < Duration::seconds(10));
    }

    #[test]
    fn zero_fine_step_still_terminates() {
        let sky = sky();
        let start = sky.epoch;
        let end = start + Duration::seconds(6000);
        let search = EventSearch {
            fine_step: Duration::zero(),
            ..EventSearch::default()
        };
        let events = find_events(&sky, &Site::default(), start, end, &search).unwrap();
        assert_eq!(
            kinds(&events),
            vec![EventKind::Rise, EventKind::Culminate, EventKind::Set]
        );
    }

    #[test]
    fn window_below_horizon_has_no_events() {
        let sky = sky();
        let start = sky.epoch;
        let end = start + Duration::seconds(1200);
        let events = find_events(&sky, &Site::default(), start, end, &EventSearch::default()).unwrap();
        assert!(events.is_empty());
    }
}
