use chrono::{DateTime, Utc};

use crate::contact::contact::Contact;
use crate::contact::error::ContactError;
use crate::contact::sequence::ContactSequence;
use crate::contact::types::{AntennaId, RelativePosition};
use crate::predict::{EventKind, EventSearch, HorizonEvent, Propagator, Site};

/// Sample times of every contact in a window, derived from its horizon
/// events.
///
/// Full passes contribute their rise, culmination and set. A pass already
/// running at `start` begins at `start` and a pass still running at `end`
/// stops at `end`.
pub fn partition_events(
    events: &[HorizonEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Vec<DateTime<Utc>>>, ContactError> {
    let mut contacts = Vec::new();
    let Some(first) = events.first() else {
        return Ok(contacts);
    };

    let mut from = 0;
    if first.kind != EventKind::Rise {
        let mut times = vec![start];
        if events[from].kind == EventKind::Culminate {
            times.push(events[from].time);
            from += 1;
        }
        match events.get(from) {
            Some(event) if event.kind == EventKind::Set => {
                times.push(event.time);
                from += 1;
            }
            None => times.push(end),
            Some(event) => {
                return Err(ContactError::MalformedEvents(format!(
                    "{} at {} inside a pass in progress at window start",
                    event.kind, event.time
                )))
            }
        }
        contacts.push(times);
    }

    let mut to = events.len();
    let mut trailing = None;
    if to > from && events[to - 1].kind != EventKind::Set {
        if events[to - 1].kind == EventKind::Culminate {
            to -= 1;
        }
        match to.checked_sub(1).map(|i| &events[i]) {
            Some(event) if to > from && event.kind == EventKind::Rise => to -= 1,
            _ => {
                return Err(ContactError::MalformedEvents(
                    "pass in progress at window end has no rise".to_string(),
                ))
            }
        }
        let mut times: Vec<_> = events[to..].iter().map(|e| e.time).collect();
        times.push(end);
        trailing = Some(times);
    }

    let full = &events[from..to];
    if full.len() % 3 != 0 {
        return Err(ContactError::MalformedEvents(format!(
            "{} events left for full passes",
            full.len()
        )));
    }
    for pass in full.chunks(3) {
        let kinds = [pass[0].kind, pass[1].kind, pass[2].kind];
        if kinds != [EventKind::Rise, EventKind::Culminate, EventKind::Set] {
            return Err(ContactError::MalformedEvents(format!(
                "pass starting {} is {}, {}, {}",
                pass[0].time, kinds[0], kinds[1], kinds[2]
            )));
        }
        contacts.push(pass.iter().map(|e| e.time).collect());
    }

    contacts.extend(trailing);
    Ok(contacts)
}

/// Builds the contacts of antennas with a satellite.
pub struct ContactBuilder<'a, P: Propagator + ?Sized> {
    propagator: &'a P,
    search: EventSearch,
}

impl<'a, P: Propagator + ?Sized> ContactBuilder<'a, P> {
    pub fn new(propagator: &'a P, search: EventSearch) -> Self {
        Self { propagator, search }
    }

    /// Contacts between `site` and the satellite within `[start, end]`.
    pub fn build(
        &self,
        antenna: AntennaId,
        site: &Site,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ContactSequence, ContactError> {
        let events = self.propagator.find_events(site, start, end, &self.search)?;
        let mut passes = partition_events(&events, start, end)?;

        // No events at all: either never visible or visible throughout.
        if passes.is_empty() && start < end && self.is_visible(site, start)? {
            passes.push(vec![start, end]);
        }

        let mut sequence = ContactSequence::new();
        for times in passes {
            let positions = times
                .into_iter()
                .map(|t| Ok(RelativePosition::from(self.propagator.observe(site, t)?)))
                .collect::<Result<Vec<_>, ContactError>>()?;
            sequence.push(Contact::new(antenna, positions))?;
        }
        log::debug!(
            "antenna {}: {} events, {} contacts",
            antenna,
            events.len(),
            sequence.len()
        );
        Ok(sequence)
    }

    fn is_visible(&self, site: &Site, time: DateTime<Utc>) -> Result<bool, ContactError> {
        let observation = self.propagator.observe(site, time)?;
        Ok(observation.elevation_deg >= self.search.min_elevation_deg)
    }
}
