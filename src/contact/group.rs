use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contact::contact::Contact;
use crate::contact::error::ContactError;
use crate::contact::sequence::ContactSequence;
use crate::scheduler::{overlap_groups, Span};

/// Contacts of several antennas pooled for scheduling. Unlike a
/// [`ContactSequence`] the members may overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSet {
    contacts: Vec<Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn extend(&mut self, sequence: ContactSequence) {
        self.contacts.extend(sequence.into_contacts());
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn start_time(&self) -> Result<Option<DateTime<Utc>>, ContactError> {
        let mut earliest = None;
        for contact in &self.contacts {
            let start = contact.start_time()?;
            if earliest.map_or(true, |e| start < e) {
                earliest = Some(start);
            }
        }
        Ok(earliest)
    }

    pub fn end_time(&self) -> Result<Option<DateTime<Utc>>, ContactError> {
        let mut latest = None;
        for contact in &self.contacts {
            let end = contact.end_time()?;
            if latest.map_or(true, |l| end > l) {
                latest = Some(end);
            }
        }
        Ok(latest)
    }

    /// Maximal runs of overlapping contacts, annotated with the parts that
    /// are covered by contacts for which `is_optimal` holds.
    pub fn groups<F>(&self, is_optimal: F) -> Result<Vec<ContactGroup>, ContactError>
    where
        F: Fn(usize) -> bool,
    {
        contact_groups(&self.contacts, is_optimal)
    }
}

impl FromIterator<Contact> for ContactSet {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
        }
    }
}

/// Part of a contact group, either covered by the schedule or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub optimal: bool,
}

/// Maximal run of overlapping contacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactGroup {
    /// Indices into the contacts the groups were built from, by start time.
    pub members: Vec<usize>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Gapless partition of `[start, end]`.
    pub intervals: Vec<ContactInterval>,
}

impl ContactGroup {
    pub fn optimal_intervals(&self) -> impl Iterator<Item = &ContactInterval> {
        self.intervals.iter().filter(|i| i.optimal)
    }
}

pub fn contact_groups<F>(contacts: &[Contact], is_optimal: F) -> Result<Vec<ContactGroup>, ContactError>
where
    F: Fn(usize) -> bool,
{
    let spans = contacts
        .iter()
        .map(|c| Ok(Span::new(c.start_time()?, c.end_time()?, 0.0)))
        .collect::<Result<Vec<_>, ContactError>>()?;

    let groups = overlap_groups(&spans)
        .into_iter()
        .filter_map(|members| {
            let start = members.iter().map(|&i| spans[i].start).min()?;
            let end = members.iter().map(|&i| spans[i].end).max()?;
            let covered = merge_covered(
                members
                    .iter()
                    .filter(|&&i| is_optimal(i))
                    .map(|&i| (spans[i].start, spans[i].end)),
            );
            Some(ContactGroup {
                intervals: partition(start, end, &covered),
                members,
                start,
                end,
            })
        })
        .collect();
    Ok(groups)
}

/// Union of intervals, sorted.
fn merge_covered<I>(intervals: I) -> Vec<(DateTime<Utc>, DateTime<Utc>)>
where
    I: Iterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
{
    let mut sorted: Vec<_> = intervals.collect();
    sorted.sort();

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => {
                if end > last.1 {
                    last.1 = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn partition(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    covered: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<ContactInterval> {
    let mut intervals = Vec::new();
    let mut cursor = start;
    for &(from, to) in covered {
        if from > cursor {
            intervals.push(ContactInterval {
                start: cursor,
                end: from,
                optimal: false,
            });
        }
        intervals.push(ContactInterval {
            start: from,
            end: to,
            optimal: true,
        });
        cursor = to;
    }
    if cursor < end || intervals.is_empty() {
        intervals.push(ContactInterval {
            start: cursor,
            end,
            optimal: false,
        });
    }
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::contact::tests::{contact_with_data, epoch};
    use chrono::Duration;

    fn at(seconds: i64) -> DateTime<Utc> {
        epoch() + Duration::seconds(seconds)
    }

    fn pool() -> ContactSet {
        [
            contact_with_data(1, 0, 100, 1.0),
            contact_with_data(2, 80, 200, 1.0),
            contact_with_data(1, 150, 300, 1.0),
            contact_with_data(2, 500, 600, 1.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn pool_bounds_span_all_contacts() {
        let set = pool();
        assert_eq!(set.start_time().unwrap(), Some(at(0)));
        assert_eq!(set.end_time().unwrap(), Some(at(600)));
        assert_eq!(ContactSet::new().start_time().unwrap(), None);
    }

    #[test]
    fn groups_without_schedule_are_one_plain_interval() {
        let groups = pool().groups(|_| false).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![0, 1, 2]);
        assert_eq!(
            groups[0].intervals,
            vec![ContactInterval {
                start: at(0),
                end: at(300),
                optimal: false
            }]
        );
        assert_eq!(groups[1].members, vec![3]);
    }

    #[test]
    fn optimal_contacts_split_group_into_intervals() {
        let groups = pool().groups(|i| i == 1 || i == 3).unwrap();

        let first: Vec<_> = groups[0]
            .intervals
            .iter()
            .map(|i| (i.start, i.end, i.optimal))
            .collect();
        assert_eq!(
            first,
            vec![
                (at(0), at(80), false),
                (at(80), at(200), true),
                (at(200), at(300), false),
            ]
        );
        assert_eq!(groups[1].optimal_intervals().count(), 1);
        assert_eq!(groups[1].intervals.len(), 1);
    }

    #[test]
    fn overlapping_optimal_contacts_are_merged() {
        let groups = pool().groups(|i| i < 3).unwrap();
        assert_eq!(
            groups[0].intervals,
            vec![ContactInterval {
                start: at(0),
                end: at(300),
                optimal: true
            }]
        );
    }

    #[test]
    fn empty_contact_cannot_be_grouped() {
        let mut set = pool();
        set.push(Contact::new(3, Vec::new()));
        assert!(matches!(
            set.groups(|_| false),
            Err(ContactError::NoRelativePositions)
        ));
    }
}
