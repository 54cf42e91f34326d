use chrono::{DateTime, Utc};

use crate::contact::{Contact, ContactError, ContactSequence};
use crate::scheduler::groups::{overlap_groups, Span};

/// Winning subset of a set of spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    indices: Vec<usize>,
    total: f64,
}

impl Selection {
    /// Selected input indices in chronological order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Maximum-weight subset of mutually non-overlapping spans.
///
/// Spans are split into overlap groups which are solved independently and
/// concatenated. Spans without positive weight are never selected, so the
/// result is empty when nothing carries data.
pub fn best_selection(spans: &[Span]) -> Selection {
    let mut selection = Selection::default();
    for group in overlap_groups(spans) {
        let (picked, total) = GroupSolver::new(spans, &group).solve();
        selection.indices.extend(picked);
        selection.total += total;
    }
    selection
}

/// Best choice for the suffix of a group starting at some position.
#[derive(Debug, Clone, Copy)]
struct Decision {
    total: f64,
    take: Option<usize>,
    resume: usize,
}

/// Solves one overlap group. Positions address the group's members in
/// start order.
struct GroupSolver<'a> {
    spans: &'a [Span],
    members: &'a [usize],
    starts: Vec<DateTime<Utc>>,
}

impl<'a> GroupSolver<'a> {
    fn new(spans: &'a [Span], members: &'a [usize]) -> Self {
        let starts = members.iter().map(|&i| spans[i].start).collect();
        Self {
            spans,
            members,
            starts,
        }
    }

    fn span(&self, position: usize) -> &Span {
        &self.spans[self.members[position]]
    }

    /// First position at or after `from` starting strictly after `time`.
    fn next_after(&self, from: usize, time: DateTime<Utc>) -> usize {
        from + self.starts[from..].partition_point(|start| *start <= time)
    }

    /// Solutions of later suffixes are stored before earlier ones need
    /// them: every branch resumes at a position past the current one.
    fn solve(&self) -> (Vec<usize>, f64) {
        let n = self.members.len();
        let mut decisions: Vec<Decision> = vec![
            Decision {
                total: 0.0,
                take: None,
                resume: n,
            };
            n + 1
        ];

        for position in (0..n).rev() {
            decisions[position] = self.decide(position, &decisions);
        }

        let mut picked = Vec::new();
        let mut position = 0;
        while position < n {
            let decision = decisions[position];
            if let Some(taken) = decision.take {
                picked.push(self.members[taken]);
            }
            position = decision.resume;
        }
        (picked, decisions[0].total)
    }

    /// Seed is the earliest-ending span overlapping the first one of the
    /// suffix. Every span starting no later than the seed's end covers that
    /// instant, so at most one of them can be taken.
    fn decide(&self, position: usize, decisions: &[Decision]) -> Decision {
        let first_end = self.span(position).end;
        let overlapping_first = self.next_after(position, first_end);
        let seed_end = (position..overlapping_first)
            .map(|p| self.span(p).end)
            .min()
            .unwrap_or(first_end);
        let cluster_end = self.next_after(position, seed_end);

        // Skipping the whole cluster.
        let mut best = Decision {
            total: decisions[cluster_end].total,
            take: None,
            resume: cluster_end,
        };

        for member in position..cluster_end {
            let span = self.span(member);
            let resume = self.next_after(member + 1, span.end);
            let own = if span.weight > 0.0 { span.weight } else { 0.0 };
            let total = own + decisions[resume].total;
            if total > best.total {
                best = Decision {
                    total,
                    take: (span.weight > 0.0).then_some(member),
                    resume,
                };
            }
        }
        best
    }
}

/// Schedule picked from a pool of contacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub sequence: ContactSequence,
    /// Indices into the pool that was scheduled.
    pub selection: Selection,
}

impl Schedule {
    pub fn data(&self) -> f64 {
        self.selection.total()
    }

    pub fn is_optimal(&self, index: usize) -> bool {
        self.selection.contains(index)
    }
}

/// Maximum-volume chronological sequence of non-overlapping contacts.
///
/// Every contact must carry relative positions and a computed volume.
pub fn best_contact_sequence(contacts: &[Contact]) -> Result<Schedule, ContactError> {
    let spans = contacts
        .iter()
        .map(|c| Ok(Span::new(c.start_time()?, c.end_time()?, c.data()?)))
        .collect::<Result<Vec<_>, ContactError>>()?;

    let selection = best_selection(&spans);
    let mut sequence = ContactSequence::new();
    for &index in selection.indices() {
        sequence.push(contacts[index].clone())?;
    }
    log::debug!(
        "scheduled {} of {} contacts, {} bit",
        selection.len(),
        contacts.len(),
        selection.total()
    );
    Ok(Schedule {
        sequence,
        selection,
    })
}
