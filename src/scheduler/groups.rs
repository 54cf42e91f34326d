use chrono::{DateTime, Utc};

/// Weighted time interval the scheduler works on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub weight: f64,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, weight: f64) -> Self {
        Self { start, end, weight }
    }

    /// Touching intervals count as overlapping.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Indices of `spans` ordered by start time (stable on ties).
pub fn chronological_order(spans: &[Span]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by_key(|&i| spans[i].start);
    order
}

/// Partitions spans into maximal groups connected through overlaps.
///
/// Groups come back in chronological order, each as span indices sorted by
/// start time. A span starting after the running maximum end time of the
/// current group opens a new group.
pub fn overlap_groups(spans: &[Span]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_end: Option<DateTime<Utc>> = None;

    for i in chronological_order(spans) {
        let span = &spans[i];
        match last_end {
            Some(end) if span.start <= end => {
                current.push(i);
                if span.end > end {
                    last_end = Some(span.end);
                }
            }
            _ => {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                current.push(i);
                last_end = Some(span.end);
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
