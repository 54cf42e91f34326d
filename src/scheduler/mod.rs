//! Maximum-volume selection of non-overlapping contacts.

mod groups;
mod selection;

pub use groups::{chronological_order, overlap_groups, Span};
pub use selection::{best_contact_sequence, best_selection, Schedule, Selection};
