//! Contacts between antennas and the satellite, and the data each can move.

mod builder;
mod contact;
mod error;
mod group;
mod sequence;
mod types;

pub use builder::{partition_events, ContactBuilder};
pub use contact::Contact;
pub(crate) use contact::seconds_between;
pub use error::ContactError;
pub use group::{contact_groups, ContactGroup, ContactInterval, ContactSet};
pub use sequence::ContactSequence;
pub use types::{AntennaId, DataVolume, Link, RelativePosition, Transmitter};

#[cfg(test)]
pub(crate) use contact::tests as test_support;
