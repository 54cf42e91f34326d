use chrono::{DateTime, Utc};

use crate::contact::contact::Contact;
use crate::contact::error::ContactError;
use crate::contact::types::{Link, Transmitter};

/// Chronological run of contacts where each one starts strictly after the
/// previous one ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSequence {
    contacts: Vec<Contact>,
}

impl ContactSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a contact at the chronological end.
    pub fn push(&mut self, contact: Contact) -> Result<(), ContactError> {
        if let Some(last) = self.contacts.last() {
            let previous_end = last.end_time()?;
            let start = contact.start_time()?;
            if start <= previous_end {
                return Err(ContactError::ChronologicalViolation {
                    previous_end,
                    start,
                });
            }
        }
        self.contacts.push(contact);
        Ok(())
    }

    /// Appends a whole sequence that starts after this one ends.
    pub fn append(&mut self, other: ContactSequence) -> Result<(), ContactError> {
        if let (Some(previous_end), Some(start)) = (self.end_time()?, other.start_time()?) {
            if start <= previous_end {
                return Err(ContactError::ChronologicalViolation {
                    previous_end,
                    start,
                });
            }
        }
        self.contacts.extend(other.contacts);
        Ok(())
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn start_time(&self) -> Result<Option<DateTime<Utc>>, ContactError> {
        self.contacts.first().map(Contact::start_time).transpose()
    }

    pub fn end_time(&self) -> Result<Option<DateTime<Utc>>, ContactError> {
        self.contacts.last().map(Contact::end_time).transpose()
    }

    /// Computes the best link and volume of every contact.
    pub fn determine_data(
        &mut self,
        transmitter: &Transmitter,
        gain_to_noise_temperature: f64,
        links: &[Link],
    ) {
        for contact in &mut self.contacts {
            contact.determine_max_data(transmitter, gain_to_noise_temperature, links);
        }
    }

    /// Sum of all contact volumes.
    pub fn data(&self) -> Result<f64, ContactError> {
        self.contacts.iter().map(Contact::data).sum()
    }
}
