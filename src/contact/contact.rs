use std::fmt;

use chrono::{DateTime, Utc};

use crate::contact::error::ContactError;
use crate::contact::types::{AntennaId, DataVolume, Link, RelativePosition, Transmitter};
use crate::link_budget::data_rate_for_bands;
use crate::units::data_with_unit;

const SIMPLE_TIME_FORMAT: &str = "%H:%M";

/// Uninterrupted line of sight between one antenna and the satellite.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    antenna: AntennaId,
    positions: Vec<RelativePosition>,
    volume: DataVolume,
}

impl Contact {
    pub fn new(antenna: AntennaId, positions: Vec<RelativePosition>) -> Self {
        Self {
            antenna,
            positions,
            volume: DataVolume::NotComputed,
        }
    }

    pub fn antenna(&self) -> AntennaId {
        self.antenna
    }

    pub fn relative_positions(&self) -> &[RelativePosition] {
        &self.positions
    }

    pub fn time_of_position(&self, index: usize) -> Result<DateTime<Utc>, ContactError> {
        self.positions
            .get(index)
            .map(|p| p.time)
            .ok_or(ContactError::NoRelativePositions)
    }

    pub fn start_time(&self) -> Result<DateTime<Utc>, ContactError> {
        self.time_of_position(0)
    }

    pub fn end_time(&self) -> Result<DateTime<Utc>, ContactError> {
        self.positions
            .last()
            .map(|p| p.time)
            .ok_or(ContactError::NoRelativePositions)
    }

    pub fn volume(&self) -> &DataVolume {
        &self.volume
    }

    /// Transmittable bits. Fails until [`Contact::determine_max_data`] ran.
    pub fn data(&self) -> Result<f64, ContactError> {
        match &self.volume {
            DataVolume::Computed { bits, .. } => Ok(*bits),
            DataVolume::NotComputed => Err(ContactError::DataNotComputed),
        }
    }

    pub fn best_link(&self) -> Option<&Link> {
        match &self.volume {
            DataVolume::Computed { link, .. } => link.as_ref(),
            DataVolume::NotComputed => None,
        }
    }

    /// Picks the downlink that moves the most data during this contact.
    ///
    /// Links outside the transmitter band are skipped. On a tie the first
    /// link wins. Without any usable link the volume is zero.
    pub fn determine_max_data(
        &mut self,
        transmitter: &Transmitter,
        gain_to_noise_temperature: f64,
        links: &[Link],
    ) {
        let mut best_link: Option<&Link> = None;
        let mut max_data = 0.0;

        for link in links.iter().filter(|l| l.downlink) {
            let compatible = link.band.min_hz < transmitter.band.max_hz
                && link.band.max_hz > transmitter.band.min_hz;
            if !compatible {
                continue;
            }
            let rates = self.data_rates_for_link(transmitter, gain_to_noise_temperature, link);
            let data = self.integrate(&rates);
            if data > max_data {
                max_data = data;
                best_link = Some(link);
            }
        }

        if let Some(link) = best_link {
            let rates = self.data_rates_for_link(transmitter, gain_to_noise_temperature, link);
            for (position, rate) in self.positions.iter_mut().zip(rates) {
                position.data_rate_bps = Some(rate);
            }
        }

        self.volume = DataVolume::Computed {
            bits: max_data,
            link: best_link.cloned(),
        };
    }

    fn data_rates_for_link(
        &self,
        transmitter: &Transmitter,
        gain_to_noise_temperature: f64,
        link: &Link,
    ) -> Vec<u64> {
        self.positions
            .iter()
            .map(|p| {
                data_rate_for_bands(
                    transmitter.eirp_dbw,
                    gain_to_noise_temperature,
                    p.distance_m,
                    &transmitter.band,
                    &link.band,
                )
            })
            .collect()
    }

    /// Midpoint rule: each sample's rate holds from the midpoint with its
    /// predecessor to the midpoint with its successor. The first and last
    /// sample use the contact boundary as their outer edge.
    fn integrate(&self, rates: &[u64]) -> f64 {
        let Some(first) = self.positions.first() else {
            return 0.0;
        };
        let offsets: Vec<f64> = self
            .positions
            .iter()
            .map(|p| seconds_between(first.time, p.time))
            .collect();
        let last = offsets.len() - 1;

        rates
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                let from = if i == 0 {
                    offsets[i]
                } else {
                    (offsets[i - 1] + offsets[i]) / 2.0
                };
                let to = if i == last {
                    offsets[i]
                } else {
                    (offsets[i] + offsets[i + 1]) / 2.0
                };
                *rate as f64 * (to - from)
            })
            .sum()
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Ok(start), Ok(end)) = (self.start_time(), self.end_time()) else {
            return write!(f, "empty contact");
        };
        let data = match self.data() {
            Ok(bits) => data_with_unit(bits),
            Err(_) => "not computed".to_string(),
        };
        write!(
            f,
            "{} to {}: {}",
            start.format(SIMPLE_TIME_FORMAT),
            end.format(SIMPLE_TIME_FORMAT),
            data
        )
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}
