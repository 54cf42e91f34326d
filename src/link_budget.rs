//! Downlink budget: how many bits per second a ground antenna can pull from
//! the satellite at a given range.
//!
//! The rate is `floor(sqrt(min(usable_bandwidth, supported_bandwidth)))`.
//! This is a coarse capacity proxy, kept exactly as is so that results stay
//! comparable between runs and tools.

use serde::Serialize;
use std::f64::consts::PI;

pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;
pub const BOLTZMANN_CONSTANT: f64 = 1.380640e-23;
/// Required Eb/N0 in dB.
pub const REQUIRED_EB_N0_DB: f64 = 2.5;
/// Link margin in dB.
pub const REQUIRED_MARGIN_DB: f64 = 3.0;

/// A frequency range in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyBand {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyBand {
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// Overlap of two bands, `None` when they share no spectrum.
    pub fn overlap(&self, other: &FrequencyBand) -> Option<FrequencyBand> {
        let min_hz = self.min_hz.max(other.min_hz);
        let max_hz = self.max_hz.min(other.max_hz);
        if max_hz > min_hz {
            Some(FrequencyBand { min_hz, max_hz })
        } else {
            None
        }
    }

    pub fn width_hz(&self) -> f64 {
        self.max_hz - self.min_hz
    }
}

pub fn from_db(value_db: f64) -> f64 {
    10f64.powf(value_db / 10.0)
}

pub fn to_db(value: f64) -> f64 {
    10.0 * value.log10()
}

/// Free-space path loss as a linear factor.
pub fn free_space_loss(distance_m: f64, frequency_hz: f64) -> f64 {
    (4.0 * PI * distance_m * frequency_hz / SPEED_OF_LIGHT_M_S).powi(2)
}

/// Bandwidth the link budget can support at the given path loss.
pub fn supported_bandwidth(eirp_dbw: f64, gain_to_noise_temperature_db_k: f64, path_loss: f64) -> f64 {
    from_db(REQUIRED_EB_N0_DB + REQUIRED_MARGIN_DB + eirp_dbw + gain_to_noise_temperature_db_k)
        / BOLTZMANN_CONSTANT
        / path_loss
}

/// Achievable bit rate in bit/s.
pub fn max_data_rate(
    eirp_dbw: f64,
    gain_to_noise_temperature_db_k: f64,
    distance_m: f64,
    usable_bandwidth_hz: f64,
    max_frequency_hz: f64,
) -> u64 {
    let path_loss = free_space_loss(distance_m, max_frequency_hz);
    let bandwidth = supported_bandwidth(eirp_dbw, gain_to_noise_temperature_db_k, path_loss);
    usable_bandwidth_hz.min(bandwidth).sqrt().floor() as u64
}

/// Bit rate between a transmitter band and a receiving link band. Zero when
/// the bands do not overlap.
pub fn data_rate_for_bands(
    eirp_dbw: f64,
    gain_to_noise_temperature_db_k: f64,
    distance_m: f64,
    transmitter: &FrequencyBand,
    link: &FrequencyBand,
) -> u64 {
    match transmitter.overlap(link) {
        Some(usable) => max_data_rate(
            eirp_dbw,
            gain_to_noise_temperature_db_k,
            distance_m,
            usable.width_hz(),
            usable.max_hz,
        ),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const X_BAND: FrequencyBand = FrequencyBand {
        min_hz: 8.025e9,
        max_hz: 8.4e9,
    };

    #[test]
    fn db_conversions_invert() {
        assert_relative_eq!(from_db(10.0), 10.0);
        assert_relative_eq!(from_db(3.0), 1.995_262_314_968_879_5, epsilon = 1e-12);
        assert_relative_eq!(to_db(from_db(7.5)), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn path_loss_matches_reference() {
        // 1000 km at 2.2 GHz is roughly 159.3 dB
        let loss = free_space_loss(1.0e6, 2.2e9);
        assert_relative_eq!(to_db(loss), 159.3, epsilon = 0.05);
    }

    #[test]
    fn rate_is_capped_by_usable_bandwidth() {
        // At a very short range the budget supports far more than the band.
        let rate = max_data_rate(20.0, 5.0, 1.0, 1.0e6, 8.4e9);
        assert_eq!(rate, 1000);
    }

    #[test]
    fn rate_follows_formula() {
        let eirp = 20.0;
        let gt = 5.0;
        let distance = 1.5e6;
        let loss = free_space_loss(distance, X_BAND.max_hz);
        let expected = supported_bandwidth(eirp, gt, loss)
            .min(X_BAND.width_hz())
            .sqrt()
            .floor() as u64;
        assert_eq!(
            data_rate_for_bands(eirp, gt, distance, &X_BAND, &X_BAND),
            expected
        );
        assert!(expected > 0);
    }

    #[test]
    fn disjoint_bands_give_zero() {
        let s_band = FrequencyBand::new(2.2e9, 2.3e9);
        assert_eq!(data_rate_for_bands(60.0, 30.0, 1.0, &X_BAND, &s_band), 0);
        let touching = FrequencyBand::new(8.4e9, 8.5e9);
        assert!(X_BAND.overlap(&touching).is_none());
    }

    #[test]
    fn overlap_uses_top_of_shared_band() {
        let partial = FrequencyBand::new(8.2e9, 9.0e9);
        let shared = X_BAND.overlap(&partial).unwrap();
        assert_relative_eq!(shared.min_hz, 8.2e9);
        assert_relative_eq!(shared.max_hz, 8.4e9);
    }

    proptest! {
        #[test]
        fn rate_is_monotonic(
            eirp in -10.0f64..40.0,
            gt in -20.0f64..30.0,
            distance in 1.0e5f64..5.0e6,
            bump in 0.0f64..10.0,
            stretch in 1.0f64..4.0,
        ) {
            let base = data_rate_for_bands(eirp, gt, distance, &X_BAND, &X_BAND);
            prop_assert!(data_rate_for_bands(eirp + bump, gt, distance, &X_BAND, &X_BAND) >= base);
            prop_assert!(data_rate_for_bands(eirp, gt + bump, distance, &X_BAND, &X_BAND) >= base);
            prop_assert!(data_rate_for_bands(eirp, gt, distance * stretch, &X_BAND, &X_BAND) <= base);
        }

        #[test]
        fn non_overlapping_bands_always_zero(
            eirp in -10.0f64..60.0,
            gt in -20.0f64..40.0,
            distance in 1.0f64..5.0e6,
            gap in 0.0f64..1.0e9,
        ) {
            let above = FrequencyBand::new(X_BAND.max_hz + gap, X_BAND.max_hz + gap + 1.0e8);
            prop_assert_eq!(data_rate_for_bands(eirp, gt, distance, &X_BAND, &above), 0);
        }
    }
}
