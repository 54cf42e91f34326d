use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;

pub const SI_DAY_SECONDS: f64 = 86_400.0;

/// Splits a 2- or 3-line element set into its optional name and two data lines.
pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), PredictError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((Some(lines[0].clone()), lines[1].clone(), lines[2].clone())),
        n => Err(PredictError::InvalidTleFormat(n)),
    }
}

/// Parsed element set ready for SGP4 propagation.
pub struct OrbitalElements {
    pub name: String,
    pub norad_id: u64,
    pub elements: Elements,
    pub constants: Constants,
}

impl OrbitalElements {
    pub fn from_tle(tle: &str) -> Result<Self, PredictError> {
        let (name, line1, line2) = parse_tle_lines(tle)?;
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PredictError::InvalidTle(e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::InvalidTle(e.to_string()))?;
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            name,
            norad_id: elements.norad_id,
            elements,
            constants,
        })
    }

    /// Orbital period in seconds, from the mean motion in revolutions per day.
    pub fn orbit_duration_s(&self) -> f64 {
        SI_DAY_SECONDS / self.elements.mean_motion
    }
}

#[cfg(test)]
pub(crate) const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   24001.50000000  .00016717  00000-0  30302-3 0  9995
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.49815308432596";
