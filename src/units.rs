//! Parsing and formatting of the physical quantities that appear in
//! analysis requests and reports.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Below this many bits a volume is shown in bits instead of bytes.
pub const BIT_BYTE_BOUNDARY: f64 = 800.0;
pub const BYTE_SIZE: f64 = 8.0;
const UNIT_STEP: i32 = 3;
const ROUNDING_DIGITS: i32 = 3;

const SUFFIXES: [(i32, &str); 7] = [
    (18, "EB"),
    (15, "PB"),
    (12, "TB"),
    (9, "GB"),
    (6, "MB"),
    (3, "KB"),
    (0, "Byte"),
];

#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("invalid number in quantity '{0}'")]
    InvalidNumber(String),
    #[error("unknown {kind} unit '{unit}'")]
    UnknownUnit { kind: &'static str, unit: String },
    #[error("{kind} must be positive, got '{input}'")]
    NotPositive { kind: &'static str, input: String },
}

/// Parses a frequency such as `"437.5 MHz"`. Plain numbers are Hz.
pub fn parse_frequency_hz(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_quantity(input)?;
    let scale = match unit.to_ascii_lowercase().as_str() {
        "" | "hz" => 1.0,
        "khz" => 1e3,
        "mhz" => 1e6,
        "ghz" => 1e9,
        _ => {
            return Err(UnitError::UnknownUnit {
                kind: "frequency",
                unit: unit.to_string(),
            })
        }
    };
    Ok(value * scale)
}

/// Parses a transmitter power into dBW. Accepts `W`, `mW`, `dBW` and `dBm`;
/// plain numbers are dBW.
pub fn parse_power_dbw(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_quantity(input)?;
    match unit.to_ascii_lowercase().as_str() {
        "" | "dbw" => Ok(value),
        "dbm" => Ok(value - 30.0),
        "w" | "mw" => {
            if value <= 0.0 {
                return Err(UnitError::NotPositive {
                    kind: "power",
                    input: input.to_string(),
                });
            }
            let watts = if unit.eq_ignore_ascii_case("mw") {
                value / 1000.0
            } else {
                value
            };
            Ok(10.0 * watts.log10())
        }
        _ => Err(UnitError::UnknownUnit {
            kind: "power",
            unit: unit.to_string(),
        }),
    }
}

/// Parses a data volume into bits. Byte units are decimal (`1 KB` = 8000 bit);
/// plain numbers are bits.
pub fn parse_data_bits(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_quantity(input)?;
    let scale = match unit.to_ascii_lowercase().as_str() {
        "" | "bit" | "bits" => 1.0,
        "kbit" => 1e3,
        "mbit" => 1e6,
        "gbit" => 1e9,
        "tbit" => 1e12,
        "b" | "byte" | "bytes" => BYTE_SIZE,
        "kb" => BYTE_SIZE * 1e3,
        "mb" => BYTE_SIZE * 1e6,
        "gb" => BYTE_SIZE * 1e9,
        "tb" => BYTE_SIZE * 1e12,
        "pb" => BYTE_SIZE * 1e15,
        "eb" => BYTE_SIZE * 1e18,
        _ => {
            return Err(UnitError::UnknownUnit {
                kind: "data",
                unit: unit.to_string(),
            })
        }
    };
    Ok(value * scale)
}

/// Formats a volume in bits using the largest unit that keeps the value
/// readable, rounded to three significant digits.
///
/// `799.0` gives `"799 Bit"`, `8000.0` gives `"1 KB"`. The unit is chosen
/// before rounding, so a value just below a unit boundary can print as
/// `"1000 KB"` rather than `"1 MB"`.
pub fn data_with_unit(data_bit: f64) -> String {
    let data_bit = data_bit.trunc();
    if data_bit < BIT_BYTE_BOUNDARY {
        return format!("{} Bit", data_bit as i64);
    }
    let data_byte = data_bit / BYTE_SIZE;
    let power = ((data_byte.log10() / UNIT_STEP as f64).floor() as i32 * UNIT_STEP).min(18);
    let suffix = SUFFIXES
        .iter()
        .find(|(p, _)| *p == power)
        .map(|(_, s)| *s)
        .unwrap_or("Byte");
    let scaled = round_significant(data_byte / 10f64.powi(power), ROUNDING_DIGITS);
    format!("{} {}", scaled, suffix)
}

/// Rounds `value` to `digits` significant digits.
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let decimals = digits - 1 - value.abs().log10().floor() as i32;
    if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-decimals);
        (value / factor).round() * factor
    }
}

/// Share expressed as a percentage, capped at 100.
pub fn to_percent_max100(share: f64) -> f64 {
    (share * 100.0).min(100.0)
}

fn split_quantity(input: &str) -> Result<(f64, &str), UnitError> {
    let s = input.trim();
    let idx = s
        .char_indices()
        .find(|&(i, c)| c.is_alphabetic() && !is_exponent(s, i))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let value = s[..idx]
        .trim()
        .parse::<f64>()
        .map_err(|_| UnitError::InvalidNumber(input.to_string()))?;
    if !value.is_finite() {
        return Err(UnitError::InvalidNumber(input.to_string()));
    }
    Ok((value, s[idx..].trim()))
}

fn is_exponent(s: &str, i: usize) -> bool {
    let bytes = s.as_bytes();
    matches!(bytes[i], b'e' | b'E')
        && i > 0
        && bytes[i - 1].is_ascii_digit()
        && bytes
            .get(i + 1)
            .is_some_and(|n| n.is_ascii_digit() || *n == b'-' || *n == b'+')
}

/// A number or a string with a unit, as written in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    fn parse_with(self, parse: fn(&str) -> Result<f64, UnitError>) -> Result<f64, UnitError> {
        match self {
            QuantityInput::Number(n) => Ok(n),
            QuantityInput::Text(s) => parse(&s),
        }
    }
}

pub fn deserialize_frequency_hz<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    QuantityInput::deserialize(deserializer)?
        .parse_with(parse_frequency_hz)
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_power_dbw<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    QuantityInput::deserialize(deserializer)?
        .parse_with(parse_power_dbw)
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_data_bits<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    QuantityInput::deserialize(deserializer)?
        .parse_with(parse_data_bits)
        .map_err(serde::de::Error::custom)
}
