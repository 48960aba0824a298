//! Sensirion SHT3x and SHT4x emulation.
//!
//! Sensirion sensors are command driven: the controller writes a command code and
//! the following read returns a fixed-size reply. Every 16-bit word in a reply is
//! followed by its CRC-8.
//!
//! Temperature and humidity are linear in the raw values, so encoding is a direct
//! inversion of the datasheet conversion (section 4.6 of the SHT4x datasheet,
//! 4.13 of the SHT3x datasheet).

mod sht31;
mod sht4x;

pub use sht31::{Sht31, Sht31Command};
pub use sht4x::{Heater, Sht4x, Sht4xCommand};

use crate::checksum::word_with_crc;

/// Full scale of the 16-bit raw values.
const FULL_SCALE: f64 = 65_535.0;

/// Serial number reported by the emulators, as two 16-bit words.
pub const SERIAL_NUMBER: [u16; 2] = [0x0EFE, 0x7FBF];

/// Measurement repeatability (SHT3x) or precision (SHT4x).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Precision {
    /// High repeatability.
    High,
    /// Medium repeatability.
    Medium,
    /// Low repeatability.
    Low,
}

/// SHT3x humidity conversion: `RH = 100 * raw / 65535`.
pub const SHT31_HUMIDITY: HumidityScale = HumidityScale {
    offset: 0.0,
    span: 100.0,
};

/// SHT4x humidity conversion: `RH = -6 + 125 * raw / 65535`.
pub const SHT4X_HUMIDITY: HumidityScale = HumidityScale {
    offset: 6.0,
    span: 125.0,
};

/// Linear humidity conversion `RH = -offset + span * raw / 65535`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityScale {
    /// Subtracted after scaling, in %RH.
    pub offset: f64,
    /// %RH covered by the full raw range.
    pub span: f64,
}

/// Raw temperature word for `celsius`, saturating at the ends of the range.
///
/// Inverts `T = -45 + 175 * raw / 65535`, the same on both families.
pub fn encode_temperature(celsius: f64) -> u16 {
    ((celsius + 45.0) * FULL_SCALE / 175.0) as u16
}

/// Temperature in °C for a raw temperature word.
pub fn decode_temperature(raw: u16) -> f64 {
    -45.0 + 175.0 * f64::from(raw) / FULL_SCALE
}

/// Raw humidity word for `percent`, clamped to `0..=100` first.
pub fn encode_humidity(scale: HumidityScale, percent: f64) -> u16 {
    let percent = percent.clamp(0.0, 100.0);
    ((percent + scale.offset) * FULL_SCALE / scale.span) as u16
}

/// Relative humidity in % for a raw humidity word.
pub fn decode_humidity(scale: HumidityScale, raw: u16) -> f64 {
    -scale.offset + scale.span * f64::from(raw) / FULL_SCALE
}

/// Reply to the next read request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Reply {
    bytes: [u8; 6],
    len: usize,
}

impl Reply {
    /// One or two data words, each followed by its CRC.
    fn words(words: &[u16]) -> Self {
        let mut reply = Self::default();
        for (chunk, &word) in reply.bytes.chunks_exact_mut(3).zip(words) {
            chunk.copy_from_slice(&word_with_crc(word));
            reply.len += 3;
        }
        reply
    }

    fn empty() -> Self {
        Self::default()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
