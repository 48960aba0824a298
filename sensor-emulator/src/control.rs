//! JSON messages exchanged with the test rig over a serial line.
//!
//! The rig sends one [`Setpoint`] per line to change what the emulated sensors
//! report, and receives a [`RelayReport`] whenever the thermostat switches one of
//! its outputs.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::Peripheral;
use crate::config::Correction;

/// Values requested by the rig. Absent fields leave the sensor unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct Setpoint {
    /// Temperature in °C.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    #[serde(default)]
    pub humidity: Option<f64>,
}

impl Setpoint {
    /// Parse one control line, such as `{"temperature": 21.5}`.
    ///
    /// Surrounding whitespace, including the line terminator, is ignored, as are
    /// unknown fields.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let (setpoint, _): (Self, usize) =
            serde_json_core::from_str(line.trim()).map_err(|_| Error::InvalidControlMessage)?;
        if setpoint.temperature.is_none() && setpoint.humidity.is_none() {
            return Err(Error::EmptyControlMessage);
        }
        Ok(setpoint)
    }

    /// Parse a control line received as raw bytes.
    pub fn parse_bytes(line: &[u8]) -> Result<Self, Error> {
        let line = core::str::from_utf8(line).map_err(|_| Error::InvalidControlMessage)?;
        Self::parse(line)
    }

    /// Push the requested values to every peripheral.
    ///
    /// Temperature is always set before humidity, which the BME280 needs. The
    /// correction only applies to temperature.
    pub fn apply(&self, peripherals: &mut [&mut dyn Peripheral], correction: &Correction) {
        for peripheral in peripherals.iter_mut() {
            self.apply_to(&mut **peripheral, correction);
        }
    }

    /// Push the requested values to a single peripheral.
    pub fn apply_to(&self, peripheral: &mut dyn Peripheral, correction: &Correction) {
        if let Some(celsius) = self.temperature {
            let sent = correction.apply(celsius);
            log::debug!("{}: temperature {celsius} °C (sent {sent})", peripheral.kind());
            peripheral.set_temperature(sent);
        }
        if let Some(percent) = self.humidity {
            log::debug!("{}: humidity {percent} %", peripheral.kind());
            peripheral.set_humidity(percent);
        }
    }
}

/// State of the thermostat's fan, heat and cool outputs, 1 when energised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayReport {
    /// Fan.
    pub input0: u8,
    /// Heat.
    pub input1: u8,
    /// Cool.
    pub input2: u8,
}

impl RelayReport {
    /// Report from the three input levels, in fan, heat, cool order.
    pub fn from_levels([fan, heat, cool]: [bool; 3]) -> Self {
        Self {
            input0: fan.into(),
            input1: heat.into(),
            input2: cool.into(),
        }
    }

    /// Serialise as a single JSON line, newline included, into `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn write_line(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let len = serde_json_core::to_slice(self, buf).map_err(|_| Error::ReportTooLong)?;
        let newline = buf.get_mut(len).ok_or(Error::ReportTooLong)?;
        *newline = b'\n';
        Ok(len + 1)
    }
}
