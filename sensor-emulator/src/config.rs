//! Start-up configuration for the emulated sensors.

use crate::{Error, SensorKind};

/// Initial temperature reported after start-up, in °C.
pub const DEFAULT_TEMPERATURE: f64 = 22.0;
/// Initial relative humidity reported after start-up, in %.
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// Which BME280 registers the bus controller may overwrite.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WritePolicy {
    /// Every register is writable, calibration and data included.
    ///
    /// Controller software that scribbles over read-only registers changes what it
    /// reads back afterwards.
    #[default]
    Permissive,
    /// Only the registers a real BME280 accepts writes to: `reset` (0xE0),
    /// `ctrl_hum` (0xF2), `ctrl_meas` (0xF4) and `config` (0xF5).
    ControlRegistersOnly,
}

/// BME280 emulator configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bme280Config {
    /// 7-bit bus address.
    pub address: u8,
    /// Temperature encoded at start-up, in °C.
    pub temperature: f64,
    /// Humidity encoded at start-up, in %.
    pub humidity: f64,
    /// Bus write protection.
    pub write_policy: WritePolicy,
}

impl Default for Bme280Config {
    fn default() -> Self {
        Self {
            address: SensorKind::Bme280.default_address(),
            temperature: DEFAULT_TEMPERATURE,
            humidity: DEFAULT_HUMIDITY,
            write_policy: WritePolicy::default(),
        }
    }
}

impl Bme280Config {
    /// Set the bus address, which must be 0x76 or 0x77.
    pub fn with_address(mut self, address: u8) -> Result<Self, Error> {
        self.address = checked_address(SensorKind::Bme280, address)?;
        Ok(self)
    }

    /// Set the start-up temperature.
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = celsius;
        self
    }

    /// Set the start-up humidity.
    pub fn with_humidity(mut self, percent: f64) -> Self {
        self.humidity = percent;
        self
    }

    /// Set the bus write protection.
    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }
}

/// SHT31 or SHT4x emulator configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensirionConfig {
    /// 7-bit bus address.
    pub address: u8,
    /// Temperature encoded at start-up, in °C.
    pub temperature: f64,
    /// Humidity encoded at start-up, in %.
    pub humidity: f64,
}

impl Default for SensirionConfig {
    fn default() -> Self {
        Self {
            address: 0x44,
            temperature: DEFAULT_TEMPERATURE,
            humidity: DEFAULT_HUMIDITY,
        }
    }
}

impl SensirionConfig {
    /// Set the bus address, checked against the addresses `kind` can use.
    pub fn with_address(mut self, kind: SensorKind, address: u8) -> Result<Self, Error> {
        self.address = checked_address(kind, address)?;
        Ok(self)
    }

    /// Set the start-up temperature.
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = celsius;
        self
    }

    /// Set the start-up humidity.
    pub fn with_humidity(mut self, percent: f64) -> Self {
        self.humidity = percent;
        self
    }
}

fn checked_address(kind: SensorKind, address: u8) -> Result<u8, Error> {
    if kind.valid_addresses().contains(&address) {
        Ok(address)
    } else {
        Err(Error::InvalidAddress(address))
    }
}

/// Linear correction applied to requested temperatures before encoding.
///
/// Some controllers apply their own offset and gain to the sensor reading before
/// displaying it. Sending `(T + offset) / gain` instead of `T` cancels that out so
/// the controller shows the value that was asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Added to the requested value.
    pub offset: f64,
    /// The sum is divided by this. Must not be zero.
    pub gain: f64,
}

impl Default for Correction {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Correction {
    /// Sends requested values through unchanged.
    pub const IDENTITY: Self = Self {
        offset: 0.0,
        gain: 1.0,
    };

    /// Correction measured against an ecobee thermostat display.
    pub const ECOBEE: Self = Self {
        offset: 4.3766,
        gain: 0.9861,
    };

    /// Temperature to encode so the controller displays `celsius`.
    ///
    /// A zero gain is treated as 1.
    pub fn apply(&self, celsius: f64) -> f64 {
        let gain = if self.gain == 0.0 { 1.0 } else { self.gain };
        (celsius + self.offset) / gain
    }
}
