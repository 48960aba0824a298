use bit_field::BitField;

use super::{Precision, Reply, SERIAL_NUMBER, SHT31_HUMIDITY};
use crate::config::SensirionConfig;
use crate::{Peripheral, SensorKind};

/// Status register after power-up or soft reset: alert pending, reset detected.
const STATUS_AFTER_RESET: u16 = 0x8008;
/// Status register bit set while the heater is on.
const HEATER_BIT: usize = 13;

/// SHT3x 16-bit commands (section 4 of the SHT3x datasheet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sht31Command {
    /// Single-shot measurement.
    Measure {
        /// Measurement repeatability.
        repeatability: Precision,
        /// Whether the sensor holds SCL low until the result is ready.
        clock_stretching: bool,
    },
    /// Read the status register.
    ReadStatus,
    /// Clear the status register.
    ClearStatus,
    /// Soft reset.
    SoftReset,
    /// Turn the heater on.
    HeaterEnable,
    /// Turn the heater off.
    HeaterDisable,
    /// Read the 32-bit serial number.
    ReadSerial,
}

impl Sht31Command {
    /// Command word sent on the bus, MSB first.
    pub fn code(self) -> u16 {
        use Precision::*;
        match self {
            Sht31Command::Measure {
                repeatability,
                clock_stretching,
            } => match (clock_stretching, repeatability) {
                (true, High) => 0x2C06,
                (true, Medium) => 0x2C0D,
                (true, Low) => 0x2C10,
                (false, High) => 0x2400,
                (false, Medium) => 0x240B,
                (false, Low) => 0x2416,
            },
            Sht31Command::ReadStatus => 0xF32D,
            Sht31Command::ClearStatus => 0x3041,
            Sht31Command::SoftReset => 0x30A2,
            Sht31Command::HeaterEnable => 0x306D,
            Sht31Command::HeaterDisable => 0x3066,
            Sht31Command::ReadSerial => 0x3780,
        }
    }

    /// Parse a command word, `None` if the SHT3x doesn't know it.
    pub fn from_code(code: u16) -> Option<Self> {
        let measure = |repeatability, clock_stretching| Sht31Command::Measure {
            repeatability,
            clock_stretching,
        };
        let command = match code {
            0x2C06 => measure(Precision::High, true),
            0x2C0D => measure(Precision::Medium, true),
            0x2C10 => measure(Precision::Low, true),
            0x2400 => measure(Precision::High, false),
            0x240B => measure(Precision::Medium, false),
            0x2416 => measure(Precision::Low, false),
            0xF32D => Sht31Command::ReadStatus,
            0x3041 => Sht31Command::ClearStatus,
            0x30A2 => Sht31Command::SoftReset,
            0x306D => Sht31Command::HeaterEnable,
            0x3066 => Sht31Command::HeaterDisable,
            0x3780 => Sht31Command::ReadSerial,
            _ => return None,
        };
        Some(command)
    }
}

/// Emulated SHT31.
#[derive(Debug, Clone)]
pub struct Sht31 {
    address: u8,
    temperature: u16,
    humidity: u16,
    status: u16,
    /// Last command word received, 0 after a malformed write.
    command: u16,
    reply: Reply,
}

impl Default for Sht31 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sht31 {
    /// SHT31 at 0x44 reporting the default temperature and humidity.
    pub fn new() -> Self {
        Self::with_config(&SensirionConfig::default())
    }

    /// Emulator set up from `config`, with its start-up values encoded.
    pub fn with_config(config: &SensirionConfig) -> Self {
        let mut sht = Self {
            address: config.address,
            temperature: 0,
            humidity: 0,
            status: STATUS_AFTER_RESET,
            command: 0,
            reply: Reply::empty(),
        };
        sht.set_temperature(config.temperature);
        sht.set_humidity(config.humidity);
        sht
    }

    /// Raw temperature word.
    pub fn raw_temperature(&self) -> u16 {
        self.temperature
    }

    /// Raw humidity word.
    pub fn raw_humidity(&self) -> u16 {
        self.humidity
    }

    /// Status register.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the heater has been switched on by the controller.
    pub fn heater_enabled(&self) -> bool {
        self.status.get_bit(HEATER_BIT)
    }

    /// Last command latched from the bus.
    pub fn command(&self) -> Option<Sht31Command> {
        Sht31Command::from_code(self.command)
    }

    /// Commands that change state take effect as soon as they are written.
    fn execute(&mut self, command: Sht31Command) {
        match command {
            Sht31Command::ClearStatus => self.status = 0,
            Sht31Command::SoftReset => self.status = STATUS_AFTER_RESET,
            Sht31Command::HeaterEnable => {
                self.status.set_bit(HEATER_BIT, true);
            }
            Sht31Command::HeaterDisable => {
                self.status.set_bit(HEATER_BIT, false);
            }
            Sht31Command::Measure { .. } | Sht31Command::ReadStatus | Sht31Command::ReadSerial => {}
        }
    }
}

impl Peripheral for Sht31 {
    fn kind(&self) -> SensorKind {
        SensorKind::Sht31
    }

    fn address(&self) -> u8 {
        self.address
    }

    /// Latch a two-byte command word and run any side effect it has.
    fn on_write(&mut self, bytes: &[u8]) {
        let &[msb, lsb] = bytes else {
            warn!("SHT31: expected two command bytes, received {}", bytes.len());
            self.command = 0;
            return;
        };
        let code = u16::from_be_bytes([msb, lsb]);
        self.command = code;
        match Sht31Command::from_code(code) {
            Some(command) => {
                log::debug!("SHT31: command {command:?}");
                self.execute(command);
            }
            None => warn!("SHT31: unknown command {:#x}", code),
        }
    }

    fn on_read_request(&mut self) -> &[u8] {
        self.reply = match self.command() {
            Some(Sht31Command::Measure { .. }) => Reply::words(&[self.temperature, self.humidity]),
            Some(Sht31Command::ReadStatus) => Reply::words(&[self.status]),
            Some(Sht31Command::ReadSerial) => Reply::words(&SERIAL_NUMBER),
            Some(_) | None => Reply::empty(),
        };
        self.reply.as_bytes()
    }

    fn set_temperature(&mut self, celsius: f64) {
        self.temperature = super::encode_temperature(celsius);
    }

    fn set_humidity(&mut self, percent: f64) {
        self.humidity = super::encode_humidity(SHT31_HUMIDITY, percent);
    }

    fn temperature(&self) -> f64 {
        super::decode_temperature(self.temperature)
    }

    fn humidity(&self) -> f64 {
        super::decode_humidity(SHT31_HUMIDITY, self.humidity)
    }
}
