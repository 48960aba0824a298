use super::{Precision, Reply, SERIAL_NUMBER, SHT4X_HUMIDITY};
use crate::config::SensirionConfig;
use crate::{Peripheral, SensorKind};

/// Heater setting of an SHT4x measurement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heater {
    /// 200 mW for 1 s.
    High1s,
    /// 200 mW for 0.1 s.
    High100ms,
    /// 110 mW for 1 s.
    Medium1s,
    /// 110 mW for 0.1 s.
    Medium100ms,
    /// 20 mW for 1 s.
    Low1s,
    /// 20 mW for 0.1 s.
    Low100ms,
}

/// SHT4x single-byte commands (table 7 of the SHT4x datasheet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sht4xCommand {
    /// Measure without heating.
    Measure(Precision),
    /// Heat, then measure with high precision.
    MeasureHeated(Heater),
    /// Read the 32-bit serial number.
    ReadSerial,
    /// Soft reset.
    SoftReset,
}

impl Sht4xCommand {
    /// Command byte sent on the bus.
    pub fn code(self) -> u8 {
        match self {
            Sht4xCommand::Measure(Precision::High) => 0xFD,
            Sht4xCommand::Measure(Precision::Medium) => 0xF6,
            Sht4xCommand::Measure(Precision::Low) => 0xE0,
            Sht4xCommand::MeasureHeated(Heater::High1s) => 0x39,
            Sht4xCommand::MeasureHeated(Heater::High100ms) => 0x32,
            Sht4xCommand::MeasureHeated(Heater::Medium1s) => 0x2F,
            Sht4xCommand::MeasureHeated(Heater::Medium100ms) => 0x24,
            Sht4xCommand::MeasureHeated(Heater::Low1s) => 0x1E,
            Sht4xCommand::MeasureHeated(Heater::Low100ms) => 0x15,
            Sht4xCommand::ReadSerial => 0x89,
            Sht4xCommand::SoftReset => 0x94,
        }
    }

    /// Parse a command byte, `None` if the SHT4x doesn't know it.
    pub fn from_code(code: u8) -> Option<Self> {
        let command = match code {
            0xFD => Sht4xCommand::Measure(Precision::High),
            0xF6 => Sht4xCommand::Measure(Precision::Medium),
            0xE0 => Sht4xCommand::Measure(Precision::Low),
            0x39 => Sht4xCommand::MeasureHeated(Heater::High1s),
            0x32 => Sht4xCommand::MeasureHeated(Heater::High100ms),
            0x2F => Sht4xCommand::MeasureHeated(Heater::Medium1s),
            0x24 => Sht4xCommand::MeasureHeated(Heater::Medium100ms),
            0x1E => Sht4xCommand::MeasureHeated(Heater::Low1s),
            0x15 => Sht4xCommand::MeasureHeated(Heater::Low100ms),
            0x89 => Sht4xCommand::ReadSerial,
            0x94 => Sht4xCommand::SoftReset,
            _ => return None,
        };
        Some(command)
    }
}

/// Emulated SHT4x.
#[derive(Debug, Clone)]
pub struct Sht4x {
    address: u8,
    temperature: u16,
    humidity: u16,
    /// Last command byte received, 0 after a malformed write.
    command: u8,
    reply: Reply,
}

impl Default for Sht4x {
    fn default() -> Self {
        Self::new()
    }
}

impl Sht4x {
    /// SHT4x at 0x44 reporting the default temperature and humidity.
    pub fn new() -> Self {
        Self::with_config(&SensirionConfig::default())
    }

    /// Emulator set up from `config`, with its start-up values encoded.
    pub fn with_config(config: &SensirionConfig) -> Self {
        let mut sht = Self {
            address: config.address,
            temperature: 0,
            humidity: 0,
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

    /// Last command latched from the bus.
    pub fn command(&self) -> Option<Sht4xCommand> {
        Sht4xCommand::from_code(self.command)
    }
}

impl Peripheral for Sht4x {
    fn kind(&self) -> SensorKind {
        SensorKind::Sht4x
    }

    fn address(&self) -> u8 {
        self.address
    }

    /// Latch a single command byte.
    fn on_write(&mut self, bytes: &[u8]) {
        let &[code] = bytes else {
            warn!("SHT4x: expected one command byte, received {}", bytes.len());
            self.command = 0;
            return;
        };
        self.command = code;
        match Sht4xCommand::from_code(code) {
            Some(Sht4xCommand::SoftReset) => log::debug!("SHT4x: soft reset"),
            Some(command) => log::debug!("SHT4x: command {command:?}"),
            None => warn!("SHT4x: unknown command {:#x}", code),
        }
    }

    fn on_read_request(&mut self) -> &[u8] {
        self.reply = match self.command() {
            Some(Sht4xCommand::Measure(_) | Sht4xCommand::MeasureHeated(_)) => {
                Reply::words(&[self.temperature, self.humidity])
            }
            Some(Sht4xCommand::ReadSerial) => Reply::words(&SERIAL_NUMBER),
            Some(Sht4xCommand::SoftReset) | None => Reply::empty(),
        };
        self.reply.as_bytes()
    }

    fn set_temperature(&mut self, celsius: f64) {
        self.temperature = super::encode_temperature(celsius);
    }

    fn set_humidity(&mut self, percent: f64) {
        self.humidity = super::encode_humidity(SHT4X_HUMIDITY, percent);
    }

    fn temperature(&self) -> f64 {
        super::decode_temperature(self.temperature)
    }

    fn humidity(&self) -> f64 {
        super::decode_humidity(SHT4X_HUMIDITY, self.humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc8;

    #[test]
    fn command_codes_round_trip() {
        for code in 0..=u8::MAX {
            if let Some(command) = Sht4xCommand::from_code(code) {
                assert_eq!(command.code(), code);
            }
        }
        assert_eq!(Sht4xCommand::from_code(0x00), None);
    }

    #[test]
    fn measurement_frame() {
        let mut sht = Sht4x::new();
        sht.set_temperature(25.0);
        sht.set_humidity(50.0);
        sht.on_write(&[0xFD]);
        let frame = sht.on_read_request();
        assert_eq!(frame.len(), 6);
        assert_eq!(u16::from_be_bytes([frame[0], frame[1]]), 26214);
        assert_eq!(crc8(&frame[0..2]), frame[2]);
        assert_eq!(u16::from_be_bytes([frame[3], frame[4]]), 29359);
        assert_eq!(crc8(&frame[3..5]), frame[5]);
    }

    #[test]
    fn heated_measurement_reports_the_same_values() {
        let mut sht = Sht4x::new();
        sht.on_write(&[0xFD]);
        let plain: [u8; 6] = sht.on_read_request().try_into().unwrap();
        sht.on_write(&[0x15]);
        assert_eq!(sht.on_read_request(), plain);
    }

    #[test]
    fn serial_number() {
        let mut sht = Sht4x::new();
        sht.on_write(&[0x89]);
        let frame = sht.on_read_request();
        assert_eq!(&frame[..2], &[0x0E, 0xFE]);
        assert_eq!(&frame[3..5], &[0x7F, 0xBF]);
        assert_eq!(crc8(&frame[3..5]), frame[5]);
    }

    #[test]
    fn malformed_write_clears_command() {
        let mut sht = Sht4x::new();
        sht.on_write(&[0xFD]);
        sht.on_write(&[0xFD, 0x00]);
        assert_eq!(sht.command(), None);
        assert!(sht.on_read_request().is_empty());
    }

    #[test]
    fn unknown_and_reset_commands_have_no_reply() {
        let mut sht = Sht4x::new();
        sht.on_write(&[0x42]);
        assert!(sht.on_read_request().is_empty());
        sht.on_write(&[0x94]);
        assert_eq!(sht.command(), Some(Sht4xCommand::SoftReset));
        assert!(sht.on_read_request().is_empty());
    }

    #[test]
    fn humidity_is_clamped() {
        let mut sht = Sht4x::new();
        sht.set_humidity(120.0);
        assert_eq!(sht.raw_humidity(), 55573);
        sht.set_humidity(-5.0);
        assert_eq!(sht.raw_humidity(), 3145);
    }
}
