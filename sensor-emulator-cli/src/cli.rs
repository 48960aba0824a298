use crate::util;

use clap::{Parser, ValueEnum};
use sensor_emulator::SensorKind;

/// Host-side driver for the BME280, SHT31 and SHT4x sensor emulators
///
/// Builds one emulated sensor with the given start-up values and inspects it the
/// way a thermostat would see it on the I2C bus.
///
/// The control command reads JSON lines such as {"temperature": 21.5} or
/// {"humidity": 40} from stdin, the same messages the firmware accepts on its
/// serial port, and prints what a controller reads after each one.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Sensor to emulate
    #[arg(short, long, value_enum, default_value_t = Sensor::Bme280)]
    pub(crate) sensor: Sensor,
    /// 7-bit bus address in hexadecimal [default: the sensor's usual address]
    #[arg(short, long, value_parser = util::u8_from_hex)]
    pub(crate) address: Option<u8>,
    /// Start-up temperature in °C
    #[arg(
        short,
        long,
        default_value_t = sensor_emulator::config::DEFAULT_TEMPERATURE,
        allow_negative_numbers = true
    )]
    pub(crate) temperature: f64,
    /// Start-up relative humidity in %
    #[arg(short = 'H', long, default_value_t = sensor_emulator::config::DEFAULT_HUMIDITY)]
    pub(crate) humidity: f64,
    /// Added to requested temperatures before they are encoded
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub(crate) offset: f64,
    /// Requested temperatures are divided by this after the offset
    #[arg(long, default_value_t = 1.0)]
    pub(crate) gain: f64,
    /// Only let the bus write the BME280 control registers
    #[arg(long)]
    pub(crate) strict_registers: bool,
    /// Log bus traffic and encoding to stderr (`RUST_LOG` takes precedence)
    #[arg(short, long)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// Print the BME280 register file, or the Sensirion reply frames.
    Registers,
    /// Read the sensor over the emulated bus and decode the result.
    Read,
    /// Apply JSON control lines from stdin, reading back after each.
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Sensor {
    /// Bosch BME280
    Bme280,
    /// Sensirion SHT30/SHT31/SHT35
    Sht31,
    /// Sensirion SHT40/SHT41/SHT45
    Sht4x,
}

impl From<Sensor> for SensorKind {
    fn from(value: Sensor) -> SensorKind {
        match value {
            Sensor::Bme280 => SensorKind::Bme280,
            Sensor::Sht31 => SensorKind::Sht31,
            Sensor::Sht4x => SensorKind::Sht4x,
        }
    }
}
