use anyhow::Context;
use sensor_emulator::config::{Bme280Config, Correction, SensirionConfig, WritePolicy};
use sensor_emulator::{Bme280, Peripheral, SensorKind, Sht31, Sht4x};

use crate::cli::{Cli, Sensor};

/// The one emulated sensor the CLI works with.
pub(crate) enum Emulator {
    Bme280(Bme280),
    Sht31(Sht31),
    Sht4x(Sht4x),
}

impl Emulator {
    /// Build the sensor selected on the command line.
    ///
    /// The start-up temperature goes through the same correction as control lines.
    pub(crate) fn from_cli(cli: &Cli, correction: &Correction) -> anyhow::Result<Self> {
        let kind = SensorKind::from(cli.sensor);
        let address = cli.address.unwrap_or(kind.default_address());
        let temperature = correction.apply(cli.temperature);

        let emulator = match cli.sensor {
            Sensor::Bme280 => {
                let policy = if cli.strict_registers {
                    WritePolicy::ControlRegistersOnly
                } else {
                    WritePolicy::Permissive
                };
                let config = Bme280Config::default()
                    .with_address(address)
                    .with_context(|| format!("cannot emulate a {kind} at that address"))?
                    .with_temperature(temperature)
                    .with_humidity(cli.humidity)
                    .with_write_policy(policy);
                Emulator::Bme280(Bme280::with_config(&config))
            }
            Sensor::Sht31 | Sensor::Sht4x => {
                let config = SensirionConfig::default()
                    .with_address(kind, address)
                    .with_context(|| format!("cannot emulate an {kind} at that address"))?
                    .with_temperature(temperature)
                    .with_humidity(cli.humidity);
                if cli.sensor == Sensor::Sht31 {
                    Emulator::Sht31(Sht31::with_config(&config))
                } else {
                    Emulator::Sht4x(Sht4x::with_config(&config))
                }
            }
        };
        Ok(emulator)
    }

    pub(crate) fn peripheral(&mut self) -> &mut dyn Peripheral {
        match self {
            Emulator::Bme280(bme) => bme,
            Emulator::Sht31(sht) => sht,
            Emulator::Sht4x(sht) => sht,
        }
    }
}
