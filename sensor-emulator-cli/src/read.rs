//! Read an emulated sensor over the emulated bus, as a thermostat would.
use std::fmt;

use embedded_hal::i2c::I2c;
use sensor_emulator::bme280::calibration::Calibration;
use sensor_emulator::bme280::registers::{CHIP_ID, PRESS_DATA};
use sensor_emulator::sensirion::{self, HumidityScale, SHT31_HUMIDITY, SHT4X_HUMIDITY};
use sensor_emulator::{
    EmulatedBus, Error, Peripheral, REGISTER_COUNT, RegisterFile, SensorKind, crc8,
};

/// Value of the BME280 `id` register.
const BME280_CHIP_ID: u8 = 0x60;
/// SHT31 single-shot measurement, high repeatability, no clock stretching.
const SHT31_MEASURE: [u8; 2] = [0x24, 0x00];
/// SHT4x measurement, high precision, no heater.
const SHT4X_MEASURE: [u8; 1] = [0xFD];

/// What a controller decoded from the sensor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reading {
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
    /// BME280 only.
    pub(crate) pressure: Option<f64>,
    /// Sensirion only: whether every word's CRC matched.
    pub(crate) crc_ok: Option<bool>,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} °C, {:.2} %RH", self.temperature, self.humidity)?;
        if let Some(pressure) = self.pressure {
            write!(f, ", {:.2} hPa", pressure / 100.0)?;
        }
        match self.crc_ok {
            Some(true) => f.write_str(", CRC ok"),
            Some(false) => f.write_str(", CRC MISMATCH"),
            None => Ok(()),
        }
    }
}

/// Attach `peripheral` to a fresh bus and take one reading from it.
pub(crate) fn measure(peripheral: &mut dyn Peripheral) -> anyhow::Result<Reading> {
    let kind = peripheral.kind();
    let address = peripheral.address();
    let mut bus = EmulatedBus::new();
    bus.attach(peripheral)?;
    match kind {
        SensorKind::Bme280 => read_bme280(&mut bus, address),
        SensorKind::Sht31 => read_sensirion(&mut bus, address, &SHT31_MEASURE, SHT31_HUMIDITY),
        SensorKind::Sht4x => read_sensirion(&mut bus, address, &SHT4X_MEASURE, SHT4X_HUMIDITY),
    }
}

fn read_bme280(bus: &mut impl I2c<Error = Error>, address: u8) -> anyhow::Result<Reading> {
    let mut id = [0u8];
    bus.write_read(address, &[CHIP_ID], &mut id)?;
    anyhow::ensure!(id[0] == BME280_CHIP_ID, "unexpected chip id {:#04x}", id[0]);

    let mut registers = [0u8; REGISTER_COUNT];
    bus.write_read(address, &[0x00], &mut registers)?;
    let calibration = Calibration::from_registers(&RegisterFile::from_snapshot(registers));

    // Burst read of pressure, temperature and humidity.
    let mut data = [0u8; 8];
    bus.write_read(address, &[PRESS_DATA], &mut data)?;
    let adc_p = adc_20_bit([data[0], data[1], data[2]]);
    let adc_t = adc_20_bit([data[3], data[4], data[5]]);
    let adc_h = i32::from(u16::from_be_bytes([data[6], data[7]]));
    log::debug!("adc_T {adc_t}, adc_H {adc_h}, adc_P {adc_p}");

    let (t_fine, centi_celsius) = calibration.compensate_temperature(adc_t);
    let humidity = calibration.compensate_humidity(adc_h, t_fine);
    let pressure = calibration.compensate_pressure(adc_p, t_fine);
    Ok(Reading {
        temperature: f64::from(centi_celsius) / 100.0,
        humidity: f64::from(humidity) / 1024.0,
        pressure: Some(f64::from(pressure) / 256.0),
        crc_ok: None,
    })
}

fn adc_20_bit([msb, lsb, xlsb]: [u8; 3]) -> i32 {
    (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4)
}

fn read_sensirion(
    bus: &mut impl I2c<Error = Error>,
    address: u8,
    command: &[u8],
    scale: HumidityScale,
) -> anyhow::Result<Reading> {
    let mut frame = [0u8; 6];
    bus.write(address, command)?;
    bus.read(address, &mut frame)?;
    log::debug!("measurement frame {frame:02X?}");

    let crc_ok = frame
        .chunks_exact(3)
        .all(|word| crc8(&word[..2]) == word[2]);
    let temperature = u16::from_be_bytes([frame[0], frame[1]]);
    let humidity = u16::from_be_bytes([frame[3], frame[4]]);
    Ok(Reading {
        temperature: sensirion::decode_temperature(temperature),
        humidity: sensirion::decode_humidity(scale, humidity),
        pressure: None,
        crc_ok: Some(crc_ok),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use sensor_emulator::{Bme280, Sht31, Sht4x};

    #[test]
    fn reads_each_sensor() {
        let mut bme = Bme280::new();
        let mut sht31 = Sht31::new();
        let mut sht4x = Sht4x::new();
        let sensors: [&mut dyn Peripheral; 3] = [&mut bme, &mut sht31, &mut sht4x];
        for sensor in sensors {
            sensor.set_temperature(-5.0);
            sensor.set_humidity(70.0);
            let reading = measure(sensor).unwrap();
            assert!((reading.temperature + 5.0).abs() < 0.01);
            assert!((reading.humidity - 70.0).abs() < 0.05);
            assert_ne!(reading.crc_ok, Some(false));
        }
    }
}
