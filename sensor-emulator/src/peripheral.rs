use core::fmt;

/// Sensor families that can be emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// Bosch BME280 temperature, humidity and pressure sensor.
    Bme280,
    /// Sensirion SHT3x (SHT30/31/35) temperature and humidity sensor.
    Sht31,
    /// Sensirion SHT4x (SHT40/41/43/45) temperature and humidity sensor.
    Sht4x,
}

impl SensorKind {
    /// 7-bit address of the part in its most common strapping.
    pub fn default_address(self) -> u8 {
        match self {
            SensorKind::Bme280 => 0x76,
            SensorKind::Sht31 | SensorKind::Sht4x => 0x44,
        }
    }

    /// 7-bit addresses the part can be strapped or ordered with.
    pub fn valid_addresses(self) -> &'static [u8] {
        match self {
            // SDO to GND or VDDIO.
            SensorKind::Bme280 => &[0x76, 0x77],
            // ADDR pin low or high.
            SensorKind::Sht31 => &[0x44, 0x45],
            // SHT4x-A, -B and -C parts.
            SensorKind::Sht4x => &[0x44, 0x45, 0x46],
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Bme280 => f.write_str("BME280"),
            SensorKind::Sht31 => f.write_str("SHT31"),
            SensorKind::Sht4x => f.write_str("SHT4x"),
        }
    }
}

/// An emulated sensor as seen from both sides.
///
/// The bus side is [`Peripheral::on_write`] and [`Peripheral::on_read_request`],
/// called by whatever drives the I2C target hardware (or by [`EmulatedBus`] on a
/// host). The application side is [`Peripheral::set_temperature`] and
/// [`Peripheral::set_humidity`].
///
/// None of these methods block or fail. Callers on a platform where the two sides
/// can preempt each other must serialise access, for example by keeping the
/// peripheral in a critical-section mutex.
///
/// [`EmulatedBus`]: crate::EmulatedBus
pub trait Peripheral {
    /// Which sensor this is.
    fn kind(&self) -> SensorKind;

    /// 7-bit bus address the peripheral answers to.
    fn address(&self) -> u8;

    /// The controller wrote `bytes` in a single transfer.
    fn on_write(&mut self, bytes: &[u8]);

    /// The controller started a read; returns the bytes to transmit.
    ///
    /// The controller decides how many of them it clocks out. An empty slice
    /// means the peripheral has nothing to say.
    fn on_read_request(&mut self) -> &[u8];

    /// Set the temperature the peripheral reports, in °C.
    fn set_temperature(&mut self, celsius: f64);

    /// Set the relative humidity the peripheral reports, in %.
    ///
    /// Values outside `0..=100` are clamped.
    fn set_humidity(&mut self, percent: f64);

    /// Temperature a controller would compute from the current registers, in °C.
    fn temperature(&self) -> f64;

    /// Relative humidity a controller would compute from the current registers, in %.
    fn humidity(&self) -> f64;
}
