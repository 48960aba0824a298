//! Bosch BME280 emulation.
//!
//! The BME280 is a memory-mapped I2C device. A write transfer starts with a register
//! address, and each following byte pair is another address and a value to store
//! there. A read transfer returns registers starting at the last address written.
//!
//! Temperature and humidity are written to the data registers by inverting the
//! datasheet compensation formulas against the calibration terms held in the same
//! register file (see [`calibration`]). Pressure is a fixed raw value.
//!
//! # Encoding order
//!
//! Humidity compensation depends on temperature through `t_fine`, on the real chip
//! as well as here. [`Bme280::set_humidity`] derives `t_fine` from whatever raw
//! temperature is currently stored, so set the temperature first whenever both
//! change. Setting humidity before any temperature has been set is allowed and
//! uses the power-on "skipped" temperature value, which is about 23 °C for the
//! captured calibration.

pub mod calibration;
pub mod registers;

use calibration::Calibration;
use registers::*;

use crate::config::{Bme280Config, WritePolicy};
use crate::{Peripheral, RegisterFile, SensorKind};

/// Bus protocol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No address has been written since start-up; reads start at 0x00.
    Idle,
    /// A register address has been latched by a write.
    AddressLatched,
}

/// Emulated BME280.
#[derive(Debug, Clone)]
pub struct Bme280 {
    address: u8,
    registers: RegisterFile,
    write_policy: WritePolicy,
    state: BusState,
}

impl Default for Bme280 {
    fn default() -> Self {
        Self::new()
    }
}

impl Bme280 {
    /// Captured register contents with the fixed pressure value, at address 0x76.
    ///
    /// Temperature and humidity registers hold the power-on pattern until set.
    pub fn new() -> Self {
        let mut registers = RegisterFile::from_snapshot(SNAPSHOT);
        let [_, msb, lsb, xlsb] = RAW_PRESSURE.to_be_bytes();
        registers.write_slice(PRESS_DATA, &[msb, lsb, xlsb]);
        Self {
            address: SensorKind::Bme280.default_address(),
            registers,
            write_policy: WritePolicy::default(),
            state: BusState::Idle,
        }
    }

    /// Emulator set up from `config`, with its start-up values encoded.
    pub fn with_config(config: &Bme280Config) -> Self {
        let mut bme = Self::new();
        bme.address = config.address;
        bme.write_policy = config.write_policy;
        bme.set_temperature(config.temperature);
        bme.set_humidity(config.humidity);
        bme
    }

    /// The full register file.
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Current bus protocol state.
    pub fn bus_state(&self) -> BusState {
        self.state
    }

    /// Calibration terms as currently stored in the register file.
    pub fn calibration(&self) -> Calibration {
        Calibration::from_registers(&self.registers)
    }

    /// Raw 20-bit temperature ADC value in the data registers.
    pub fn adc_t(&self) -> i32 {
        Self::adc_20_bit(self.registers.read_array(TEMP_DATA))
    }

    /// Raw 20-bit pressure ADC value in the data registers.
    pub fn adc_p(&self) -> i32 {
        Self::adc_20_bit(self.registers.read_array(PRESS_DATA))
    }

    /// Raw 16-bit humidity ADC value in the data registers.
    pub fn adc_h(&self) -> i32 {
        i32::from(u16::from_be_bytes(self.registers.read_array(HUM_DATA)))
    }

    /// Fine temperature derived from the stored raw temperature.
    pub fn t_fine(&self) -> i32 {
        self.calibration().t_fine(self.adc_t())
    }

    /// Pressure a controller would compute, in Pa.
    pub fn pressure(&self) -> f64 {
        let calibration = self.calibration();
        let t_fine = calibration.t_fine(self.adc_t());
        f64::from(calibration.compensate_pressure(self.adc_p(), t_fine)) / 256.0
    }

    /// Data registers hold the 20-bit ADC value MSB first, left-aligned in 24 bits.
    fn adc_20_bit([msb, lsb, xlsb]: [u8; 3]) -> i32 {
        (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4)
    }

    /// Apply a bus write to a single register.
    fn write_register(&mut self, register: u8, value: u8) {
        if self.write_policy == WritePolicy::ControlRegistersOnly && !WRITABLE.contains(&register)
        {
            warn!("BME280: dropped write of {:#x} to read-only {:#x}", value, register);
            return;
        }

        if register == SOFT_RESET {
            if value == SOFT_RESET_WORD {
                log::debug!("BME280: soft reset");
                self.soft_reset();
            }
            // The reset register always reads back as zero.
            return;
        }

        log::trace!("BME280: register {register:#04x} <- {value:#04x}");
        self.registers.set(register, value);
    }

    /// Return the control and status registers to their power-on values.
    ///
    /// Calibration and data registers are left alone: the real chip reloads the
    /// former from NVM and the latter are only meaningful after a measurement.
    fn soft_reset(&mut self) {
        for register in [CTRL_HUM, STATUS, CTRL_MEAS, CONFIG] {
            self.registers.set(register, 0x00);
        }
    }
}

impl Peripheral for Bme280 {
    fn kind(&self) -> SensorKind {
        SensorKind::Bme280
    }

    fn address(&self) -> u8 {
        self.address
    }

    /// Even-indexed bytes latch the register address, odd-indexed bytes are written
    /// to the latched register.
    ///
    /// A single byte just sets the address for the read that follows.
    fn on_write(&mut self, bytes: &[u8]) {
        for pair in bytes.chunks(2) {
            let register = pair[0];
            self.registers.latch_address(register);
            self.state = BusState::AddressLatched;
            if let Some(&value) = pair.get(1) {
                self.write_register(register, value);
            }
        }
        log::debug!("BME280: address latched at {:#04x}", self.registers.address());
    }

    /// Everything from the latched address to 0xFF, or the whole register space
    /// if no address has been written yet.
    ///
    /// The controller doesn't say how much it wants, so the rest of the register
    /// space is offered and it clocks out as many bytes as it needs.
    fn on_read_request(&mut self) -> &[u8] {
        match self.state {
            BusState::Idle => self.registers.as_bytes(),
            BusState::AddressLatched => self.registers.window(),
        }
    }

    fn set_temperature(&mut self, celsius: f64) {
        let adc_t = self.calibration().encode_temperature(celsius);
        // The low four bits of the xlsb register are unused.
        let [_, msb, lsb, xlsb] = (adc_t << 4).to_be_bytes();
        self.registers.write_slice(TEMP_DATA, &[msb, lsb, xlsb]);
        log::debug!("BME280: temperature {celsius} °C encoded as adc_T {adc_t}");
    }

    fn set_humidity(&mut self, percent: f64) {
        let calibration = self.calibration();
        let t_fine = calibration.t_fine(self.adc_t());
        let adc_h = calibration.encode_humidity(percent, t_fine);
        self.registers.write_slice(HUM_DATA, &adc_h.to_be_bytes());
        log::debug!("BME280: humidity {percent} % encoded as adc_H {adc_h} (t_fine {t_fine})");
    }

    fn temperature(&self) -> f64 {
        let (_, centi_celsius) = self.calibration().compensate_temperature(self.adc_t());
        f64::from(centi_celsius) / 100.0
    }

    fn humidity(&self) -> f64 {
        let calibration = self.calibration();
        let t_fine = calibration.t_fine(self.adc_t());
        f64::from(calibration.compensate_humidity(self.adc_h(), t_fine)) / 1024.0
    }
}
