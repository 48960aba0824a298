#![doc = include_str!("../README.md")]
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod bme280;
pub mod bus;
mod checksum;
pub mod config;
pub mod control;
mod error;
mod peripheral;
pub mod quadratic;
mod register_file;
pub mod sensirion;

pub use bme280::Bme280;
pub use bus::EmulatedBus;
pub use checksum::crc8;
pub use error::Error;
pub use peripheral::{Peripheral, SensorKind};
pub use register_file::{REGISTER_COUNT, RegisterFile};
pub use sensirion::{Sht31, Sht4x};
