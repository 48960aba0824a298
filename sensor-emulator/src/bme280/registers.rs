//! BME280 register map.
//!
//! See section 5.3 and table 18 of the BME280 datasheet (BST-BME280-DS002).
#![allow(missing_docs)]

use crate::register_file::REGISTER_COUNT;

pub const DIG_T1: u8 = 0x88;
pub const DIG_T2: u8 = 0x8A;
pub const DIG_T3: u8 = 0x8C;
pub const DIG_P1: u8 = 0x8E;
pub const DIG_P2: u8 = 0x90;
pub const DIG_P3: u8 = 0x92;
pub const DIG_P4: u8 = 0x94;
pub const DIG_P5: u8 = 0x96;
pub const DIG_P6: u8 = 0x98;
pub const DIG_P7: u8 = 0x9A;
pub const DIG_P8: u8 = 0x9C;
pub const DIG_P9: u8 = 0x9E;
pub const DIG_H1: u8 = 0xA1;
pub const DIG_H2: u8 = 0xE1;
pub const DIG_H3: u8 = 0xE3;
pub const DIG_H4: u8 = 0xE4;
pub const DIG_H5: u8 = 0xE5;
pub const DIG_H6: u8 = 0xE7;

/// Always reads 0x60 on a BME280.
pub const CHIP_ID: u8 = 0xD0;
pub const SOFT_RESET: u8 = 0xE0;
pub const CTRL_HUM: u8 = 0xF2;
pub const STATUS: u8 = 0xF3;
pub const CTRL_MEAS: u8 = 0xF4;
pub const CONFIG: u8 = 0xF5;
pub const PRESS_DATA: u8 = 0xF7;
pub const TEMP_DATA: u8 = 0xFA;
pub const HUM_DATA: u8 = 0xFD;

/// Value that triggers a power-on-reset when written to [`SOFT_RESET`].
pub const SOFT_RESET_WORD: u8 = 0xB6;

/// Registers a real BME280 accepts writes to.
pub const WRITABLE: [u8; 4] = [SOFT_RESET, CTRL_HUM, CTRL_MEAS, CONFIG];

/// Raw pressure ADC value reported in place of a measurement.
///
/// Close to one atmosphere, but pressure compensation depends on temperature, so
/// a controller will not see exactly 1013.25 hPa.
pub const RAW_PRESSURE: u32 = 0x539BA0;

/// Register dump of a real BME280.
///
/// The data registers still hold the "measurement skipped" pattern 0x80_0000.
#[rustfmt::skip]
pub const SNAPSHOT: [u8; REGISTER_COUNT] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x00
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x10
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x20
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x30
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x40
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x50
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x60
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x70
    0x8D, 0x71, 0x89, 0x6B, 0x9E, 0x44, 0xF5, 0x06, 0x26, 0x6E, 0x03, 0x67, 0x32, 0x00, 0xA0, 0x8E, // 0x80
    0x5A, 0xD6, 0xD0, 0x0B, 0x0A, 0x1E, 0xDB, 0xFF, 0xF9, 0xFF, 0xAC, 0x26, 0x0A, 0xD8, 0xBD, 0x10, // 0x90
    0x00, 0x4B, 0xFA, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x33, 0x00, 0x00, 0xC0, // 0xA0
    0x00, 0x54, 0x00, 0x00, 0x00, 0x00, 0x60, 0x02, 0x00, 0x01, 0xFF, 0xFF, 0x1F, 0x60, 0x03, 0x00, // 0xB0
    0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0xC0
    0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0xD0
    0x00, 0x73, 0x01, 0x00, 0x12, 0x29, 0x03, 0x1E, 0xCA, 0x41, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // 0xE0
    0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x80, 0x00, 0x00, 0x80, 0x00, 0x80, // 0xF0
];
