//! Factory calibration terms and the compensation formulas, run in both directions.
//!
//! The forward direction is the datasheet's integer compensation (section 4.2.3 and
//! appendix 8.2 of the BME280 datasheet): what a controller computes from the raw
//! ADC registers. The reverse direction turns a physical value into the raw ADC value
//! that makes the forward formula produce it.

use bit_field::BitField;

use super::registers::*;
use crate::RegisterFile;
use crate::quadratic::{self, Root};

/// Largest raw temperature or pressure ADC value (20 bits).
const ADC_20_BIT_MAX: f64 = 0xF_FFFF as f64;

/// The `t_fine` value at which humidity compensation is centred (15 °C).
const T_FINE_HUMIDITY_ORIGIN: f64 = 76_800.0;

/// Calibration terms decoded from the register file.
///
/// Field names match the datasheet (`dig_T1` and so on). Table 16 of the datasheet
/// gives the register layout and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// Temperature term 1, unsigned.
    pub dig_t1: u16,
    /// Temperature term 2.
    pub dig_t2: i16,
    /// Temperature term 3.
    pub dig_t3: i16,
    /// Pressure term 1, unsigned.
    pub dig_p1: u16,
    /// Pressure terms 2 to 9, in order.
    pub dig_p: [i16; 8],
    /// Humidity term 1, unsigned.
    pub dig_h1: u8,
    /// Humidity term 2.
    pub dig_h2: i16,
    /// Humidity term 3, unsigned.
    pub dig_h3: u8,
    /// Humidity term 4, 12 bits packed across 0xE4 and the low nibble of 0xE5.
    pub dig_h4: i16,
    /// Humidity term 5, 12 bits packed across the high nibble of 0xE5 and 0xE6.
    pub dig_h5: i16,
    /// Humidity term 6.
    pub dig_h6: i8,
}

impl Calibration {
    /// Decode the calibration terms currently stored in `registers`.
    pub fn from_registers(registers: &RegisterFile) -> Self {
        let dig_h4 = (i16::from(registers.get(DIG_H4) as i8) << 4)
            | i16::from(registers.get(DIG_H4 + 1).get_bits(0..4));
        let dig_h5 = (i16::from(registers.get(DIG_H5 + 1) as i8) << 4)
            | i16::from(registers.get(DIG_H5).get_bits(4..8));

        Self {
            dig_t1: registers.u16_le(DIG_T1),
            dig_t2: registers.i16_le(DIG_T2),
            dig_t3: registers.i16_le(DIG_T3),
            dig_p1: registers.u16_le(DIG_P1),
            dig_p: [DIG_P2, DIG_P3, DIG_P4, DIG_P5, DIG_P6, DIG_P7, DIG_P8, DIG_P9]
                .map(|register| registers.i16_le(register)),
            dig_h1: registers.get(DIG_H1),
            dig_h2: registers.i16_le(DIG_H2),
            dig_h3: registers.get(DIG_H3),
            dig_h4,
            dig_h5,
            dig_h6: registers.get(DIG_H6) as i8,
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Physical value -> raw ADC
    ////////////////////////////////////////////////////////////////////////////////

    /// Raw 20-bit temperature ADC value that compensates to `celsius`.
    ///
    /// The floating-point compensation formula is
    ///
    /// ```text
    /// var1 = (adc_T / 16384 - T1 / 1024) * T2
    /// var2 = (adc_T / 131072 - T1 / 8192)² * T3
    /// T    = (var1 + var2) / 5120
    /// ```
    ///
    /// which is a quadratic in `adc_T`. The larger root is the one in the ADC range.
    /// The result is clamped to 20 bits.
    pub fn encode_temperature(&self, celsius: f64) -> u32 {
        let t1 = f64::from(self.dig_t1);
        let t2 = f64::from(self.dig_t2);
        let t3 = f64::from(self.dig_t3);

        let a = t3 / (131_072.0 * 131_072.0);
        let b = t2 / 16_384.0 - 2.0 * t1 * t3 / 131_072.0 / 8_192.0;
        let c = (t1 / 8_192.0) * (t1 / 8_192.0) * t3 - t1 * t2 / 1_024.0 - celsius * 5_120.0;

        let adc_t = quadratic::solve(a, b, c, Root::Max);
        adc_t.clamp(0.0, ADC_20_BIT_MAX) as u32
    }

    /// Raw 16-bit humidity ADC value that compensates to `percent` at `t_fine`.
    ///
    /// `percent` is clamped to `0..=100`. With
    ///
    /// ```text
    /// c1 = t_fine - 76800
    /// c2 = H4 * 64 + H5 / 16384 * c1
    /// c3 = H2 / 65536 * (1 + H6 / 67108864 * c1 * (1 + H3 / 67108864 * c1))
    /// x  = (adc_H - c2) * c3
    /// ```
    ///
    /// the datasheet gives `H = x * (1 - H1 * x / 524288)`. Solving for `x` takes the
    /// smaller root (the larger is thousands of percent), then `adc_H = (x + c2·c3) / c3`.
    pub fn encode_humidity(&self, percent: f64, t_fine: i32) -> u16 {
        let percent = percent.clamp(0.0, 100.0);
        let h1 = f64::from(self.dig_h1);
        let h2 = f64::from(self.dig_h2);
        let h3 = f64::from(self.dig_h3);
        let h4 = f64::from(self.dig_h4);
        let h5 = f64::from(self.dig_h5);
        let h6 = f64::from(self.dig_h6);

        let c1 = f64::from(t_fine) - T_FINE_HUMIDITY_ORIGIN;
        let c2 = h4 * 64.0 + h5 / 16_384.0 * c1;
        let c3 = h2 / 65_536.0 * (1.0 + h6 / 67_108_864.0 * c1 * (1.0 + h3 / 67_108_864.0 * c1));
        let c4 = c2 * c3;

        let x = quadratic::solve(-h1 / 524_288.0, 1.0, -percent, Root::Min);
        let adc_h = if c3 == 0.0 { c2 } else { (x + c4) / c3 };
        adc_h.clamp(0.0, f64::from(u16::MAX)) as u16
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Raw ADC -> physical value (datasheet integer compensation)
    ////////////////////////////////////////////////////////////////////////////////

    /// Fine temperature used by the humidity and pressure formulas.
    ///
    /// This is the chip's own 32-bit integer arithmetic, overflow behaviour included.
    pub fn t_fine(&self, adc_t: i32) -> i32 {
        let t1 = i32::from(self.dig_t1);
        let t2 = i32::from(self.dig_t2);
        let t3 = i32::from(self.dig_t3);

        let var1 = ((adc_t >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
        let delta = (adc_t >> 4).wrapping_sub(t1);
        let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;
        var1.wrapping_add(var2)
    }

    /// Compensated temperature in hundredths of a degree, with its `t_fine`.
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let t_fine = self.t_fine(adc_t);
        (t_fine, t_fine.wrapping_mul(5).wrapping_add(128) >> 8)
    }

    /// Compensated relative humidity in %RH as unsigned Q22.10 (47445 is 46.333 %RH).
    pub fn compensate_humidity(&self, adc_h: i32, t_fine: i32) -> u32 {
        let adc_h = i64::from(adc_h);
        let h1 = i64::from(self.dig_h1);
        let h2 = i64::from(self.dig_h2);
        let h3 = i64::from(self.dig_h3);
        let h4 = i64::from(self.dig_h4);
        let h5 = i64::from(self.dig_h5);
        let h6 = i64::from(self.dig_h6);

        let v = i64::from(t_fine) - 76_800;
        let scaled = ((adc_h << 14) - (h4 << 20) - h5 * v + 16_384) >> 15;
        let gain = (((((v * h6) >> 10) * (((v * h3) >> 11) + 32_768)) >> 10) + 2_097_152) * h2
            + 8_192;
        let v = scaled * (gain >> 14);
        let v = v - ((((v >> 15) * (v >> 15)) >> 7) * h1 >> 4);
        let v = v.clamp(0, 419_430_400);
        (v >> 12) as u32
    }

    /// Compensated pressure in Pa as unsigned Q24.8 (24674867 is 96386.2 Pa).
    ///
    /// Returns 0 where the chip would divide by zero.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> u32 {
        let [p2, p3, p4, p5, p6, p7, p8, p9] = self.dig_p.map(i64::from);
        let p1 = i64::from(self.dig_p1);

        let mut var1 = i64::from(t_fine) - 128_000;
        let mut var2 = var1 * var1 * p6;
        var2 += (var1 * p5) << 17;
        var2 += p4 << 35;
        var1 = ((var1 * var1 * p3) >> 8) + ((var1 * p2) << 12);
        var1 = (((1_i64 << 47) + var1) * p1) >> 33;
        if var1 == 0 {
            return 0;
        }
        let mut p = 1_048_576 - i64::from(adc_p);
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = (p9 * (p >> 13) * (p >> 13)) >> 25;
        var2 = (p8 * p) >> 19;
        p = ((p + var1 + var2) >> 8) + (p7 << 4);
        p as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Calibration {
        Calibration::from_registers(&RegisterFile::from_snapshot(SNAPSHOT))
    }

    #[test]
    fn decodes_captured_calibration() {
        let calibration = snapshot();
        assert_eq!(calibration.dig_t1, 28198);
        assert_eq!(calibration.dig_t2, 26371);
        assert_eq!(calibration.dig_t3, 50);
        assert_eq!(calibration.dig_h1, 75);
        assert_eq!(calibration.dig_h2, 371);
        assert_eq!(calibration.dig_h3, 0);
        assert_eq!(calibration.dig_h4, 297);
        assert_eq!(calibration.dig_h5, 50);
        assert_eq!(calibration.dig_h6, 30);
    }

    #[test]
    fn packed_humidity_terms_are_sign_extended() {
        let mut registers = RegisterFile::from_snapshot(SNAPSHOT);
        registers.set(DIG_H4, 0xFF);
        registers.set(DIG_H5, 0xF1);
        registers.set(DIG_H5 + 1, 0x80);
        let calibration = Calibration::from_registers(&registers);
        assert_eq!(calibration.dig_h4, -15);
        assert_eq!(calibration.dig_h5, -2033);
    }

    #[test]
    fn zero_degrees_is_exact() {
        let calibration = snapshot();
        let adc_t = calibration.encode_temperature(0.0);
        // Both correction terms vanish at adc_T = 16 * dig_T1.
        assert!(adc_t.abs_diff(16 * u32::from(calibration.dig_t1)) <= 1);
        assert_eq!(calibration.compensate_temperature(adc_t as i32).1, 0);
    }

    #[test]
    fn temperature_is_clamped_to_20_bits() {
        let calibration = snapshot();
        assert_eq!(calibration.encode_temperature(1_000.0), 0xF_FFFF);
        assert_eq!(calibration.encode_temperature(-1_000.0), 0);
    }

    #[test]
    fn humidity_clamps_input() {
        let calibration = snapshot();
        let t_fine = 112_631;
        assert_eq!(
            calibration.encode_humidity(150.0, t_fine),
            calibration.encode_humidity(100.0, t_fine)
        );
        assert_eq!(
            calibration.encode_humidity(-10.0, t_fine),
            calibration.encode_humidity(0.0, t_fine)
        );
    }
}
