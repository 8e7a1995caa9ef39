//! Factory calibration coefficients and the fixed-point compensation formula.
//!
//! The BMP280 ships with per-device trim values in registers 0x88–0x9F that
//! compensate manufacturing variance (Bosch BMP280 datasheet BST-BMP280-DS001
//! rev 1.26, §3.11 and appendix 8.2). Raw ADC values are meaningless without
//! them, so the driver loads this block once before the first sample.

/// Factory-trimmed calibration coefficients (dig_T* and dig_P*).
///
/// Loaded from the 24-byte block at 0x88, little-endian. `dig_t1` and
/// `dig_p1` are unsigned, all other fields signed; the per-field types are
/// fixed here so a signedness mistake cannot silently corrupt readings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Temperature coefficient 1 (unsigned, typical ~27000–28000)
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    /// Pressure coefficient 1 (unsigned, typical ~30000–37000)
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    /// Decodes the raw 24-byte calibration block read from 0x88.
    pub fn from_bytes(buffer: &[u8; 24]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([buffer[0], buffer[1]]),
            dig_t2: i16::from_le_bytes([buffer[2], buffer[3]]),
            dig_t3: i16::from_le_bytes([buffer[4], buffer[5]]),
            dig_p1: u16::from_le_bytes([buffer[6], buffer[7]]),
            dig_p2: i16::from_le_bytes([buffer[8], buffer[9]]),
            dig_p3: i16::from_le_bytes([buffer[10], buffer[11]]),
            dig_p4: i16::from_le_bytes([buffer[12], buffer[13]]),
            dig_p5: i16::from_le_bytes([buffer[14], buffer[15]]),
            dig_p6: i16::from_le_bytes([buffer[16], buffer[17]]),
            dig_p7: i16::from_le_bytes([buffer[18], buffer[19]]),
            dig_p8: i16::from_le_bytes([buffer[20], buffer[21]]),
            dig_p9: i16::from_le_bytes([buffer[22], buffer[23]]),
        }
    }

    /// Compensates a raw 20-bit temperature ADC value (datasheet §3.11.3).
    ///
    /// Returns `(t_fine, centi_celsius)`:
    /// - `t_fine` is the intermediate fine-resolution temperature shared with
    ///   the pressure formula
    /// - `centi_celsius` is the temperature in 0.01 °C steps (2508 = 25.08 °C)
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let var1 = (((adc_t >> 3) - ((self.dig_t1 as i32) << 1)) * (self.dig_t2 as i32)) >> 11;
        let var2 = (((((adc_t >> 4) - (self.dig_t1 as i32))
            * ((adc_t >> 4) - (self.dig_t1 as i32)))
            >> 12)
            * (self.dig_t3 as i32))
            >> 14;

        let t_fine = var1 + var2;
        (t_fine, (t_fine * 5 + 128) >> 8)
    }

    /// Compensates a raw 20-bit pressure ADC value using `t_fine` (datasheet
    /// §3.11.3, 64-bit variant).
    ///
    /// The intermediates overflow 32 bits, so the whole computation runs in
    /// i64. Returns pressure in Q24.8 fixed point Pa (25767233 represents
    /// 25767233 / 256 = 100653.25 Pa); divide by 25600.0 for hPa.
    ///
    /// Returns 0 when the divisor term collapses to zero (invalid trim data
    /// or out-of-range input). 0 is an in-band "no valid pressure" sentinel,
    /// distinct from any legitimate reading.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> i64 {
        let mut var1 = (t_fine as i64) - 128000;
        let mut var2 = var1 * var1 * (self.dig_p6 as i64);
        var2 += (var1 * (self.dig_p5 as i64)) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * (self.dig_p3 as i64)) >> 8) + ((var1 * (self.dig_p2 as i64)) << 12);
        var1 = (((1i64 << 47) + var1) * (self.dig_p1 as i64)) >> 33;

        if var1 == 0 {
            return 0; // avoid division by zero
        }

        let mut p = 1_048_576 - (adc_p as i64);
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = ((self.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
        var2 = ((self.dig_p8 as i64) * p) >> 19;
        ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Representative trim set from the Bosch datasheet, appendix 8.2.
    fn datasheet_calibration() -> Calibration {
        Calibration {
            dig_t1: 27504,
            dig_t2: 26435,
            dig_t3: -1000,
            dig_p1: 36477,
            dig_p2: -10685,
            dig_p3: 3024,
            dig_p4: 2855,
            dig_p5: 140,
            dig_p6: -7,
            dig_p7: 15500,
            dig_p8: -14600,
            dig_p9: 6000,
        }
    }

    const DATASHEET_CALIB_BLOCK: [u8; 24] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C,
        0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    ];

    #[test]
    fn decode_applies_per_field_signedness() {
        let calib = Calibration::from_bytes(&DATASHEET_CALIB_BLOCK);
        assert_eq!(calib, datasheet_calibration());
        // dig_t1/dig_p1 are unsigned even when the high bit is set
        let mut block = DATASHEET_CALIB_BLOCK;
        block[1] = 0xFF;
        block[7] = 0xFF;
        let calib = Calibration::from_bytes(&block);
        assert!(calib.dig_t1 > 0xFF00);
        assert!(calib.dig_p1 > 0xFF00);
        assert!(calib.dig_t3 < 0);
        assert!(calib.dig_p8 < 0);
    }

    #[test]
    fn decode_is_idempotent() {
        assert_eq!(
            Calibration::from_bytes(&DATASHEET_CALIB_BLOCK),
            Calibration::from_bytes(&DATASHEET_CALIB_BLOCK)
        );
    }

    #[test]
    fn temperature_matches_datasheet_example() {
        let (t_fine, centi) = datasheet_calibration().compensate_temperature(519888);
        assert_eq!(t_fine, 128422);
        assert_eq!(centi, 2508); // 25.08 degC
    }

    #[test]
    fn pressure_matches_datasheet_example() {
        let calib = datasheet_calibration();
        let (t_fine, _) = calib.compensate_temperature(519888);
        let q24_8 = calib.compensate_pressure(415148, t_fine);
        assert_eq!(q24_8, 25767233); // 100653.25 Pa = 1006.5325 hPa
    }

    #[test]
    fn zero_p1_returns_sentinel_without_dividing() {
        let mut calib = datasheet_calibration();
        calib.dig_p1 = 0;
        let (t_fine, _) = calib.compensate_temperature(519888);
        assert_eq!(calib.compensate_pressure(415148, t_fine), 0);
    }
}
