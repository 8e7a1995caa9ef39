//! Altitude derivation from a stored pressure/temperature baseline.
//!
//! The hypsometric form of the barometric formula relates the ratio between
//! the current pressure and a reference pressure to the height difference
//! from the reference point, assuming a constant temperature lapse rate in
//! the troposphere.

/// Standard tropospheric temperature lapse rate, K/m.
const LAPSE_RATE: f32 = 0.0065;
/// Universal gas constant, J/(mol·K).
const GAS_CONSTANT: f32 = 8.314;
/// Standard gravity, m/s².
const GRAVITY: f32 = 9.80665;
/// Molar mass of dry air, kg/mol.
const MOLAR_MASS_AIR: f32 = 0.028964;

/// Exponent of the pressure ratio in the barometric formula, ≈ 0.190259.
const PRESSURE_RATIO_EXPONENT: f32 = (GAS_CONSTANT * LAPSE_RATE) / (GRAVITY * MOLAR_MASS_AIR);

/// Reference point the altitude computation is anchored to.
///
/// `p0`/`t0` capture the conditions at a known altitude `offset`; subsequent
/// pressure readings are converted to height relative to that point.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Baseline {
    /// Reference pressure, hPa
    pub p0: f32,
    /// Reference temperature, K
    pub t0: f32,
    /// Altitude of the reference point, m
    pub offset: f32,
}

impl Baseline {
    /// Builds a baseline from a calibrated reading taken at a known altitude.
    pub fn new(pressure_hpa: f32, temperature_celsius: f32, offset: f32) -> Self {
        Self {
            p0: pressure_hpa,
            t0: temperature_celsius + 273.15,
            offset,
        }
    }

    /// Altitude in metres for the given pressure, relative to sea level when
    /// the baseline offset is the reference point's absolute altitude.
    pub fn altitude(&self, pressure_hpa: f32) -> f32 {
        self.offset
            + (self.t0 / LAPSE_RATE)
                * (1.0 - libm::powf(pressure_hpa / self.p0, PRESSURE_RATIO_EXPONENT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_at_reference_pressure_is_the_offset() {
        let baseline = Baseline::new(1013.25, 15.0, 0.0);
        assert!(baseline.altitude(1013.25).abs() < 1e-3);

        let offset = Baseline::new(1013.25, 15.0, 452.5);
        assert!((offset.altitude(1013.25) - 452.5).abs() < 1e-3);
    }

    #[test]
    fn pressure_drop_raises_altitude() {
        // 5 hPa below a 1013.25 hPa / 288.15 K baseline is about 41.7 m up
        let baseline = Baseline::new(1013.25, 15.0, 0.0);
        let altitude = baseline.altitude(1008.25);
        assert!((altitude - 41.70).abs() < 0.05);
        assert!(baseline.altitude(1018.25) < 0.0);
    }

    #[test]
    fn kelvin_conversion_applied_to_reference_temperature() {
        let baseline = Baseline::new(1000.0, 25.08, 0.0);
        assert!((baseline.t0 - 298.23).abs() < 1e-3);
    }
}
