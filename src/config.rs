use crate::registers::{Register, RESET_VALUE};

/// Oversampling setting for pressure (osrs_p[2:0] in ctrl_meas 0xF4, bits 4:2).
///
/// Higher oversampling improves resolution and RMS noise at the cost of
/// power and conversion time (datasheet Table 15): ×1 ≈ 3.3 Pa RMS / 6 ms up
/// to ×16 ≈ 1.3 Pa RMS / 66 ms.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PressureOversampling {
    X1 = 0x04,
    X2 = 0x08,
    X4 = 0x0C,
    X8 = 0x10,
    X16 = 0x14,
}

/// Oversampling setting for temperature (osrs_t[2:0] in ctrl_meas 0xF4, bits 7:5).
///
/// Even ×1 is usually accurate enough for pressure compensation; the raw
/// temperature conversion always runs before pressure in a measurement cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TemperatureOversampling {
    X1 = 0x20,
    X2 = 0x40,
    X4 = 0x60,
    X8 = 0x80,
    X16 = 0xA0,
}

/// Power mode (mode[1:0] in ctrl_meas 0xF4, bits 1:0).
///
/// Sleep takes no measurements, Forced runs one cycle then returns to sleep,
/// Normal cycles continuously with the configured standby time between
/// conversions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    Sleep = 0x0,
    Forced = 0x1,
    Normal = 0x3,
}

/// IIR filter coefficient (filter[2:0] in config 0xF5, bits 4:2).
///
/// Smooths short-term pressure fluctuations (wind, door slams). Higher
/// coefficient means stronger smoothing and slower step response. The filter
/// state persists across sleep/forced cycles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IirFilter {
    Off = 0x00,
    X2 = 0x04,
    X4 = 0x08,
    X8 = 0x0C,
    X16 = 0x10,
}

/// Standby duration between conversions in Normal mode (t_sb[2:0] in config
/// 0xF5, bits 7:5). Shorter standby gives a higher data rate and higher
/// average power draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StandbyTime {
    Ms0_5 = 0x00,
    Ms62_5 = 0x20,
    Ms125 = 0x40,
    Ms250 = 0x60,
    Ms500 = 0x80,
    Ms1000 = 0xA0,
    Ms2000 = 0xC0,
    Ms4000 = 0xE0,
}

/// Typed measurement configuration for the two control registers.
///
/// Every field maps to a fixed bit group, so an invalid register value is
/// unrepresentable. [`Config::default`] encodes temperature ×2 / pressure ×16
/// oversampling in Normal mode with the IIR filter at ×16 and no standby,
/// i.e. the register values 0x57 (ctrl_meas) and 0x10 (config).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub temperature_oversampling: TemperatureOversampling,
    pub pressure_oversampling: PressureOversampling,
    pub power_mode: PowerMode,
    pub iir_filter: IirFilter,
    pub standby_time: StandbyTime,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temperature_oversampling: TemperatureOversampling::X2,
            pressure_oversampling: PressureOversampling::X16,
            power_mode: PowerMode::Normal,
            iir_filter: IirFilter::X16,
            standby_time: StandbyTime::Ms0_5,
        }
    }
}

impl Config {
    pub fn with_temperature_oversampling(mut self, t: TemperatureOversampling) -> Self {
        self.temperature_oversampling = t;
        self
    }

    pub fn with_pressure_oversampling(mut self, p: PressureOversampling) -> Self {
        self.pressure_oversampling = p;
        self
    }

    pub fn with_power_mode(mut self, mode: PowerMode) -> Self {
        self.power_mode = mode;
        self
    }

    pub fn with_iir_filter(mut self, iir: IirFilter) -> Self {
        self.iir_filter = iir;
        self
    }

    pub fn with_standby_time(mut self, standby: StandbyTime) -> Self {
        self.standby_time = standby;
        self
    }

    /// `[register, value]` pair for the ctrl_meas register (0xF4).
    pub fn ctrl_meas(&self) -> [u8; 2] {
        [
            Register::CtrlMeas as u8,
            self.temperature_oversampling as u8
                | self.pressure_oversampling as u8
                | self.power_mode as u8,
        ]
    }

    /// `[register, value]` pair for the config register (0xF5).
    pub fn config(&self) -> [u8; 2] {
        [
            Register::Config as u8,
            self.standby_time as u8 | self.iir_filter as u8,
        ]
    }

    /// `[register, value]` pair triggering a complete power-on reset.
    pub fn reset() -> [u8; 2] {
        [Register::Reset as u8, RESET_VALUE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_canonical_register_values() {
        let cfg = Config::default();
        assert_eq!(cfg.ctrl_meas(), [0xF4, 0x57]);
        assert_eq!(cfg.config(), [0xF5, 0x10]);
    }

    #[test]
    fn reset_pair_targets_reset_register() {
        assert_eq!(Config::reset(), [0xE0, 0xB6]);
    }

    #[test]
    fn builder_overrides_single_fields() {
        let cfg = Config::default()
            .with_power_mode(PowerMode::Forced)
            .with_iir_filter(IirFilter::Off)
            .with_standby_time(StandbyTime::Ms1000);
        assert_eq!(cfg.ctrl_meas(), [0xF4, 0x55]);
        assert_eq!(cfg.config(), [0xF5, 0xA0]);
    }
}
