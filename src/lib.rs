//! I²C driver for the Bosch BMP280 barometric pressure and temperature
//! sensor, with altitude estimation relative to a calibrated baseline.
//!
//! The driver is generic over the [`embedded-hal`] 1.0 blocking I²C and delay
//! traits, so it runs on any platform with a HAL implementation. Constructing
//! the driver performs the full bring-up sequence: soft reset, chip ID
//! verification, measurement configuration, calibration load, and baseline
//! averaging. A driver value therefore always holds valid calibration data;
//! there is no partially-initialized state to misuse.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! ```rust, ignore
//! use bmp280_baro::Bmp280;
//!
//! // sdo_gnd = true selects I2C address 0x76
//! let mut baro = Bmp280::new(i2c, true, 0.0, delay)?;
//!
//! let reading = baro.read()?;
//! defmt::info!("{} hPa, {} degC", reading.pressure, reading.temperature);
//! let altitude = baro.altitude()?;
//! ```
//!
//! All bus transactions are blocking and never retried: a transport error is
//! fatal to the calling operation and is returned as [`Error::Bus`], since
//! partially-read register state must not be consumed. The calling
//! application serializes access to the driver; there is no internal locking.

#![forbid(unsafe_code)]
#![cfg_attr(not(test), no_std)]

mod altitude;
pub mod calibration;
pub mod config;
pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::altitude::Baseline;
use crate::calibration::Calibration;
use crate::config::Config;
use crate::registers::{
    Register, CHIP_ID, PRIMARY_ADDRESS, SECONDARY_ADDRESS, STATUS_MEASURING,
};

/// Wait after soft reset before the device accepts transactions again.
const RESET_DELAY_MS: u32 = 10;
/// Settling time before baseline sampling, lets the IIR filter converge.
const BASELINE_SETTLE_MS: u32 = 1000;
const BASELINE_SAMPLES: u32 = 10;
const BASELINE_INTERVAL_MS: u32 = 100;

/// Errors during BMP280 bring-up or sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying bus transaction failed. Fatal to the calling
    /// operation; the driver never retries.
    Bus(E),
    /// The chip ID register did not read back 0x58; the device on this
    /// address is not a BMP280.
    ChipIdMismatch(u8),
}

/// One burst-read pair of uncompensated 20-bit ADC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub pressure: u32,
    pub temperature: u32,
}

impl RawSample {
    /// Decodes the 6-byte burst starting at the pressure MSB register:
    /// pressure MSB/LSB/XLSB followed by temperature MSB/LSB/XLSB, each
    /// 20-bit value packed as `(msb << 12) | (lsb << 4) | (xlsb >> 4)`.
    pub fn from_bytes(raw: &[u8; 6]) -> Self {
        fn word(msb: u8, lsb: u8, xlsb: u8) -> u32 {
            ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
        }
        Self {
            pressure: word(raw[0], raw[1], raw[2]),
            temperature: word(raw[3], raw[4], raw[5]),
        }
    }
}

/// A compensated measurement in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Pressure in hPa. Exactly 0.0 signals that compensation was invalid
    /// (the formula's divisor collapsed); treat it as "no valid pressure",
    /// not as a legitimately tiny reading.
    pub pressure: f32,
    /// Temperature in °C.
    pub temperature: f32,
}

/// BMP280 driver instance.
///
/// Owns the bus handle, the device address, the factory calibration, and the
/// altitude baseline as exclusive private state.
pub struct Bmp280<I2C, D> {
    i2c: I2C,
    address: u8,
    delay: D,
    calibration: Calibration,
    baseline: Baseline,
}

impl<I2C: I2c, D: DelayNs> Bmp280<I2C, D> {
    /// Brings up the sensor with the canonical measurement configuration
    /// (ctrl_meas 0x57, config 0x10) and establishes the altitude baseline.
    ///
    /// `sdo_gnd` selects the I²C address: `true` for 0x76 (SDO strapped to
    /// GND), `false` for 0x77. `initial_altitude` is the known altitude of
    /// the baseline point in metres (0.0 for relative altitude).
    ///
    /// Blocks for roughly two seconds: reset settling, a 1 s warm-up, then
    /// ten baseline samples spaced 100 ms apart.
    pub fn new(
        i2c: I2C,
        sdo_gnd: bool,
        initial_altitude: f32,
        delay: D,
    ) -> Result<Self, Error<I2C::Error>> {
        Self::with_config(i2c, sdo_gnd, initial_altitude, delay, Config::default())
    }

    /// Same bring-up sequence as [`Bmp280::new`] with a caller-supplied
    /// measurement configuration.
    pub fn with_config(
        mut i2c: I2C,
        sdo_gnd: bool,
        initial_altitude: f32,
        mut delay: D,
        config: Config,
    ) -> Result<Self, Error<I2C::Error>> {
        let address = if sdo_gnd {
            PRIMARY_ADDRESS
        } else {
            SECONDARY_ADDRESS
        };

        // Soft reset, then verify we are actually talking to a BMP280 before
        // trusting anything read from it.
        i2c.write(address, &Config::reset()).map_err(Error::Bus)?;
        delay.delay_ms(RESET_DELAY_MS);

        let mut chip_id = [0u8; 1];
        i2c.write_read(address, &[Register::Id as u8], &mut chip_id)
            .map_err(Error::Bus)?;
        if chip_id[0] != CHIP_ID {
            return Err(Error::ChipIdMismatch(chip_id[0]));
        }

        let mut driver = Self {
            i2c,
            address,
            delay,
            calibration: Calibration::default(),
            baseline: Baseline::new(0.0, 0.0, 0.0),
        };
        driver.set_config(config)?;
        driver.load_calibration()?;

        driver.delay.delay_ms(BASELINE_SETTLE_MS);
        driver.baseline = driver.average_baseline(initial_altitude)?;
        Ok(driver)
    }

    /// Rewrites the ctrl_meas (0xF4) and config (0xF5) registers.
    pub fn set_config(&mut self, config: Config) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &config.ctrl_meas())
            .map_err(Error::Bus)?;
        self.i2c
            .write(self.address, &config.config())
            .map_err(Error::Bus)
    }

    // Single 24-byte burst read of the trim block. Idempotent: the block is
    // factory-programmed NVM and never changes.
    fn load_calibration(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut buffer = [0u8; 24];
        self.i2c
            .write_read(self.address, &[Register::CalibStart as u8], &mut buffer)
            .map_err(Error::Bus)?;
        self.calibration = Calibration::from_bytes(&buffer);
        Ok(())
    }

    fn average_baseline(&mut self, offset: f32) -> Result<Baseline, Error<I2C::Error>> {
        let mut pressure_sum = 0.0f32;
        let mut temperature_sum = 0.0f32;
        for _ in 0..BASELINE_SAMPLES {
            let reading = self.read()?;
            pressure_sum += reading.pressure;
            temperature_sum += reading.temperature;
            self.delay.delay_ms(BASELINE_INTERVAL_MS);
        }
        Ok(Baseline::new(
            pressure_sum / BASELINE_SAMPLES as f32,
            temperature_sum / BASELINE_SAMPLES as f32,
            offset,
        ))
    }

    /// Burst-reads the six measurement registers starting at 0xF7.
    ///
    /// Pressure and temperature come from one transaction so the pair is
    /// temporally coherent; two separate reads could straddle a measurement
    /// update.
    pub fn read_raw(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[Register::PressMsb as u8], &mut raw)
            .map_err(Error::Bus)?;
        Ok(RawSample::from_bytes(&raw))
    }

    /// Applies the vendor fixed-point compensation formula to a raw sample.
    ///
    /// Pure; uses only the calibration loaded at construction. A returned
    /// pressure of exactly 0.0 means the compensation was invalid.
    pub fn compensate(&self, raw: &RawSample) -> Reading {
        let (t_fine, centi_celsius) = self
            .calibration
            .compensate_temperature(raw.temperature as i32);
        let q24_8 = self
            .calibration
            .compensate_pressure(raw.pressure as i32, t_fine);
        Reading {
            pressure: q24_8 as f32 / 25600.0,
            temperature: centi_celsius as f32 / 100.0,
        }
    }

    /// Reads and compensates one sample.
    pub fn read(&mut self) -> Result<Reading, Error<I2C::Error>> {
        let raw = self.read_raw()?;
        Ok(self.compensate(&raw))
    }

    /// Altitude in metres derived from the current pressure and the stored
    /// baseline via the barometric formula.
    pub fn altitude(&mut self) -> Result<f32, Error<I2C::Error>> {
        let reading = self.read()?;
        Ok(self.baseline.altitude(reading.pressure))
    }

    /// Re-anchors the baseline to `new_altitude` using one fresh sample.
    ///
    /// Lets the caller correct barometric drift from an external absolute
    /// altitude source such as satellite positioning.
    pub fn recalibrate(&mut self, new_altitude: f32) -> Result<(), Error<I2C::Error>> {
        let reading = self.read()?;
        self.baseline = Baseline::new(reading.pressure, reading.temperature, new_altitude);
        Ok(())
    }

    /// Whether a pressure/temperature conversion is currently running
    /// (status register bit 3).
    pub fn is_measuring(&mut self) -> Result<bool, Error<I2C::Error>> {
        let mut status = [0u8; 1];
        self.i2c
            .write_read(self.address, &[Register::Status as u8], &mut status)
            .map_err(Error::Bus)?;
        Ok(status[0] & STATUS_MEASURING != 0)
    }

    /// The calibration block loaded at construction.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Consumes the driver and releases the bus handle.
    pub fn release(self) -> I2C {
        self.i2c
    }
}
