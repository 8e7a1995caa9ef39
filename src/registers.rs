/// BMP280 register map (Bosch Sensortec BMP280 datasheet, revision 1.26).
///
/// All addresses are 8-bit (the 7-bit I²C slave address and R/W bit are
/// handled by the HAL). The register pointer auto-increments, so contiguous
/// ranges can be read in a single burst transaction:
///
/// - **Measurement results** - 0xF7–0xFC (6 bytes): pressure (20-bit) +
///   temperature (20-bit)
/// - **Control registers** - 0xF4 (oversampling + mode), 0xF5 (IIR + standby)
/// - **Status** - 0xF3 (measuring / NVM-copy bits)
/// - **Reset & ID** - 0xE0 (soft reset), 0xD0 (chip ID)
/// - **Calibration** - 0x88–0x9F (24 bytes, read-only, factory trimmed)
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Register {
    TempMsb = 0xFA,
    PressMsb = 0xF7,
    Config = 0xF5,
    CtrlMeas = 0xF4,
    // bit 3 - conversion running, bit 0 - NVM copy in progress
    Status = 0xF3,
    // If 0xB6 is written to the register, the device is reset using the
    // complete power-on-reset procedure
    Reset = 0xE0,
    // Chip identification number
    // Must be 0x58 after start up
    Id = 0xD0,
    // Calibration values start address
    CalibStart = 0x88,
}

pub const RESET_VALUE: u8 = 0xB6;
pub const CHIP_ID: u8 = 0x58;

/// I²C address when the SDO strap pin is pulled to GND.
pub const PRIMARY_ADDRESS: u8 = 0x76;
/// I²C address when the SDO strap pin is pulled high.
pub const SECONDARY_ADDRESS: u8 = 0x77;

/// Bit 3 of the status register: a pressure/temperature conversion is running.
pub const STATUS_MEASURING: u8 = 0x08;
