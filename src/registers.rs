use crate::Bmp180;
use embedded_hal::i2c::I2c;

/// 7-bit I2C address of the BMP180
pub const ADDR: u8 = 0x77;

/// Value the chip-id register always reads back as
pub const CHIP_ID: u8 = 0x55;

/// Byte written to [`Register8::SOFT_RESET`] to trigger a power-on-reset sequence
pub const SOFT_RESET_CMD: u8 = 0xB6;

/// 8-bit control and identity registers
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register8 {
    /// Chip identity, fixed to [`CHIP_ID`]
    CHIP_ID = 0xD0,
    /// Soft reset
    ///
    /// Write-only.
    SOFT_RESET = 0xE0,
    /// Measurement control
    ///
    /// See [`crate::flags::CTRL_MEAS`].
    CTRL_MEAS = 0xF4,
    /// Conversion result, most significant byte
    ///
    /// `OUT_LSB` and `OUT_XLSB` follow at `0xF7` and `0xF8` and are read in the same transfer.
    OUT_MSB = 0xF6,
}

/// Calibration coefficients in the EEPROM
///
/// Each coefficient is a big-endian 16-bit word starting at the listed (MSB) address.
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register16 {
    AC1 = 0xAA,
    AC2 = 0xAC,
    AC3 = 0xAE,
    AC4 = 0xB0,
    AC5 = 0xB2,
    AC6 = 0xB4,
    B1 = 0xB6,
    B2 = 0xB8,
    MB = 0xBA,
    MC = 0xBC,
    MD = 0xBE,
}

/// Register-level access to the sensor
///
/// Every transfer addresses a register by writing its address first; multi-byte reads
/// auto-increment on the device.
pub trait Registers<I: I2c> {
    const ADDR: u8;

    fn i2c(&mut self) -> &mut I;

    fn read_n(&mut self, regaddr: u8, buf: &mut [u8]) -> Result<(), I::Error> {
        self.i2c().write_read(Self::ADDR, &[regaddr], buf)
    }

    fn read_u8(&mut self, reg: Register8) -> Result<u8, I::Error> {
        let mut val = [0];
        self.read_n(reg as u8, &mut val)?;
        Ok(val[0])
    }

    fn read_u16(&mut self, reg: Register16) -> Result<u16, I::Error> {
        let mut raw = [0; 2];
        self.read_n(reg as u8, &mut raw)?;
        Ok(u16::from_be_bytes(raw))
    }

    fn read_i16(&mut self, reg: Register16) -> Result<i16, I::Error> {
        Ok(bytemuck::cast(self.read_u16(reg)?))
    }

    fn write_u8(&mut self, reg: Register8, val: u8) -> Result<(), I::Error> {
        self.i2c().write(Self::ADDR, &[reg as u8, val])
    }
}

impl<I2C, E> Registers<I2C> for Bmp180<I2C>
where
    I2C: I2c<Error = E>,
{
    const ADDR: u8 = ADDR;
    fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }
}
