//! Factory calibration and the datasheet compensation algorithm
//!
//! The BMP180 reports uncompensated codes only. [`Calibration`] holds the eleven per-device
//! coefficients from the on-chip EEPROM and turns raw codes into [`Temperature`] and
//! [`Pressure`] with the integer algorithm from the datasheet, shift for shift.
//!
//! All arithmetic is 32-bit two's complement with wrapping, so every input produces a value and
//! nothing can panic. The two divisions in the algorithm are guarded: a zero divisor yields a
//! reading of zero.

use embedded_hal::i2c::I2c;

use crate::registers::{Register16, Registers};
use crate::{OversamplingMode, Pressure, Temperature};

/// Per-device calibration coefficients
///
/// Read once when the driver is created and never modified afterwards.
/// No range checks are done; implausible values surface as implausible readings.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

macro_rules! read_coefficients {
    ($regs:expr, $($field:ident: $reader:ident),* $(,)?) => {
        paste::paste! {
            Calibration {
                $($field: $regs.$reader(Register16::[<$field:upper>])?,)*
            }
        }
    };
}

impl Calibration {
    /// Worked example from the BMP180 datasheet
    pub const DATASHEET: Self = Self {
        ac1: 408,
        ac2: -72,
        ac3: -14383,
        ac4: 32741,
        ac5: 32757,
        ac6: 23153,
        b1: 6190,
        b2: 4,
        mb: -32768,
        mc: -8711,
        md: 2868,
    };

    /// Read all coefficients with one 2-byte transfer each, in register order
    pub(crate) fn read<I: I2c, R: Registers<I>>(regs: &mut R) -> Result<Self, I::Error> {
        Ok(read_coefficients!(regs,
            ac1: read_i16,
            ac2: read_i16,
            ac3: read_i16,
            ac4: read_u16,
            ac5: read_u16,
            ac6: read_u16,
            b1: read_i16,
            b2: read_i16,
            mb: read_i16,
            mc: read_i16,
            md: read_i16,
        ))
    }

    /// Compensate a raw temperature code
    ///
    /// Returns the temperature together with the intermediate value `B5`, which
    /// [`Self::compensate_pressure`] needs for a reading taken in the same cycle.
    ///
    /// When `X1 + MD` is zero (in particular `X1 == 0` and `MD == 0`) the result is `(0, 0)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn compensate_temperature(&self, raw: u16) -> (Temperature, i32) {
        let x1 = (i32::from(raw) - i32::from(self.ac6)).wrapping_mul(i32::from(self.ac5)) >> 15;
        let Some(x2) = (i32::from(self.mc) << 11).checked_div(x1.wrapping_add(i32::from(self.md)))
        else {
            return (Temperature(0), 0);
        };
        let b5 = x1.wrapping_add(x2);
        (Temperature((b5.wrapping_add(8) >> 4) as i16), b5)
    }

    /// Compensate a raw pressure code, given `B5` from [`Self::compensate_temperature`]
    ///
    /// `oss` must be the mode the raw code was measured with.
    /// Returns a pressure of zero when the intermediate `B4` is zero.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    #[allow(clippy::cast_sign_loss)]
    pub fn compensate_pressure(&self, raw: u32, b5: i32, oss: OversamplingMode) -> Pressure {
        let oss = oss.shift();
        let b6 = b5.wrapping_sub(4000);
        let b6_sq = b6.wrapping_mul(b6) >> 12;

        let x1 = i32::from(self.b2).wrapping_mul(b6_sq) >> 11;
        let x2 = i32::from(self.ac2).wrapping_mul(b6) >> 11;
        let x3 = x1.wrapping_add(x2);
        let b3 = (i32::from(self.ac1) * 4)
            .wrapping_add(x3)
            .wrapping_shl(u32::from(oss))
            .wrapping_add(2)
            >> 2;

        let x1 = i32::from(self.ac3).wrapping_mul(b6) >> 13;
        let x2 = i32::from(self.b1).wrapping_mul(b6_sq) >> 16;
        let x3 = (x1.wrapping_add(x2).wrapping_add(2)) >> 2;
        let b4 = u32::from(self.ac4).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
        if b4 == 0 {
            return Pressure(0);
        }

        let b7 = raw.wrapping_sub(b3 as u32).wrapping_mul(50000 >> oss);
        let mut p = if b7 < 0x8000_0000 {
            ((b7 << 1) / b4) as i32
        } else {
            ((b7 / b4) << 1) as i32
        };

        let x1 = p >> 8;
        let x1 = x1.wrapping_mul(x1).wrapping_mul(3038) >> 16;
        let x2 = (-7357_i32).wrapping_mul(p) >> 16;
        p = p.wrapping_add((x1.wrapping_add(x2).wrapping_add(3791)) >> 4);
        Pressure(p)
    }
}
