//! To get started, create a [`Bmp180`], or hand the bus to a [`station::WeatherStation`] to run
//! the full measure-and-display cycle.
//!
//! ## Examples
//!
//! ```no_run
//! use bmp180_station::{Bmp180, OversamplingMode};
//! # use embedded_hal_mock::eh1::{delay::NoopDelay, i2c::Mock};
//! # fn main() -> Result<(), bmp180_station::Error<embedded_hal::i2c::ErrorKind>> {
//!
//! // ... initialise i2c device and a delay provider
//! # let i2c = Mock::new(&[]);
//! # let mut delay = NoopDelay::new();
//!
//! let mut barometer = Bmp180::new(i2c, OversamplingMode::Standard)?;
//! let (temperature, pressure) = barometer.measure(&mut delay)?;
//! println!("{}.{} degrees, {}Pa", temperature.0 / 10, temperature.0 % 10, pressure.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! The `defmt` feature provides logging of various levels with the
//! [`defmt`](https://defmt.ferrous-systems.com/introduction.html) crate.
//! It is disabled by default.
#![no_std]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::enum_glob_use)]

pub mod altitude;
pub mod calibration;
pub mod display;
mod error;
mod flags;
pub mod interrupts;
mod registers;
pub mod station;
pub mod trend;

pub use calibration::Calibration;
pub use error::{Error, InvalidOversampling};
use flags::CTRL_MEAS;
use registers::{Register8, Registers};

#[cfg(feature = "defmt")]
use defmt::{debug, info, trace};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use fugit::{ExtU32, MillisDurationU32};

/// A Bosch BMP180 barometer/thermometer.
///
/// Owns the bus and the calibration read from the device at construction.
/// Conversions are blocking: the device has no ready signal, so every read waits out the
/// datasheet's maximum conversion time on the supplied delay.
pub struct Bmp180<I>
where
    I: I2c,
{
    i2c: I,
    oss: OversamplingMode,
    calibration: Calibration,
}

/// Hardware oversampling for pressure conversions
///
/// Higher settings average more internal samples: less noise, longer conversions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OversamplingMode {
    /// oss = 0, one internal sample
    ///
    /// Max conversion time = 4.5ms
    #[default]
    UltraLowPower = 0,
    /// oss = 1, two internal samples
    ///
    /// Max conversion time = 7.5ms
    Standard = 1,
    /// oss = 2, four internal samples
    ///
    /// Max conversion time = 13.5ms
    HighResolution = 2,
    /// oss = 3, eight internal samples
    ///
    /// Max conversion time = 25.5ms
    UltraHighResolution = 3,
}

impl OversamplingMode {
    /// Max conversion time for a temperature reading, independent of oversampling
    pub const TEMPERATURE_CONVERSION_MS: u32 = 5;

    /// The `oss` value; shift applied to raw pressure codes and to `B3`
    #[must_use]
    pub fn shift(self) -> u8 {
        self as u8
    }

    /// Time to wait between starting a pressure conversion and reading it back
    #[must_use]
    pub fn conversion_time(self) -> MillisDurationU32 {
        match self {
            OversamplingMode::UltraLowPower => 5,
            OversamplingMode::Standard => 8,
            OversamplingMode::HighResolution => 14,
            OversamplingMode::UltraHighResolution => 26,
        }
        .millis()
    }

    /// Value written to the measurement control register to start a pressure conversion
    #[must_use]
    pub fn control_value(self) -> u8 {
        CTRL_MEAS::start_pressure(self).bits()
    }
}

impl TryFrom<u8> for OversamplingMode {
    type Error = InvalidOversampling;

    fn try_from(oss: u8) -> Result<Self, Self::Error> {
        use OversamplingMode::*;

        match oss {
            0 => Ok(UltraLowPower),
            1 => Ok(Standard),
            2 => Ok(HighResolution),
            3 => Ok(UltraHighResolution),
            other => Err(InvalidOversampling(other)),
        }
    }
}

/// Uncompensated codes from one acquisition
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Raw temperature code (`UT`)
    pub temperature: u16,
    /// Raw pressure code (`UP`), 16 to 19 significant bits depending on oversampling
    pub pressure: u32,
}

impl<I, E> Bmp180<I>
where
    I: I2c<Error = E>,
{
    /// Initialise the device
    ///
    /// Actions carried out:
    ///
    /// 1. Takes ownership of an I2C bus/device.
    /// 1. Reads the chip id; anything other than `0x55` is reported as
    ///    [`Error::NotConnected`].
    /// 1. Reads the eleven calibration coefficients from the EEPROM.
    pub fn new(i2c: I, oss: OversamplingMode) -> Result<Self, Error<E>> {
        #[cfg(feature = "defmt")]
        debug!("Creating new BMP180 with {}", oss);
        let mut new = Self {
            i2c,
            oss,
            calibration: Calibration::default(),
        };

        let id = new.chip_id()?;
        if id != registers::CHIP_ID {
            #[cfg(feature = "defmt")]
            defmt::error!("Unexpected chip id {=u8:#x}", id);
            return Err(Error::NotConnected { id });
        }

        new.calibration = Calibration::read::<I, _>(&mut new).map_err(Error::Bus)?;
        #[cfg(feature = "defmt")]
        info!("BMP180 created, calibration {}", new.calibration);
        Ok(new)
    }

    /// Destroy the sensor struct and yield the I2C device it held
    pub fn destroy(self) -> I {
        self.i2c
    }

    /// Calibration coefficients read at construction
    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Oversampling used for pressure conversions
    #[must_use]
    pub fn oversampling(&self) -> OversamplingMode {
        self.oss
    }

    /// Read the chip id register
    pub fn chip_id(&mut self) -> Result<u8, Error<E>> {
        #[cfg(feature = "defmt")]
        trace!("Reading chip id");
        self.read_u8(Register8::CHIP_ID).map_err(Error::Bus)
    }

    /// Perform a soft reset
    ///
    /// The calibration held by the driver stays valid; the EEPROM is not affected.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        debug!("Resetting device");
        self.write_u8(Register8::SOFT_RESET, registers::SOFT_RESET_CMD)
            .map_err(Error::Bus)
    }

    /// Start a temperature conversion, wait for it and read the raw code
    pub fn read_raw_temperature<D: DelayNs>(&mut self, delay: &mut D) -> Result<u16, Error<E>> {
        #[cfg(feature = "defmt")]
        trace!("Reading raw temperature");
        self.write_u8(Register8::CTRL_MEAS, CTRL_MEAS::START_TEMPERATURE.bits())
            .map_err(Error::Bus)?;
        delay.delay_ms(OversamplingMode::TEMPERATURE_CONVERSION_MS);

        let mut raw = [0; 2];
        self.read_n(Register8::OUT_MSB as u8, &mut raw)
            .map_err(Error::Bus)?;
        Ok(u16::from_be_bytes(raw))
    }

    /// Start a pressure conversion, wait for it and read the raw code
    pub fn read_raw_pressure<D: DelayNs>(&mut self, delay: &mut D) -> Result<u32, Error<E>> {
        #[cfg(feature = "defmt")]
        trace!("Reading raw pressure");
        self.write_u8(Register8::CTRL_MEAS, self.oss.control_value())
            .map_err(Error::Bus)?;
        delay.delay_ms(self.oss.conversion_time().to_millis());

        let mut raw = [0; 3];
        self.read_n(Register8::OUT_MSB as u8, &mut raw)
            .map_err(Error::Bus)?;
        Ok(decode_raw_pressure(raw, self.oss))
    }

    /// Read both raw codes, temperature first
    pub fn read_raw<D: DelayNs>(&mut self, delay: &mut D) -> Result<RawSample, Error<E>> {
        Ok(RawSample {
            temperature: self.read_raw_temperature(delay)?,
            pressure: self.read_raw_pressure(delay)?,
        })
    }

    /// Acquire and compensate one temperature and pressure reading
    pub fn measure<D: DelayNs>(&mut self, delay: &mut D) -> Result<(Temperature, Pressure), Error<E>> {
        let raw = self.read_raw(delay)?;
        let (temperature, b5) = self.calibration.compensate_temperature(raw.temperature);
        let pressure = self
            .calibration
            .compensate_pressure(raw.pressure, b5, self.oss);
        #[cfg(feature = "defmt")]
        debug!("Measured {} and {} from {}", temperature, pressure, raw);
        Ok((temperature, pressure))
    }
}

fn decode_raw_pressure(raw: [u8; 3], oss: OversamplingMode) -> u32 {
    ((u32::from(raw[0]) << 16) | (u32::from(raw[1]) << 8) | u32::from(raw[2])) >> (8 - oss.shift())
}

macro_rules! reading_impl {
    ($kind:ident, $inner:ty, $unit:expr, #[$doc:meta]) => {
        #[$doc]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $kind(pub $inner);
        impl From<$kind> for $inner {
            fn from(reading: $kind) -> Self {
                reading.0
            }
        }
        #[cfg(feature = "defmt")]
        impl defmt::Format for $kind {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{}{}", self.0, $unit);
            }
        }
    };
}

reading_impl!(Temperature, i16, "d°C", #[doc = "Temperature reading, in tenths of a degree celsius"]);
reading_impl!(Pressure, i32, "Pa", #[doc = "Pressure reading, in pascal"]);
reading_impl!(Altitude, i16, "m", #[doc = "Altitude, in metres above the reference pressure level"]);

/// One compensated measurement cycle
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibratedReading {
    #[allow(missing_docs)]
    pub temperature: Temperature,
    #[allow(missing_docs)]
    pub pressure: Pressure,
    #[allow(missing_docs)]
    pub altitude: Altitude,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case([0x5D, 0x23, 0x00], OversamplingMode::UltraLowPower, 23843)]
    #[test_case([0x5D, 0x23, 0x80], OversamplingMode::Standard, 47687)]
    #[test_case([0xFF, 0xFF, 0xFF], OversamplingMode::HighResolution, 0x3_FFFF)]
    #[test_case([0xFF, 0xFF, 0xE0], OversamplingMode::UltraHighResolution, 0x7_FFFF)]
    fn raw_pressure(input: [u8; 3], oss: OversamplingMode, expected: u32) {
        assert_eq!(decode_raw_pressure(input, oss), expected);
    }

    #[test_case(0, Ok(OversamplingMode::UltraLowPower))]
    #[test_case(3, Ok(OversamplingMode::UltraHighResolution))]
    #[test_case(4, Err(InvalidOversampling(4)))]
    fn oss_from_u8(input: u8, expected: Result<OversamplingMode, InvalidOversampling>) {
        assert_eq!(OversamplingMode::try_from(input), expected);
    }

    #[test]
    fn conversion_times() {
        let times = [
            OversamplingMode::UltraLowPower,
            OversamplingMode::Standard,
            OversamplingMode::HighResolution,
            OversamplingMode::UltraHighResolution,
        ]
        .map(|oss| oss.conversion_time().to_millis());
        assert_eq!(times, [5, 8, 14, 26]);
    }
}
