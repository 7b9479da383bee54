#![allow(non_camel_case_types)]

use bitflags::bitflags;

use crate::OversamplingMode;

bitflags! {
    /// Bits of [`Register8::CTRL_MEAS`](crate::registers::Register8::CTRL_MEAS)
    ///
    /// Writing a measurement selection together with `SCO` starts a conversion.
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct CTRL_MEAS: u8 {
        /// Oversampling ratio, high bit
        const OSS_1 = 0b1000_0000;
        /// Oversampling ratio, low bit
        const OSS_0 = 0b0100_0000;
        /// Start of conversion
        ///
        /// Stays set on the device until the conversion is complete.
        const SCO = 0b0010_0000;
        /// Measurement selection: temperature
        const MEAS_TEMPERATURE = 0b0000_1110;
        /// Measurement selection: pressure
        const MEAS_PRESSURE = 0b0001_0100;

        /// Start a temperature conversion (`0x2E`)
        const START_TEMPERATURE = Self::SCO.bits | Self::MEAS_TEMPERATURE.bits;
        /// Start a pressure conversion at oss = 0 (`0x34`)
        const START_PRESSURE = Self::SCO.bits | Self::MEAS_PRESSURE.bits;
    }
}

impl CTRL_MEAS {
    /// Control value starting a pressure conversion at the given oversampling
    pub fn start_pressure(oss: OversamplingMode) -> Self {
        Self::START_PRESSURE | Self::from_bits_truncate(oss.shift() << 6)
    }
}
