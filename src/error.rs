//! Errors that can occur when using the BMP180.
//!
//! [`Error`] is generic over the error type of the underlying I2C bus.

/// This represents all possible errors from the driver and the station cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<BusError> {
    /// An error has occurred in the I2C driver
    Bus(BusError),

    /// The chip id register did not read back `0x55`
    ///
    /// Usually a wiring or addressing problem. There is no recovery path: the station shows its
    /// error screen and never starts the measurement cycle.
    NotConnected {
        /// The id that was read instead
        id: u8,
    },
}

/// An oversampling index outside `0..=3` was given
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidOversampling(pub u8);
