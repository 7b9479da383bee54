//! The periodic "pressure sample due" signal
//!
//! The station records a pressure sample into its [`TrendTracker`](crate::trend::TrendTracker)
//! only when a timer interrupt has asked for one, nominally once a minute. [`SampleDue`] is the
//! one piece of state shared between that interrupt and the main loop.
//!
//! ## Example
//!
//! ```
//! use bmp180_station::interrupts::SampleDue;
//!
//! static SAMPLE_DUE: SampleDue = SampleDue::new();
//!
//! // in the timer interrupt handler
//! SAMPLE_DUE.set();
//!
//! // in the main loop
//! assert!(SAMPLE_DUE.take());
//! assert!(!SAMPLE_DUE.take());
//! ```
//!
//! ## Note: timer setup
//!
//! This crate does not configure any timer. Wire your HAL's periodic timer interrupt to call
//! [`SampleDue::set`].

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "defmt")]
use defmt::trace;

/// Nominal period of the sample-due timer, in seconds
pub const SAMPLE_PERIOD_SECS: u32 = 60;

/// Set by an interrupt, read-and-cleared by the main loop
///
/// Sets that arrive before the main loop consumes the flag coalesce into one.
#[derive(Debug, Default)]
pub struct SampleDue(AtomicBool);

impl SampleDue {
    /// A cleared flag, usable in a `static`
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark a sample as due
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a sample is due, without clearing the flag
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag and report whether it was set
    pub fn take(&self) -> bool {
        let due = self.0.swap(false, Ordering::AcqRel);
        #[cfg(feature = "defmt")]
        if due {
            trace!("Pressure sample due");
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_cleared() {
        let flag = SampleDue::new();
        assert!(!flag.is_set());
        assert!(!flag.take());
    }

    #[test]
    fn take_clears() {
        let flag = SampleDue::new();
        flag.set();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.is_set());
    }

    #[test]
    fn sets_coalesce() {
        let flag = SampleDue::new();
        flag.set();
        flag.set();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
