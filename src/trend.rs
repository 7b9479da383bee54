//! Pressure history and weather trend
//!
//! A [`TrendTracker`] keeps the last `N` pressure samples in a ring buffer and reports their
//! unweighted mean. With one sample a minute, the default window of [`WINDOW_SIZE`] covers two
//! hours. The current pressure is compared against that mean to give a [`Trend`].

#[cfg(feature = "defmt")]
use defmt::trace;

use crate::Pressure;

/// Default number of samples in the moving-average window
pub const WINDOW_SIZE: usize = 120;

/// Direction of the weather, from pressure relative to its moving average
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trend {
    /// More than 1% above the average
    Rising,
    /// More than 1% below the average
    Falling,
    /// Within 1% of the average, or no history yet
    Stable,
}

impl Trend {
    /// Classify `current` against `average` over `samples` valid entries
    ///
    /// The band is `average / 100` (integer division) either side of the average; the bounds
    /// themselves count as stable.
    #[must_use]
    pub fn classify(current: Pressure, average: Pressure, samples: usize) -> Self {
        if samples == 0 {
            return Trend::Stable;
        }
        let band = average.0 / 100;
        if current.0 > average.0.saturating_add(band) {
            Trend::Rising
        } else if current.0 < average.0.saturating_sub(band) {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }

    /// Word shown on the display
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

/// Fixed-capacity ring buffer of pressure samples
///
/// Once `N` samples have been recorded, each new one replaces the oldest.
#[derive(Clone, Debug)]
pub struct TrendTracker<const N: usize = WINDOW_SIZE> {
    samples: [i32; N],
    cursor: usize,
    valid: usize,
}

impl<const N: usize> Default for TrendTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrendTracker<N> {
    /// An empty history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            cursor: 0,
            valid: 0,
        }
    }

    /// Append a sample, overwriting the oldest once full
    pub fn record(&mut self, pressure: Pressure) {
        let Some(slot) = self.samples.get_mut(self.cursor) else {
            return;
        };
        *slot = pressure.0;
        self.cursor += 1;
        if self.cursor >= N {
            self.cursor = 0;
        }
        if self.valid < N {
            self.valid += 1;
        }
        #[cfg(feature = "defmt")]
        trace!("Recorded {}, {} samples in window", pressure, self.valid);
    }

    /// Mean of the valid samples, truncated towards zero
    ///
    /// Zero when nothing has been recorded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_possible_wrap)]
    pub fn moving_average(&self) -> Pressure {
        if self.valid == 0 {
            return Pressure(0);
        }
        // Until the buffer wraps, the valid entries are exactly the first `valid` slots
        let sum: i64 = self.samples[..self.valid].iter().copied().map(i64::from).sum();
        Pressure((sum / self.valid as i64) as i32)
    }

    /// Trend of `current` against the moving average
    #[must_use]
    pub fn trend(&self, current: Pressure) -> Trend {
        Trend::classify(current, self.moving_average(), self.valid)
    }

    /// Difference between `current` and the moving average, in whole hPa
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn delta_hpa(&self, current: Pressure) -> i32 {
        ((i64::from(current.0) - i64::from(self.moving_average().0)) / 100) as i32
    }

    /// Number of valid samples, at most `N`
    #[must_use]
    pub fn len(&self) -> usize {
        self.valid
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid == 0
    }

    /// Whether the window is full and new samples overwrite old ones
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.valid == N
    }

    /// Size of the window
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}
