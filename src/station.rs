//! The measure-and-display cycle
//!
//! A [`WeatherStation`] steps through a fixed sequence of [`DeviceState`]s, one per
//! [`WeatherStation::tick`]:
//!
//! ```text
//! Init -> UpdateMeasurement -> DisplayTemperature -> Wait -> DisplayPressure -> Wait
//!      -> DisplayAltitude -> Wait -> DisplayTrend -> Wait -> Final -> UpdateMeasurement ...
//! ```
//!
//! Every state does a bounded amount of blocking work. `Init` scrolls a welcome banner, and by
//! default runs only on the first pass (see [`WelcomePolicy`]).
//!
//! ## Example
//!
//! ```no_run
//! use bmp180_station::interrupts::SampleDue;
//! use bmp180_station::station::{StationConfig, WeatherStation};
//! # use bmp180_station::display::{Line, TextDisplay};
//! # use embedded_hal_mock::eh1::{delay::NoopDelay, i2c::Mock};
//! # struct Lcd;
//! # impl TextDisplay for Lcd {
//! #     fn clear(&mut self) {}
//! #     fn set_cursor(&mut self, _: Line, _: u8) {}
//! #     fn print_char(&mut self, _: u8) {}
//! #     fn shift_left(&mut self) {}
//! #     fn shift_right(&mut self) {}
//! # }
//! # fn main() -> Result<(), bmp180_station::Error<embedded_hal::i2c::ErrorKind>> {
//!
//! static SAMPLE_DUE: SampleDue = SampleDue::new();
//!
//! // ... initialise i2c device, display and delay
//! # let (i2c, lcd, delay) = (Mock::new(&[]), Lcd, NoopDelay::new());
//!
//! // On a sensor failure this has already put the error screen up
//! let mut station: WeatherStation<_, _, _> =
//!     WeatherStation::new(i2c, lcd, delay, StationConfig::default(), &SAMPLE_DUE)?;
//! station.run()?;
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;

#[cfg(feature = "defmt")]
use defmt::{debug, info, trace};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use fugit::{ExtU32, MillisDurationU32};

use crate::altitude::altitude;
use crate::display::{self, Line, TextDisplay};
use crate::interrupts::SampleDue;
use crate::trend::{TrendTracker, WINDOW_SIZE};
use crate::{Bmp180, CalibratedReading, Error, OversamplingMode};

/// Which screen a [`DeviceState::Wait`] is holding on the display
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Temperature,
    Pressure,
    Altitude,
    Trend,
}

/// Position in the station cycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Scroll the welcome banner
    Init,
    /// Acquire and compensate a reading, record it in the trend window if a sample is due
    UpdateMeasurement,
    /// Draw the temperature screen
    DisplayTemperature,
    /// Draw the pressure screen
    DisplayPressure,
    /// Draw the altitude screen
    DisplayAltitude,
    /// Draw the trend screen
    DisplayTrend,
    /// Hold the given screen for the dwell time
    Wait(Screen),
    /// End of the cycle
    Final,
}

/// Whether the welcome banner is shown on every cycle
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WelcomePolicy {
    /// Only on the very first pass; [`DeviceState::Final`] leads to
    /// [`DeviceState::UpdateMeasurement`]
    #[default]
    FirstBootOnly,
    /// Every cycle; [`DeviceState::Final`] leads back to [`DeviceState::Init`]
    EveryCycle,
}

impl DeviceState {
    /// The state after this one
    #[must_use]
    pub fn next(self, welcome: WelcomePolicy) -> Self {
        use DeviceState::*;

        match self {
            Init => UpdateMeasurement,
            UpdateMeasurement => DisplayTemperature,
            DisplayTemperature => Wait(Screen::Temperature),
            Wait(Screen::Temperature) => DisplayPressure,
            DisplayPressure => Wait(Screen::Pressure),
            Wait(Screen::Pressure) => DisplayAltitude,
            DisplayAltitude => Wait(Screen::Altitude),
            Wait(Screen::Altitude) => DisplayTrend,
            DisplayTrend => Wait(Screen::Trend),
            Wait(Screen::Trend) => Final,
            Final => match welcome {
                WelcomePolicy::FirstBootOnly => UpdateMeasurement,
                WelcomePolicy::EveryCycle => Init,
            },
        }
    }
}

/// Settings for a [`WeatherStation`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationConfig {
    /// Oversampling for pressure conversions
    pub oversampling: OversamplingMode,
    /// How long each screen stays up
    pub dwell: MillisDurationU32,
    /// How long the welcome banner is held before it starts scrolling
    pub welcome_hold: MillisDurationU32,
    /// Pause between scroll steps of the welcome banner
    pub scroll_step: MillisDurationU32,
    #[allow(missing_docs)]
    pub welcome: WelcomePolicy,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            oversampling: OversamplingMode::UltraLowPower,
            dwell: 4000.millis(),
            welcome_hold: 1000.millis(),
            scroll_step: 250.millis(),
            welcome: WelcomePolicy::FirstBootOnly,
        }
    }
}

/// A BMP180, a character display and the pressure history, cycled through [`DeviceState`]s
///
/// The const parameter `N` is the size of the moving-average window, see [`TrendTracker`].
pub struct WeatherStation<'a, I, L, D, const N: usize = WINDOW_SIZE>
where
    I: I2c,
    L: TextDisplay,
    D: DelayNs,
{
    sensor: Bmp180<I>,
    display: L,
    delay: D,
    config: StationConfig,
    sample_due: &'a SampleDue,
    trend: TrendTracker<N>,
    state: DeviceState,
    reading: CalibratedReading,
}

impl<'a, I, E, L, D, const N: usize> WeatherStation<'a, I, L, D, N>
where
    I: I2c<Error = E>,
    L: TextDisplay,
    D: DelayNs,
{
    /// Bring up the sensor and prepare the cycle, starting at [`DeviceState::Init`]
    ///
    /// If the sensor cannot be initialised the error screen is drawn and the error returned.
    /// The screen stays up; there is no retry.
    pub fn new(
        i2c: I,
        mut display: L,
        delay: D,
        config: StationConfig,
        sample_due: &'a SampleDue,
    ) -> Result<Self, Error<E>> {
        #[cfg(feature = "defmt")]
        debug!("Creating weather station with {}", config);
        let sensor = match Bmp180::new(i2c, config.oversampling) {
            Ok(sensor) => sensor,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Sensor initialisation failed, halting");
                display::show_error(&mut display);
                return Err(e);
            }
        };

        #[cfg(feature = "defmt")]
        info!("Weather station ready");
        Ok(Self {
            sensor,
            display,
            delay,
            config,
            sample_due,
            trend: TrendTracker::new(),
            state: DeviceState::Init,
            reading: CalibratedReading::default(),
        })
    }

    /// Take the bus, display and delay back
    pub fn destroy(self) -> (I, L, D) {
        (self.sensor.destroy(), self.display, self.delay)
    }

    /// The state the next [`Self::tick`] will run
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// The most recent measurement; all zero before the first
    #[must_use]
    pub fn reading(&self) -> &CalibratedReading {
        &self.reading
    }

    /// Pressure history
    #[must_use]
    pub fn trend(&self) -> &TrendTracker<N> {
        &self.trend
    }

    /// The sensor driver
    #[must_use]
    pub fn sensor(&self) -> &Bmp180<I> {
        &self.sensor
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Run the handler of the current state and advance
    ///
    /// Returns the state that will run next.
    pub fn tick(&mut self) -> Result<DeviceState, Error<E>> {
        #[cfg(feature = "defmt")]
        trace!("Running {}", self.state);
        match self.state {
            DeviceState::Init => self.welcome(),
            DeviceState::UpdateMeasurement => self.update_measurement()?,
            DeviceState::DisplayTemperature => {
                display::show_temperature(&mut self.display, self.reading.temperature);
            }
            DeviceState::DisplayPressure => {
                display::show_pressure(&mut self.display, self.reading.pressure);
            }
            DeviceState::DisplayAltitude => {
                display::show_altitude(&mut self.display, self.reading.altitude);
            }
            DeviceState::DisplayTrend => {
                let pressure = self.reading.pressure;
                display::show_trend(
                    &mut self.display,
                    self.trend.trend(pressure),
                    self.trend.delta_hpa(pressure),
                    self.trend.len(),
                );
            }
            DeviceState::Wait(_) => self.delay.delay_ms(self.config.dwell.to_millis()),
            DeviceState::Final => {}
        }

        self.state = self.state.next(self.config.welcome);
        Ok(self.state)
    }

    /// Tick through the rest of the current cycle, up to and including [`DeviceState::Final`]
    pub fn run_cycle(&mut self) -> Result<(), Error<E>> {
        loop {
            let ran = self.state;
            self.tick()?;
            if ran == DeviceState::Final {
                return Ok(());
            }
        }
    }

    /// Tick forever
    ///
    /// Only returns if the bus fails.
    pub fn run(&mut self) -> Result<Infallible, Error<E>> {
        loop {
            self.tick()?;
        }
    }

    fn welcome(&mut self) {
        self.display.clear();
        self.display.set_cursor(Line::First, 0);
        self.display.print_str(display::WELCOME);
        self.delay.delay_ms(self.config.welcome_hold.to_millis());

        for _ in 0..display::COLUMNS {
            self.display.shift_left();
            self.delay.delay_ms(self.config.scroll_step.to_millis());
        }
    }

    fn update_measurement(&mut self) -> Result<(), Error<E>> {
        let (temperature, pressure) = self.sensor.measure(&mut self.delay)?;
        self.reading = CalibratedReading {
            temperature,
            pressure,
            altitude: altitude(pressure),
        };
        #[cfg(feature = "defmt")]
        debug!("Updated reading {}", self.reading);

        if self.sample_due.take() {
            self.trend.record(pressure);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYCLE: [DeviceState; 11] = [
        DeviceState::Init,
        DeviceState::UpdateMeasurement,
        DeviceState::DisplayTemperature,
        DeviceState::Wait(Screen::Temperature),
        DeviceState::DisplayPressure,
        DeviceState::Wait(Screen::Pressure),
        DeviceState::DisplayAltitude,
        DeviceState::Wait(Screen::Altitude),
        DeviceState::DisplayTrend,
        DeviceState::Wait(Screen::Trend),
        DeviceState::Final,
    ];

    #[test]
    fn linear_sequence() {
        for pair in CYCLE.windows(2) {
            assert_eq!(pair[0].next(WelcomePolicy::FirstBootOnly), pair[1]);
            assert_eq!(pair[0].next(WelcomePolicy::EveryCycle), pair[1]);
        }
    }

    #[test]
    fn final_skips_welcome_by_default() {
        assert_eq!(
            DeviceState::Final.next(StationConfig::default().welcome),
            DeviceState::UpdateMeasurement
        );
    }

    #[test]
    fn final_to_init_every_cycle() {
        assert_eq!(
            DeviceState::Final.next(WelcomePolicy::EveryCycle),
            DeviceState::Init
        );
    }

    #[test]
    fn default_timings() {
        let config = StationConfig::default();
        assert_eq!(config.dwell.to_millis(), 4000);
        assert_eq!(config.welcome_hold.to_millis(), 1000);
        assert_eq!(config.scroll_step.to_millis(), 250);
    }
}
