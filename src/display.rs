//! The character display and the screens drawn on it
//!
//! The station only ever writes to the display. Anything that can position a cursor on a 16x2
//! character display and print bytes to it can be used by implementing [`TextDisplay`]; for an
//! HD44780 that is a thin wrapper over its HAL driver.

use core::fmt::{self, Write as _};

use heapless::String;

use crate::trend::Trend;
use crate::{Altitude, Pressure, Temperature};

/// Characters per line
pub const COLUMNS: u8 = 16;

/// Degree sign in the HD44780 A00 character ROM
pub const DEGREE: u8 = 0xDF;

pub(crate) const WELCOME: &str = "Welcome to the weather station project!";
pub(crate) const COMM_ERROR: &str = "COMM error";

const TEMPERATURE: &str = "Temperature";
const PRESSURE: &str = "Pressure";
const PRESSURE_UNIT: &str = "hPa";
const ALTITUDE: &str = "Altitude";
const ALTITUDE_UNIT: &str = "metres";
const TREND: &str = "Trend:";
const DELTA: &str = "dP:";

/// A line on the display
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    #[allow(missing_docs)]
    First,
    #[allow(missing_docs)]
    Second,
}

/// A two-line character display with cursor addressing
pub trait TextDisplay {
    /// Blank both lines and undo any display shift
    fn clear(&mut self);
    /// Move the cursor to `column` (from 0) on `line`
    fn set_cursor(&mut self, line: Line, column: u8);
    /// Print one character code at the cursor and advance it
    fn print_char(&mut self, c: u8);
    /// Shift the visible window one position to the left, scrolling text leftwards
    fn shift_left(&mut self);
    /// Shift the visible window one position to the right
    fn shift_right(&mut self);

    /// Print every byte of `s`
    fn print_str(&mut self, s: &str) {
        for c in s.bytes() {
            self.print_char(c);
        }
    }
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_cursor(&mut self, line: Line, column: u8) {
        (**self).set_cursor(line, column);
    }

    fn print_char(&mut self, c: u8) {
        (**self).print_char(c);
    }

    fn shift_left(&mut self) {
        (**self).shift_left();
    }

    fn shift_right(&mut self) {
        (**self).shift_right();
    }

    fn print_str(&mut self, s: &str) {
        (**self).print_str(s);
    }
}

type LineText = String<{ COLUMNS as usize }>;

// Text past the line width could not be shown anyway, so overflow just truncates
fn text(args: fmt::Arguments) -> LineText {
    let mut s = LineText::new();
    let _ = s.write_fmt(args);
    s
}

#[allow(clippy::cast_possible_truncation)]
fn centred(len: usize) -> u8 {
    (usize::from(COLUMNS).saturating_sub(len) / 2) as u8
}

#[allow(clippy::cast_possible_truncation)]
fn right_aligned(len: usize) -> u8 {
    usize::from(COLUMNS).saturating_sub(len) as u8
}

fn print_centred<L: TextDisplay + ?Sized>(display: &mut L, line: Line, s: &str) {
    display.set_cursor(line, centred(s.len()));
    display.print_str(s);
}

/// Tenths of a degree as a decimal, e.g. `-0.5` or `15.0`
fn tenths(deci: i16) -> LineText {
    let sign = if deci < 0 { "-" } else { "" };
    let abs = deci.unsigned_abs();
    text(format_args!("{sign}{}.{}", abs / 10, abs % 10))
}

/// "Temperature" over the value in °C
pub fn show_temperature<L: TextDisplay + ?Sized>(display: &mut L, temperature: Temperature) {
    display.clear();
    print_centred(display, Line::First, TEMPERATURE);

    let value = tenths(temperature.0);
    display.set_cursor(Line::Second, centred(value.len() + 3));
    display.print_str(&value);
    display.print_char(b' ');
    display.print_char(DEGREE);
    display.print_char(b'C');
}

/// "Pressure" over the value in whole hPa
pub fn show_pressure<L: TextDisplay + ?Sized>(display: &mut L, pressure: Pressure) {
    display.clear();
    print_centred(display, Line::First, PRESSURE);
    print_centred(
        display,
        Line::Second,
        &text(format_args!("{} {PRESSURE_UNIT}", pressure.0 / 100)),
    );
}

/// "Altitude" over the value in metres
pub fn show_altitude<L: TextDisplay + ?Sized>(display: &mut L, altitude: Altitude) {
    display.clear();
    print_centred(display, Line::First, ALTITUDE);
    print_centred(
        display,
        Line::Second,
        &text(format_args!("{} {ALTITUDE_UNIT}", altitude.0)),
    );
}

/// Trend word, the deviation from the moving average and the number of samples behind it
///
/// ```text
/// Trend: rising
/// dP:3 hPa     120
/// ```
pub fn show_trend<L: TextDisplay + ?Sized>(
    display: &mut L,
    trend: Trend,
    delta_hpa: i32,
    samples: usize,
) {
    display.clear();
    display.set_cursor(Line::First, 0);
    display.print_str(&text(format_args!("{TREND} {}", trend.as_str())));

    display.set_cursor(Line::Second, 0);
    display.print_str(&text(format_args!("{DELTA}{delta_hpa} {PRESSURE_UNIT}")));
    let count = text(format_args!("{samples}"));
    display.set_cursor(Line::Second, right_aligned(count.len()));
    display.print_str(&count);
}

/// The persistent screen shown when the sensor does not respond at start-up
pub fn show_error<L: TextDisplay + ?Sized>(display: &mut L) {
    display.clear();
    print_centred(display, Line::First, COMM_ERROR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const DDRAM: usize = 40;

    /// Just enough of an HD44780 to read back what is visible
    struct Lcd {
        ddram: [[u8; DDRAM]; 2],
        line: usize,
        column: usize,
        shift: usize,
    }

    impl Lcd {
        fn new() -> Self {
            Self {
                ddram: [[b' '; DDRAM]; 2],
                line: 0,
                column: 0,
                shift: 0,
            }
        }

        fn visible(&self, line: Line) -> [u8; COLUMNS as usize] {
            let row = &self.ddram[line as usize];
            core::array::from_fn(|i| row[(i + self.shift) % DDRAM])
        }
    }

    impl TextDisplay for Lcd {
        fn clear(&mut self) {
            *self = Self::new();
        }

        fn set_cursor(&mut self, line: Line, column: u8) {
            self.line = line as usize;
            self.column = usize::from(column);
        }

        fn print_char(&mut self, c: u8) {
            self.ddram[self.line][self.column % DDRAM] = c;
            self.column += 1;
        }

        fn shift_left(&mut self) {
            self.shift = (self.shift + 1) % DDRAM;
        }

        fn shift_right(&mut self) {
            self.shift = (self.shift + DDRAM - 1) % DDRAM;
        }
    }

    #[test_case(150, "15.0")]
    #[test_case(-5, "-0.5")]
    #[test_case(0, "0.0")]
    #[test_case(-123, "-12.3")]
    #[test_case(i16::MIN, "-3276.8")]
    fn tenths_formatting(deci: i16, expected: &str) {
        assert_eq!(tenths(deci).as_str(), expected);
    }

    #[test]
    fn temperature_screen() {
        let mut lcd = Lcd::new();
        show_temperature(&mut lcd, Temperature(150));
        assert_eq!(&lcd.visible(Line::First), b"  Temperature   ");
        assert_eq!(&lcd.visible(Line::Second), b"    15.0 \xDFC     ");
    }

    #[test]
    fn pressure_screen() {
        let mut lcd = Lcd::new();
        show_pressure(&mut lcd, Pressure(69964));
        assert_eq!(&lcd.visible(Line::First), b"    Pressure    ");
        assert_eq!(&lcd.visible(Line::Second), b"    699 hPa     ");
    }

    #[test]
    fn altitude_screen() {
        let mut lcd = Lcd::new();
        show_altitude(&mut lcd, Altitude(-56));
        assert_eq!(&lcd.visible(Line::First), b"    Altitude    ");
        assert_eq!(&lcd.visible(Line::Second), b"   -56 metres   ");
    }

    #[test]
    fn trend_screen() {
        let mut lcd = Lcd::new();
        show_trend(&mut lcd, Trend::Falling, -12, 120);
        assert_eq!(&lcd.visible(Line::First), b"Trend: falling  ");
        assert_eq!(&lcd.visible(Line::Second), b"dP:-12 hPa   120");
    }

    #[test]
    fn error_screen() {
        let mut lcd = Lcd::new();
        lcd.shift_left();
        show_error(&mut lcd);
        assert_eq!(&lcd.visible(Line::First), b"   COMM error   ");
        assert_eq!(&lcd.visible(Line::Second), b"                ");
    }

    fn scribble<L: TextDisplay>(mut display: L) {
        display.print_str("hi");
        display.shift_right();
        display.shift_left();
    }

    #[test]
    fn through_mutable_reference() {
        let mut lcd = Lcd::new();
        scribble(&mut lcd);
        assert_eq!(&lcd.visible(Line::First)[..2], b"hi");
    }
}
