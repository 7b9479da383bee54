//! Altitude from pressure with the international barometric formula
//!
//! `h = 44330 * (1 - (p / p0) ^ (1 / 5.255))`, valid in the troposphere.

use crate::{Altitude, Pressure};

/// Mean sea-level pressure of the standard atmosphere
pub const SEA_LEVEL: Pressure = Pressure(101_325);

const SCALE_M: f32 = 44330.0;
const EXPONENT: f32 = 1.0 / 5.255;

impl Altitude {
    /// Returned for pressures that are zero or negative
    ///
    /// Compensation yields 0 Pa when its divide-by-zero guard trips, so this is the altitude
    /// shown for a degenerate calibration.
    pub const UNKNOWN: Altitude = Altitude(i16::MIN);
}

/// Altitude above the standard sea-level pressure [`SEA_LEVEL`]
#[must_use]
pub fn altitude(pressure: Pressure) -> Altitude {
    altitude_with_reference(pressure, SEA_LEVEL)
}

/// Altitude above the level where the pressure is `reference`
///
/// Truncated towards zero and saturated to the `i16` range.
/// Returns [`Altitude::UNKNOWN`] if either pressure is not positive.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn altitude_with_reference(pressure: Pressure, reference: Pressure) -> Altitude {
    if pressure.0 <= 0 || reference.0 <= 0 {
        return Altitude::UNKNOWN;
    }
    let ratio = pressure.0 as f32 / reference.0 as f32;
    Altitude((SCALE_M * (1.0 - libm::powf(ratio, EXPONENT))) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn sea_level_is_zero() {
        assert_eq!(altitude(SEA_LEVEL), Altitude(0));
    }

    #[test_case(0)]
    #[test_case(-1)]
    #[test_case(i32::MIN)]
    fn degenerate_pressure(pa: i32) {
        assert_eq!(altitude(Pressure(pa)), Altitude::UNKNOWN);
    }

    #[test]
    fn zero_reference() {
        assert_eq!(
            altitude_with_reference(Pressure(100_000), Pressure(0)),
            Altitude::UNKNOWN
        );
    }

    #[test_case(69964, 3010, 3025)]
    #[test_case(89875, 990, 1010)]
    #[test_case(102_000, -60, -50)]
    fn standard_atmosphere(pa: i32, low: i16, high: i16) {
        let Altitude(m) = altitude(Pressure(pa));
        assert!((low..=high).contains(&m), "{pa}Pa gave {m}m");
    }

    #[test]
    fn saturates() {
        assert_eq!(altitude(Pressure(i32::MAX)), Altitude(i16::MIN));
        assert!(altitude(Pressure(1)).0 > 30_000);
    }
}
