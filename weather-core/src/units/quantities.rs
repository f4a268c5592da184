//! Concrete quantity kinds and their SI → customary conversions.

use super::{Locale, Precision, Quantity, UnitValue, sealed::Sealed};

const FAHRENHEIT_PER_CELSIUS: f64 = 9.0 / 5.0;
const FAHRENHEIT_OFFSET: f64 = 32.0;
const MILLIBAR_PER_INCH_HG: f64 = 33.8639;
const KMH_PER_MPH: f64 = 1.609344;
const MM_PER_INCH: f64 = 25.4;

/// Air temperature: °C / °F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature;

impl Sealed for Temperature {}

impl Quantity for Temperature {
    const SI_UNIT: &'static str = "C";
    const CUSTOMARY_UNIT: &'static str = "F";
    const MIXED: Locale = Locale::Si;

    fn to_customary(si: f64) -> f64 {
        si * FAHRENHEIT_PER_CELSIUS + FAHRENHEIT_OFFSET
    }

    fn from_customary(customary: f64) -> f64 {
        (customary - FAHRENHEIT_OFFSET) / FAHRENHEIT_PER_CELSIUS
    }

    fn render(value: &str, unit: &str) -> String {
        format!("{value}° {unit}")
    }
}

/// Barometric pressure: millibar / inches of mercury.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pressure;

impl Sealed for Pressure {}

impl Quantity for Pressure {
    const SI_UNIT: &'static str = "mb";
    const CUSTOMARY_UNIT: &'static str = "in Hg";
    const MIXED: Locale = Locale::Si;

    fn to_customary(si: f64) -> f64 {
        si / MILLIBAR_PER_INCH_HG
    }

    fn from_customary(customary: f64) -> f64 {
        customary * MILLIBAR_PER_INCH_HG
    }
}

/// Generic speed: km/h / mph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed;

impl Sealed for Speed {}

impl Quantity for Speed {
    const SI_UNIT: &'static str = "km/h";
    const CUSTOMARY_UNIT: &'static str = "mph";
    const MIXED: Locale = Locale::Si;
    const PRECISION: Precision = Precision::new(0);

    fn to_customary(si: f64) -> f64 {
        si / KMH_PER_MPH
    }

    fn from_customary(customary: f64) -> f64 {
        customary * KMH_PER_MPH
    }
}

/// Wind speed. Same units as [`Speed`], but mixed mode reads in mph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindSpeed;

impl Sealed for WindSpeed {}

impl Quantity for WindSpeed {
    const SI_UNIT: &'static str = Speed::SI_UNIT;
    const CUSTOMARY_UNIT: &'static str = Speed::CUSTOMARY_UNIT;
    const MIXED: Locale = Locale::Customary;
    const PRECISION: Precision = Speed::PRECISION;

    fn to_customary(si: f64) -> f64 {
        Speed::to_customary(si)
    }

    fn from_customary(customary: f64) -> f64 {
        Speed::from_customary(customary)
    }
}

/// Liquid precipitation depth: mm / in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecipitationAmount;

impl Sealed for PrecipitationAmount {}

impl Quantity for PrecipitationAmount {
    const SI_UNIT: &'static str = "mm";
    const CUSTOMARY_UNIT: &'static str = "in";
    const MIXED: Locale = Locale::Si;

    fn to_customary(si: f64) -> f64 {
        si / MM_PER_INCH
    }

    fn from_customary(customary: f64) -> f64 {
        customary * MM_PER_INCH
    }
}

impl UnitValue<WindSpeed> {
    /// Reinterpret as a plain [`Speed`], which reads as SI in mixed mode.
    pub fn as_speed(&self) -> UnitValue<Speed> {
        UnitValue::new(self.value_in(Locale::Si), self.locale()).with_precision(self.precision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn temperature_conversion() {
        let t = UnitValue::<Temperature>::new(-40.0, Locale::Customary);
        assert!(close(t.value(), -40.0));
        assert!(close(Temperature::to_customary(0.0), 32.0));
        assert!(close(Temperature::to_customary(37.0), 98.6));
    }

    #[test]
    fn pressure_conversion() {
        let p = UnitValue::<Pressure>::new(1013.25, Locale::Customary);
        assert!((p.value() - 29.92).abs() < 0.01);
        assert_eq!(p.unit_string(), "in Hg");
    }

    #[test]
    fn wind_speed_prefers_mph_when_mixed() {
        let wind = UnitValue::<WindSpeed>::new(16.09344, Locale::Mixed);
        assert!(close(wind.value(), 10.0));
        assert_eq!(wind.render(), "10 mph");

        let speed = wind.as_speed();
        assert!(close(speed.value(), 16.09344));
        assert_eq!(speed.render(), "16 km/h");
    }

    #[test]
    fn precipitation_conversion() {
        let p = UnitValue::<PrecipitationAmount>::new(25.4, Locale::Customary);
        assert!(close(p.value(), 1.0));
        assert_eq!(p.render(), "1 in");
    }

    proptest! {
        #[test]
        fn conversions_preserve_order(a in -500.0f64..2000.0, b in -500.0f64..2000.0) {
            prop_assume!(a < b);
            prop_assert!(Temperature::to_customary(a) < Temperature::to_customary(b));
            prop_assert!(Pressure::to_customary(a) < Pressure::to_customary(b));
            prop_assert!(Speed::to_customary(a) < Speed::to_customary(b));
            prop_assert!(WindSpeed::to_customary(a) < WindSpeed::to_customary(b));
            prop_assert!(PrecipitationAmount::to_customary(a) < PrecipitationAmount::to_customary(b));
        }

        #[test]
        fn customary_round_trip_is_close(x in -500.0f64..2000.0) {
            prop_assert!((Temperature::from_customary(Temperature::to_customary(x)) - x).abs() < 1e-9);
            prop_assert!((Pressure::from_customary(Pressure::to_customary(x)) - x).abs() < 1e-9);
            prop_assert!((Speed::from_customary(Speed::to_customary(x)) - x).abs() < 1e-9);
        }
    }
}
