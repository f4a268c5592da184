//! Unit-of-measure model.
//!
//! A [`UnitValue`] stores one canonical SI value and renders it in whichever
//! [`Locale`] it is currently set to. Changing the locale never touches the
//! stored value; conversion happens on read.

use std::{fmt, marker::PhantomData, str::FromStr};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

use crate::error::ConfigurationError;

pub mod compass;
pub mod quantities;

pub use compass::{CompassDirection, Specificity};
pub use quantities::{PrecipitationAmount, Pressure, Speed, Temperature, WindSpeed};

/// Unit system used when reading or rendering a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Locale {
    /// Metric.
    #[default]
    Si,
    /// Imperial / US customary.
    Customary,
    /// Per-unit default: each quantity decides whether it reads as SI or customary.
    Mixed,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Si => "SI",
            Locale::Customary => "CUSTOMARY",
            Locale::Mixed => "MIXED",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::Si, Locale::Customary, Locale::Mixed]
    }

    /// Collapse `Mixed` into the given preference. `preference` is never `Mixed`
    /// for values built through the checked constructors.
    fn resolve(self, preference: Locale) -> Locale {
        match self {
            Locale::Mixed => preference,
            other => other,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SI" | "METRIC" => Ok(Locale::Si),
            "CUSTOMARY" | "IMPERIAL" | "US" => Ok(Locale::Customary),
            "MIXED" => Ok(Locale::Mixed),
            _ => Err(ConfigurationError::UnknownName {
                kind: "locale",
                value: s.to_string(),
            }),
        }
    }
}

/// Unit labels per locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStrings {
    si: &'static str,
    customary: &'static str,
    mixed: Locale,
}

impl UnitStrings {
    /// Fails when `mixed` is [`Locale::Mixed`].
    pub fn new(
        si: &'static str,
        customary: &'static str,
        mixed: Locale,
    ) -> Result<Self, ConfigurationError> {
        if mixed == Locale::Mixed {
            return Err(ConfigurationError::MixedPreferenceIsMixed);
        }
        Ok(Self { si, customary, mixed })
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        match locale.resolve(self.mixed) {
            Locale::Customary => self.customary,
            _ => self.si,
        }
    }

    pub fn mixed_preference(&self) -> Locale {
        self.mixed
    }
}

/// Maximum number of fractional digits shown when rendering. Trailing zeros
/// are dropped, so `21.50` with a precision of 3 renders as `21.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision(u8);

impl Precision {
    pub const DEFAULT: Precision = Precision(3);

    pub const fn new(max_decimals: u8) -> Self {
        Self(max_decimals)
    }

    pub fn max_decimals(&self) -> u8 {
        self.0
    }

    /// Round `value` to this precision, returning a number.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(i32::from(self.0));
        (value * factor).round() / factor
    }

    pub fn format(&self, value: f64) -> String {
        let mut s = format!("{:.*}", usize::from(self.0), value);
        if s.contains('.') {
            let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
            s.truncate(trimmed);
        }
        if s == "-0" {
            s.remove(0);
        }
        s
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A kind of physical quantity with a linear SI → customary mapping.
///
/// Implementations are zero-sized markers used as the type parameter of
/// [`UnitValue`]. The set of kinds is closed, so `MIXED` is known never to be
/// [`Locale::Mixed`]:
///
/// ```compile_fail
/// use weather_core::{Locale, units::Quantity};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Brightness;
///
/// impl Quantity for Brightness {
///     const SI_UNIT: &'static str = "lx";
///     const CUSTOMARY_UNIT: &'static str = "fc";
///     const MIXED: Locale = Locale::Mixed;
///
///     fn to_customary(si: f64) -> f64 { si / 10.764 }
///     fn from_customary(customary: f64) -> f64 { customary * 10.764 }
/// }
/// ```
pub trait Quantity: sealed::Sealed + fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    const SI_UNIT: &'static str;
    const CUSTOMARY_UNIT: &'static str;
    /// Locale that `Mixed` resolves to unless overridden per value.
    const MIXED: Locale;
    const PRECISION: Precision = Precision::DEFAULT;

    fn to_customary(si: f64) -> f64;

    fn from_customary(customary: f64) -> f64;

    fn render(value: &str, unit: &str) -> String {
        format!("{value} {unit}")
    }
}

/// A measured value of quantity `Q`, stored canonically in SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitValue<Q: Quantity> {
    value: f64,
    locale: Locale,
    strings: UnitStrings,
    precision: Precision,
    _quantity: PhantomData<Q>,
}

impl<Q: Quantity> UnitValue<Q> {
    /// Build from an SI value using the quantity's own mixed preference.
    pub fn new(value: f64, locale: Locale) -> Self {
        const { assert!(!matches!(Q::MIXED, Locale::Mixed), "MIXED must be SI or CUSTOMARY") };
        Self {
            value,
            locale,
            strings: UnitStrings {
                si: Q::SI_UNIT,
                customary: Q::CUSTOMARY_UNIT,
                mixed: Q::MIXED,
            },
            precision: Q::PRECISION,
            _quantity: PhantomData,
        }
    }

    /// Build from an SI value with an explicit mixed preference.
    pub fn with_mixed(value: f64, locale: Locale, mixed: Locale) -> Result<Self, ConfigurationError> {
        let strings = UnitStrings::new(Q::SI_UNIT, Q::CUSTOMARY_UNIT, mixed)?;
        Ok(Self {
            strings,
            ..Self::new(value, locale)
        })
    }

    /// Build from a value expressed in customary units.
    pub fn from_customary(value: f64, locale: Locale) -> Self {
        Self::new(Q::from_customary(value), locale)
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Value in the current locale.
    pub fn value(&self) -> f64 {
        self.value_in(self.locale)
    }

    pub fn value_in(&self, locale: Locale) -> f64 {
        match locale.resolve(self.strings.mixed) {
            Locale::Customary => Q::to_customary(self.value),
            _ => self.value,
        }
    }

    pub fn unit_string(&self) -> &'static str {
        self.strings.get(self.locale)
    }

    pub fn unit_string_in(&self, locale: Locale) -> &'static str {
        self.strings.get(locale)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Affects rendering only; the canonical value stays as it was.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn mixed_preference(&self) -> Locale {
        self.strings.mixed
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn render(&self) -> String {
        Q::render(&self.precision.format(self.value()), self.unit_string())
    }
}

impl<Q: Quantity> fmt::Display for UnitValue<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<Q: Quantity> Serialize for UnitValue<Q> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UnitValue", 4)?;
        state.serialize_field("value", &self.precision.round(self.value()))?;
        state.serialize_field("unit", self.unit_string())?;
        state.serialize_field("si_value", &self.value)?;
        state.serialize_field("display", &self.render())?;
        state.end()
    }
}
