use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::units::{
    CompassDirection, Locale, PrecipitationAmount, Pressure, Temperature, UnitValue, WindSpeed,
};

/// An immutable, order-preserving pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderedPair<A, B> {
    pub x: A,
    pub y: B,
}

impl<A, B> OrderedPair<A, B> {
    pub const fn new(x: A, y: B) -> Self {
        Self { x, y }
    }

    pub fn into_tuple(self) -> (A, B) {
        (self.x, self.y)
    }
}

impl<A, B> From<(A, B)> for OrderedPair<A, B> {
    fn from((x, y): (A, B)) -> Self {
        Self { x, y }
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for OrderedPair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An immutable, order-preserving triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderedTriplet<A, B, C> {
    pub x: A,
    pub y: B,
    pub z: C,
}

impl<A, B, C> OrderedTriplet<A, B, C> {
    pub const fn new(x: A, y: B, z: C) -> Self {
        Self { x, y, z }
    }

    pub fn into_tuple(self) -> (A, B, C) {
        (self.x, self.y, self.z)
    }
}

impl<A, B, C> From<(A, B, C)> for OrderedTriplet<A, B, C> {
    fn from((x, y, z): (A, B, C)) -> Self {
        Self { x, y, z }
    }
}

impl<A: fmt::Display, B: fmt::Display, C: fmt::Display> fmt::Display for OrderedTriplet<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Probability of precipitation in percent, and expected amount.
pub type Precipitation = OrderedPair<u8, UnitValue<PrecipitationAmount>>;

/// Bearing in degrees, its compass direction, and speed.
pub type Wind = OrderedTriplet<f64, CompassDirection, UnitValue<WindSpeed>>;

impl Precipitation {
    pub fn probability(&self) -> u8 {
        self.x
    }

    pub fn amount(&self) -> &UnitValue<PrecipitationAmount> {
        &self.y
    }

    /// No chance, no amount.
    pub fn none(locale: Locale) -> Self {
        Self::new(0, UnitValue::new(0.0, locale))
    }
}

impl Wind {
    pub fn bearing(&self) -> f64 {
        self.x
    }

    pub fn direction(&self) -> CompassDirection {
        self.y
    }

    pub fn speed(&self) -> &UnitValue<WindSpeed> {
        &self.z
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub temperature: UnitValue<Temperature>,
    pub relative_temperature: UnitValue<Temperature>,
    pub precipitation: Precipitation,
    pub wind: Wind,
    /// Percent, 0-100.
    pub cloud_cover: u8,
    /// Percent, 0-100.
    pub humidity: u8,
}

impl HourlyForecast {
    pub fn temperature(&self) -> &UnitValue<Temperature> {
        &self.temperature
    }

    fn set_locale(&mut self, locale: Locale) {
        self.temperature.set_locale(locale);
        self.relative_temperature.set_locale(locale);
        self.precipitation.y.set_locale(locale);
        self.wind.z.set_locale(locale);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub high_temperature: UnitValue<Temperature>,
    pub low_temperature: UnitValue<Temperature>,
    pub precipitation: Precipitation,
    pub wind: Wind,
    pub cloud_cover: u8,
    pub humidity: u8,
    pub uv_index: u32,
    pub air_quality_index: u32,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl DailyForecast {
    fn set_locale(&mut self, locale: Locale) {
        self.high_temperature.set_locale(locale);
        self.low_temperature.set_locale(locale);
        self.precipitation.y.set_locale(locale);
        self.wind.z.set_locale(locale);
    }
}

/// Everything a provider reports in one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub observed_at: DateTime<Utc>,
    pub current_temperature: UnitValue<Temperature>,
    pub relative_temperature: UnitValue<Temperature>,
    pub high_temperature: UnitValue<Temperature>,
    pub low_temperature: UnitValue<Temperature>,
    pub humidity: u8,
    pub wind: Wind,
    pub pressure: UnitValue<Pressure>,
    pub uv_index: u32,
    pub air_quality_index: u32,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
}

impl WeatherSnapshot {
    /// Switch every contained unit value to `locale`.
    pub fn set_locale(&mut self, locale: Locale) {
        self.current_temperature.set_locale(locale);
        self.relative_temperature.set_locale(locale);
        self.high_temperature.set_locale(locale);
        self.low_temperature.set_locale(locale);
        self.wind.z.set_locale(locale);
        self.pressure.set_locale(locale);
        self.hourly.iter_mut().for_each(|h| h.set_locale(locale));
        self.daily.iter_mut().for_each(|d| d.set_locale(locale));
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.set_locale(locale);
        self
    }
}
