//! Named bounds for synthetic readings and uniform sampling within them.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigurationError, units::Precision};

/// What a preset measures. Used to check that a configured preset fits the
/// field it is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetKind {
    Temperature,
    Humidity,
    WindDirection,
    WindSpeed,
    Pressure,
    UvIndex,
    AirQuality,
    PrecipitationChance,
    PrecipitationAmount,
    CloudCover,
    Hour,
    Minute,
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PresetKind::Temperature => "temperature",
            PresetKind::Humidity => "humidity",
            PresetKind::WindDirection => "wind direction",
            PresetKind::WindSpeed => "wind speed",
            PresetKind::Pressure => "pressure",
            PresetKind::UvIndex => "UV index",
            PresetKind::AirQuality => "air quality",
            PresetKind::PrecipitationChance => "precipitation chance",
            PresetKind::PrecipitationAmount => "precipitation amount",
            PresetKind::CloudCover => "cloud cover",
            PresetKind::Hour => "hour",
            PresetKind::Minute => "minute",
        })
    }
}

/// Closed interval plus how to draw from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetRange {
    pub min: f64,
    pub max: f64,
    /// Integers are drawn from `min..=max`; floats from `min..max`, then rounded.
    pub integer: bool,
    pub precision: Precision,
}

impl PresetRange {
    const fn int(min: i64, max: i64) -> Self {
        Self {
            min: min as f64,
            max: max as f64,
            integer: true,
            precision: Precision::new(0),
        }
    }

    const fn float(min: f64, max: f64, decimals: u8) -> Self {
        Self {
            min,
            max,
            integer: false,
            precision: Precision::new(decimals),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.integer {
            rng.random_range(self.min as i64..=self.max as i64) as f64
        } else {
            self.precision.round(rng.random_range(self.min..self.max))
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Preset {
    TemperatureCold,
    TemperatureCool,
    TemperatureWarm,
    TemperatureHot,
    HumidityLow,
    HumidityMedium,
    HumidityHigh,
    WindDirection,
    WindSpeedSlow,
    WindSpeedMedium,
    WindSpeedFast,
    PressureLow,
    PressureNormal,
    PressureHigh,
    UvIndexLow,
    UvIndexMedium,
    UvIndexHigh,
    UvIndexVeryHigh,
    UvIndexExtreme,
    AirQualityGood,
    AirQualityModerate,
    AirQualityUnhealthyForSensitiveGroups,
    AirQualityUnhealthy,
    AirQualityVeryUnhealthy,
    AirQualityHazardous,
    AirQualityExtremelyHazardous,
    PrecipitationChanceLow,
    PrecipitationChanceMedium,
    PrecipitationChanceHigh,
    PrecipitationChanceCertain,
    PrecipitationAmountLow,
    PrecipitationAmountMedium,
    PrecipitationAmountHigh,
    CloudCoverLow,
    CloudCoverMedium,
    CloudCoverHigh,
    SunriseHour,
    SunsetHour,
    TimeMinute,
}

impl Preset {
    pub const fn all() -> &'static [Preset] {
        use Preset::*;
        &[
            TemperatureCold,
            TemperatureCool,
            TemperatureWarm,
            TemperatureHot,
            HumidityLow,
            HumidityMedium,
            HumidityHigh,
            WindDirection,
            WindSpeedSlow,
            WindSpeedMedium,
            WindSpeedFast,
            PressureLow,
            PressureNormal,
            PressureHigh,
            UvIndexLow,
            UvIndexMedium,
            UvIndexHigh,
            UvIndexVeryHigh,
            UvIndexExtreme,
            AirQualityGood,
            AirQualityModerate,
            AirQualityUnhealthyForSensitiveGroups,
            AirQualityUnhealthy,
            AirQualityVeryUnhealthy,
            AirQualityHazardous,
            AirQualityExtremelyHazardous,
            PrecipitationChanceLow,
            PrecipitationChanceMedium,
            PrecipitationChanceHigh,
            PrecipitationChanceCertain,
            PrecipitationAmountLow,
            PrecipitationAmountMedium,
            PrecipitationAmountHigh,
            CloudCoverLow,
            CloudCoverMedium,
            CloudCoverHigh,
            SunriseHour,
            SunsetHour,
            TimeMinute,
        ]
    }

    /// Temperatures are °C, pressure mb, precipitation amount mm; the rest are
    /// unitless or percentages.
    pub const fn range(self) -> PresetRange {
        use Preset::*;
        match self {
            TemperatureCold => PresetRange::float(-6.0, 2.0, 1),
            TemperatureCool => PresetRange::float(2.0, 12.0, 1),
            TemperatureWarm => PresetRange::float(12.0, 20.0, 1),
            TemperatureHot => PresetRange::float(20.0, 32.0, 1),
            HumidityLow => PresetRange::int(0, 30),
            HumidityMedium => PresetRange::int(30, 70),
            HumidityHigh => PresetRange::int(70, 100),
            WindDirection => PresetRange::float(0.0, 360.0, 2),
            WindSpeedSlow => PresetRange::int(0, 6),
            WindSpeedMedium => PresetRange::int(7, 15),
            WindSpeedFast => PresetRange::int(16, 27),
            PressureLow => PresetRange::float(989.634, 1009.144, 3),
            PressureNormal => PresetRange::float(1009.144, 1022.689, 3),
            PressureHigh => PresetRange::float(1022.689, 1036.234, 3),
            UvIndexLow => PresetRange::int(0, 2),
            UvIndexMedium => PresetRange::int(2, 5),
            UvIndexHigh => PresetRange::int(5, 7),
            UvIndexVeryHigh => PresetRange::int(7, 11),
            UvIndexExtreme => PresetRange::int(11, 13),
            AirQualityGood => PresetRange::int(0, 50),
            AirQualityModerate => PresetRange::int(50, 100),
            AirQualityUnhealthyForSensitiveGroups => PresetRange::int(100, 150),
            AirQualityUnhealthy => PresetRange::int(150, 200),
            AirQualityVeryUnhealthy => PresetRange::int(200, 300),
            AirQualityHazardous => PresetRange::int(300, 500),
            AirQualityExtremelyHazardous => PresetRange::int(500, 1000),
            PrecipitationChanceLow => PresetRange::int(1, 25),
            PrecipitationChanceMedium => PresetRange::int(25, 50),
            PrecipitationChanceHigh => PresetRange::int(50, 75),
            PrecipitationChanceCertain => PresetRange::int(75, 100),
            PrecipitationAmountLow => PresetRange::float(0.0, 0.1, 2),
            PrecipitationAmountMedium => PresetRange::float(0.1, 0.5, 2),
            PrecipitationAmountHigh => PresetRange::float(0.5, 1.0, 2),
            CloudCoverLow => PresetRange::int(0, 25),
            CloudCoverMedium => PresetRange::int(25, 75),
            CloudCoverHigh => PresetRange::int(75, 100),
            SunriseHour => PresetRange::int(5, 7),
            SunsetHour => PresetRange::int(19, 21),
            TimeMinute => PresetRange::int(0, 59),
        }
    }

    pub const fn kind(self) -> PresetKind {
        use Preset::*;
        match self {
            TemperatureCold | TemperatureCool | TemperatureWarm | TemperatureHot => {
                PresetKind::Temperature
            }
            HumidityLow | HumidityMedium | HumidityHigh => PresetKind::Humidity,
            WindDirection => PresetKind::WindDirection,
            WindSpeedSlow | WindSpeedMedium | WindSpeedFast => PresetKind::WindSpeed,
            PressureLow | PressureNormal | PressureHigh => PresetKind::Pressure,
            UvIndexLow | UvIndexMedium | UvIndexHigh | UvIndexVeryHigh | UvIndexExtreme => {
                PresetKind::UvIndex
            }
            AirQualityGood
            | AirQualityModerate
            | AirQualityUnhealthyForSensitiveGroups
            | AirQualityUnhealthy
            | AirQualityVeryUnhealthy
            | AirQualityHazardous
            | AirQualityExtremelyHazardous => PresetKind::AirQuality,
            PrecipitationChanceLow
            | PrecipitationChanceMedium
            | PrecipitationChanceHigh
            | PrecipitationChanceCertain => PresetKind::PrecipitationChance,
            PrecipitationAmountLow | PrecipitationAmountMedium | PrecipitationAmountHigh => {
                PresetKind::PrecipitationAmount
            }
            CloudCoverLow | CloudCoverMedium | CloudCoverHigh => PresetKind::CloudCover,
            SunriseHour | SunsetHour => PresetKind::Hour,
            TimeMinute => PresetKind::Minute,
        }
    }

    /// All presets measuring `kind`, in table order.
    pub fn of_kind(kind: PresetKind) -> impl Iterator<Item = Preset> {
        Self::all().iter().copied().filter(move |p| p.kind() == kind)
    }

    pub fn as_str(&self) -> &'static str {
        use Preset::*;
        match self {
            TemperatureCold => "TEMPERATURE_COLD",
            TemperatureCool => "TEMPERATURE_COOL",
            TemperatureWarm => "TEMPERATURE_WARM",
            TemperatureHot => "TEMPERATURE_HOT",
            HumidityLow => "HUMIDITY_LOW",
            HumidityMedium => "HUMIDITY_MEDIUM",
            HumidityHigh => "HUMIDITY_HIGH",
            WindDirection => "WIND_DIRECTION",
            WindSpeedSlow => "WIND_SPEED_SLOW",
            WindSpeedMedium => "WIND_SPEED_MEDIUM",
            WindSpeedFast => "WIND_SPEED_FAST",
            PressureLow => "PRESSURE_LOW",
            PressureNormal => "PRESSURE_NORMAL",
            PressureHigh => "PRESSURE_HIGH",
            UvIndexLow => "UV_INDEX_LOW",
            UvIndexMedium => "UV_INDEX_MEDIUM",
            UvIndexHigh => "UV_INDEX_HIGH",
            UvIndexVeryHigh => "UV_INDEX_VERY_HIGH",
            UvIndexExtreme => "UV_INDEX_EXTREME",
            AirQualityGood => "AIR_QUALITY_GOOD",
            AirQualityModerate => "AIR_QUALITY_MODERATE",
            AirQualityUnhealthyForSensitiveGroups => "AIR_QUALITY_UNHEALTHY_FOR_SENSITIVE_GROUPS",
            AirQualityUnhealthy => "AIR_QUALITY_UNHEALTHY",
            AirQualityVeryUnhealthy => "AIR_QUALITY_VERY_UNHEALTHY",
            AirQualityHazardous => "AIR_QUALITY_HAZARDOUS",
            AirQualityExtremelyHazardous => "AIR_QUALITY_EXTREMELY_HAZARDOUS",
            PrecipitationChanceLow => "PRECIPITATION_CHANCE_LOW",
            PrecipitationChanceMedium => "PRECIPITATION_CHANCE_MEDIUM",
            PrecipitationChanceHigh => "PRECIPITATION_CHANCE_HIGH",
            PrecipitationChanceCertain => "PRECIPITATION_CHANCE_CERTAIN",
            PrecipitationAmountLow => "PRECIPITATION_AMOUNT_LOW",
            PrecipitationAmountMedium => "PRECIPITATION_AMOUNT_MEDIUM",
            PrecipitationAmountHigh => "PRECIPITATION_AMOUNT_HIGH",
            CloudCoverLow => "CLOUD_COVER_LOW",
            CloudCoverMedium => "CLOUD_COVER_MEDIUM",
            CloudCoverHigh => "CLOUD_COVER_HIGH",
            SunriseHour => "SUNRISE_HOUR",
            SunsetHour => "SUNSET_HOUR",
            TimeMinute => "TIME_MINUTE",
        }
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        self.range().sample(rng)
    }

    /// Sample rounded to a whole number.
    pub fn sample_whole<R: Rng + ?Sized>(self, rng: &mut R) -> i64 {
        self.sample(rng).round() as i64
    }

    /// Fails with [`ConfigurationError::PresetKind`] when this preset does not
    /// measure `expected`.
    pub fn expect_kind(
        self,
        field: &'static str,
        expected: PresetKind,
    ) -> Result<Self, ConfigurationError> {
        if self.kind() == expected {
            Ok(self)
        } else {
            Err(ConfigurationError::PresetKind {
                field,
                preset: self.as_str(),
                expected,
            })
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ConfigurationError::UnknownName {
                kind: "preset",
                value: s.to_string(),
            })
    }
}
