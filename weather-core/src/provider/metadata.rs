//! Descriptive metadata a provider publishes about itself.

use std::{collections::BTreeSet, fmt};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use url::Url;

use super::ProviderId;
use crate::{error::ParseError, units::Specificity};

/// Where a provider's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderKind {
    Api,
    Website,
    /// Synthetic data, no upstream source.
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Api => "API",
            ProviderKind::Website => "website",
            ProviderKind::Mock => "mock",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInformation {
    pub kind: ProviderKind,
    pub implementation_id: ProviderId,
    pub friendly_name: String,
    pub owner: String,
    pub info_url: Option<Url>,
    pub last_updated_on: Option<NaiveDateTime>,
}

impl fmt::Display for ProviderInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Data provided by {}", self.friendly_name, self.owner)?;
        if let Some(updated) = self.last_updated_on {
            write!(f, " (Updated on {})", updated.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

pub fn parse_info_url(input: &str) -> Result<Url, ParseError> {
    Url::parse(input).map_err(|e| ParseError::Url {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Accepts `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
pub fn parse_updated_on(input: &str) -> Result<NaiveDateTime, ParseError> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| ParseError::DateTime {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// A capability a provider claims to support. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderFeature {
    LiveTemperature,
    HighTemperature,
    LowTemperature,
    Pressure,
    Precipitation,
    PrecipitationProbability,
    Sunrise,
    Sunset,
    Humidity,
    UvIndex,
    AirQualityIndex,
    WindSpeed,
    WindDirectionDegrees,
    #[serde(rename = "WIND_DIRECTION_CARDINALS_4")]
    WindDirectionCardinals4,
    #[serde(rename = "WIND_DIRECTION_CARDINALS_8")]
    WindDirectionCardinals8,
    #[serde(rename = "WIND_DIRECTION_CARDINALS_16")]
    WindDirectionCardinals16,
    #[serde(rename = "WIND_DIRECTION_CARDINALS_32")]
    WindDirectionCardinals32,
}

impl ProviderFeature {
    pub fn description(&self) -> &'static str {
        match self {
            Self::LiveTemperature => "Supports temperature readouts",
            Self::HighTemperature => "Supports high temperature readouts",
            Self::LowTemperature => "Supports low temperature readouts",
            Self::Pressure => "Supports pressure readouts",
            Self::Precipitation => "Supports precipitation readouts",
            Self::PrecipitationProbability => "Supports precipitation probability readouts",
            Self::Sunrise => "Supports sunrise times",
            Self::Sunset => "Supports sunset times",
            Self::Humidity => "Supports humidity readouts",
            Self::UvIndex => "Supports UV index readouts",
            Self::AirQualityIndex => "Supports air quality index readouts",
            Self::WindSpeed => "Supports wind speed readouts",
            Self::WindDirectionDegrees => "Reports wind direction in degrees",
            Self::WindDirectionCardinals4 => "Only reports wind direction in cardinal directions",
            Self::WindDirectionCardinals8 => {
                "Reports wind direction in cardinal and ordinal directions"
            }
            Self::WindDirectionCardinals16 => {
                "Reports wind direction in cardinal, ordinal, and half-wind directions"
            }
            Self::WindDirectionCardinals32 => {
                "Reports wind direction in cardinal and ordinal, along with half- and quarter-wind directions"
            }
        }
    }

    /// Compass granularity implied by a `WindDirectionCardinals*` flag.
    pub fn wind_specificity(&self) -> Option<Specificity> {
        match self {
            Self::WindDirectionCardinals4 => Some(Specificity::Cardinal),
            Self::WindDirectionCardinals8 => Some(Specificity::Ordinal),
            Self::WindDirectionCardinals16 => Some(Specificity::HalfWind),
            Self::WindDirectionCardinals32 => Some(Specificity::QuarterWind),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The capabilities declared by one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet(BTreeSet<ProviderFeature>);

impl FeatureSet {
    pub fn contains(&self, feature: ProviderFeature) -> bool {
        self.0.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = ProviderFeature> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finest compass granularity the provider declares, if any.
    pub fn max_wind_specificity(&self) -> Option<Specificity> {
        self.iter().filter_map(|f| f.wind_specificity()).max()
    }
}

impl FromIterator<ProviderFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = ProviderFeature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[ProviderFeature; N]> for FeatureSet {
    fn from(features: [ProviderFeature; N]) -> Self {
        features.into_iter().collect()
    }
}
