//! Geographic coordinates and their textual formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Precision;

/// How [`Coordinates`] render through `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    /// `(47.6062, -122.3321)`
    #[default]
    Raw,
    /// `(47.606°, -122.332°)`
    DecimalDegrees,
    /// `(47.606°N, 122.332°W)`
    DecimalDegreesWithQuadrant,
    /// `(47° 36' 22.32"N, 122° 19' 55.56"W)`
    DegreesMinutesSeconds,
}

/// Degrees, minutes and seconds of one angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    /// South of the equator or west of the prime meridian.
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    pub fn from_decimal(decimal: f64) -> Self {
        let magnitude = decimal.abs();
        let degrees = magnitude.trunc();
        let total_minutes = (magnitude - degrees) * 60.0;
        let minutes = total_minutes.trunc();
        Self {
            negative: decimal < 0.0,
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds: (total_minutes - minutes) * 60.0,
        }
    }

    /// Round the seconds, carrying a full minute into minutes and degrees.
    pub fn rounded(self, precision: Precision) -> Self {
        let mut dms = self;
        dms.seconds = precision.round(self.seconds);
        if dms.seconds >= 60.0 {
            dms.seconds -= 60.0;
            dms.minutes += 1;
        }
        if dms.minutes >= 60 {
            dms.minutes -= 60;
            dms.degrees += 1;
        }
        dms
    }

    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0;
        if self.negative { -magnitude } else { magnitude }
    }
}

/// A point on the earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "is_raw")]
    pub format: DisplayFormat,
}

fn is_raw(format: &DisplayFormat) -> bool {
    *format == DisplayFormat::Raw
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            format: DisplayFormat::Raw,
        }
    }

    pub fn from_dms(latitude: Dms, longitude: Dms) -> Self {
        Self::new(latitude.to_decimal(), longitude.to_decimal())
    }

    pub fn with_format(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }

    pub fn latitude_dms(&self) -> Dms {
        Dms::from_decimal(self.latitude)
    }

    pub fn longitude_dms(&self) -> Dms {
        Dms::from_decimal(self.longitude)
    }

    fn latitude_quadrant(&self) -> char {
        if self.latitude < 0.0 { 'S' } else { 'N' }
    }

    fn longitude_quadrant(&self) -> char {
        if self.longitude < 0.0 { 'W' } else { 'E' }
    }

    pub fn render(&self, format: DisplayFormat) -> String {
        let p = Precision::DEFAULT;
        match format {
            DisplayFormat::Raw => format!("({}, {})", self.latitude, self.longitude),
            DisplayFormat::DecimalDegrees => {
                format!("({}°, {}°)", p.format(self.latitude), p.format(self.longitude))
            }
            DisplayFormat::DecimalDegreesWithQuadrant => format!(
                "({}°{}, {}°{})",
                p.format(self.latitude.abs()),
                self.latitude_quadrant(),
                p.format(self.longitude.abs()),
                self.longitude_quadrant(),
            ),
            DisplayFormat::DegreesMinutesSeconds => format!(
                "({}, {})",
                render_dms(self.latitude_dms(), self.latitude_quadrant()),
                render_dms(self.longitude_dms(), self.longitude_quadrant()),
            ),
        }
    }
}

fn render_dms(dms: Dms, quadrant: char) -> String {
    let precision = Precision::new(2);
    let dms = dms.rounded(precision);
    format!(
        "{}° {}' {}\"{}",
        dms.degrees,
        dms.minutes,
        precision.format(dms.seconds),
        quadrant
    )
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(self.format))
    }
}
