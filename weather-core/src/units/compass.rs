//! 32-point compass rose.
//!
//! Directions are positions in a fixed table ordered by bearing, 11.25° apart.
//! A point's [`Specificity`] follows from its index: every 8th point is
//! cardinal, every 4th ordinal, every 2nd a half-wind, the rest quarter-winds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

use crate::error::ConfigurationError;

/// Granularity of a compass reading. Ordered from coarse to fine; each level
/// includes all points of the coarser levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specificity {
    /// N, E, S, W.
    Cardinal,
    /// Adds NE, SE, SW, NW.
    Ordinal,
    /// Adds NNE, ENE, ...
    HalfWind,
    /// Adds NbE, NEbN, ...
    #[default]
    QuarterWind,
}

impl Specificity {
    pub const fn divisions(self) -> usize {
        match self {
            Specificity::Cardinal => 4,
            Specificity::Ordinal => 8,
            Specificity::HalfWind => 16,
            Specificity::QuarterWind => 32,
        }
    }

    pub const fn from_divisions(divisions: usize) -> Option<Self> {
        match divisions {
            4 => Some(Specificity::Cardinal),
            8 => Some(Specificity::Ordinal),
            16 => Some(Specificity::HalfWind),
            32 => Some(Specificity::QuarterWind),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Specificity::Cardinal => "CARDINAL",
            Specificity::Ordinal => "ORDINAL",
            Specificity::HalfWind => "HALF_WIND",
            Specificity::QuarterWind => "QUARTER_WIND",
        }
    }

    pub const fn all() -> &'static [Specificity] {
        &[
            Specificity::Cardinal,
            Specificity::Ordinal,
            Specificity::HalfWind,
            Specificity::QuarterWind,
        ]
    }

    const fn of_index(index: usize) -> Self {
        if index % 8 == 0 {
            Specificity::Cardinal
        } else if index % 4 == 0 {
            Specificity::Ordinal
        } else if index % 2 == 0 {
            Specificity::HalfWind
        } else {
            Specificity::QuarterWind
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specificity {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specificity::all()
            .iter()
            .copied()
            .find(|spec| spec.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownName {
                kind: "wind direction specificity",
                value: s.to_string(),
            })
    }
}

/// One row of the compass table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassPoint {
    pub bearing: f64,
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub specificity: Specificity,
}

const POINT_COUNT: usize = 32;
const SEGMENT_DEGREES: f64 = 360.0 / POINT_COUNT as f64;

const fn point(index: usize, abbreviation: &'static str, name: &'static str) -> CompassPoint {
    CompassPoint {
        bearing: index as f64 * SEGMENT_DEGREES,
        abbreviation,
        name,
        specificity: Specificity::of_index(index),
    }
}

/// All 32 points in bearing order, starting at north.
pub static COMPASS_ROSE: [CompassPoint; POINT_COUNT] = [
    point(0, "N", "North"),
    point(1, "NbE", "North by East"),
    point(2, "NNE", "North-northeast"),
    point(3, "NEbN", "Northeast by North"),
    point(4, "NE", "Northeast"),
    point(5, "NEbE", "Northeast by East"),
    point(6, "ENE", "East-northeast"),
    point(7, "EbN", "East by North"),
    point(8, "E", "East"),
    point(9, "EbS", "East by South"),
    point(10, "ESE", "East-southeast"),
    point(11, "SEbE", "Southeast by East"),
    point(12, "SE", "Southeast"),
    point(13, "SEbS", "Southeast by South"),
    point(14, "SSE", "South-southeast"),
    point(15, "SbE", "South by East"),
    point(16, "S", "South"),
    point(17, "SbW", "South by West"),
    point(18, "SSW", "South-southwest"),
    point(19, "SWbS", "Southwest by South"),
    point(20, "SW", "Southwest"),
    point(21, "SWbW", "Southwest by West"),
    point(22, "WSW", "West-southwest"),
    point(23, "WbS", "West by South"),
    point(24, "W", "West"),
    point(25, "WbN", "West by North"),
    point(26, "WNW", "West-northwest"),
    point(27, "NWbW", "Northwest by West"),
    point(28, "NW", "Northwest"),
    point(29, "NWbN", "Northwest by North"),
    point(30, "NNW", "North-northwest"),
    point(31, "NbW", "North by West"),
];

/// A direction on the 32-point rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompassDirection(u8);

impl CompassDirection {
    pub const N: Self = Self(0);
    pub const NE: Self = Self(4);
    pub const E: Self = Self(8);
    pub const SE: Self = Self(12);
    pub const S: Self = Self(16);
    pub const SW: Self = Self(20);
    pub const W: Self = Self(24);
    pub const NW: Self = Self(28);

    pub fn from_index(index: usize) -> Option<Self> {
        (index < POINT_COUNT).then(|| Self(index as u8))
    }

    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    pub fn all() -> impl Iterator<Item = CompassDirection> {
        (0..POINT_COUNT as u8).map(CompassDirection)
    }

    fn point(&self) -> &'static CompassPoint {
        &COMPASS_ROSE[self.index()]
    }

    pub fn abbreviation(&self) -> &'static str {
        self.point().abbreviation
    }

    pub fn name(&self) -> &'static str {
        self.point().name
    }

    pub fn specificity(&self) -> Specificity {
        self.point().specificity
    }

    /// Absolute bearing in degrees clockwise from north.
    pub fn bearing(&self) -> f64 {
        self.point().bearing
    }

    /// Snap `bearing` (any real number of degrees) to the nearest point that is
    /// representable at `specificity`.
    ///
    /// Non-finite bearings map to north.
    pub fn from_bearing(bearing: f64, specificity: Specificity) -> Self {
        let normalized = normalize_bearing(bearing);
        let divisions = specificity.divisions();
        let segment = 360.0 / divisions as f64;
        let index = (normalized / segment).round() as usize % divisions;
        // Points eligible at `specificity` are every `stride`-th table entry.
        let stride = POINT_COUNT / divisions;
        Self((index * stride) as u8)
    }

    /// [`from_bearing`](Self::from_bearing) at full 32-point resolution.
    pub fn from_bearing_default(bearing: f64) -> Self {
        Self::from_bearing(bearing, Specificity::QuarterWind)
    }
}

/// Map any bearing into `[0, 360)`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let normalized = ((bearing % 360.0) + 360.0) % 360.0;
    if normalized.is_finite() { normalized } else { 0.0 }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.abbreviation(), self.name())
    }
}

impl FromStr for CompassDirection {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CompassDirection::all()
            .find(|dir| dir.abbreviation().eq_ignore_ascii_case(s) || dir.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigurationError::UnknownName {
                kind: "compass direction",
                value: s.to_string(),
            })
    }
}

impl Serialize for CompassDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CompassDirection", 3)?;
        state.serialize_field("abbreviation", self.abbreviation())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("bearing", &self.bearing())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % 360.0;
        d.min(360.0 - d)
    }

    #[test]
    fn table_bearings_are_evenly_spaced() {
        for (i, p) in COMPASS_ROSE.iter().enumerate() {
            assert_eq!(p.bearing, i as f64 * 11.25);
        }
        assert_eq!(CompassDirection::NE.bearing(), 45.0);
        assert_eq!(CompassDirection::W.abbreviation(), "W");
    }

    #[test]
    fn specificity_follows_index() {
        assert_eq!(CompassDirection::N.specificity(), Specificity::Cardinal);
        assert_eq!(CompassDirection::NE.specificity(), Specificity::Ordinal);
        let nne = CompassDirection::from_index(2).unwrap();
        assert_eq!(nne.specificity(), Specificity::HalfWind);
        let nbe = CompassDirection::from_index(1).unwrap();
        assert_eq!(nbe.specificity(), Specificity::QuarterWind);
        assert_eq!(nbe.abbreviation(), "NbE");
    }

    #[test]
    fn specificity_levels_are_nested() {
        let count = |s: Specificity| CompassDirection::all().filter(|d| d.specificity() <= s).count();
        assert_eq!(count(Specificity::Cardinal), 4);
        assert_eq!(count(Specificity::Ordinal), 8);
        assert_eq!(count(Specificity::HalfWind), 16);
        assert_eq!(count(Specificity::QuarterWind), 32);
    }

    #[test]
    fn from_bearing_snaps_to_requested_level() {
        assert_eq!(CompassDirection::from_bearing(44.0, Specificity::Cardinal), CompassDirection::N);
        assert_eq!(CompassDirection::from_bearing(46.0, Specificity::Cardinal), CompassDirection::E);
        assert_eq!(CompassDirection::from_bearing(44.0, Specificity::Ordinal), CompassDirection::NE);
        assert_eq!(CompassDirection::from_bearing(350.0, Specificity::Cardinal), CompassDirection::N);
        assert_eq!(CompassDirection::from_bearing(-90.0, Specificity::Cardinal), CompassDirection::W);
        assert_eq!(CompassDirection::from_bearing(720.0 + 180.0, Specificity::Ordinal), CompassDirection::S);
        assert_eq!(CompassDirection::from_bearing(22.5, Specificity::HalfWind).abbreviation(), "NNE");
    }

    #[test]
    fn from_bearing_matches_filtered_table_lookup() {
        for spec in Specificity::all() {
            for tenth in 0..3600 {
                let bearing = f64::from(tenth) / 10.0;
                let divisions = spec.divisions();
                let index = (bearing / (360.0 / divisions as f64)).round() as usize % divisions;
                let expected = CompassDirection::all()
                    .filter(|d| d.specificity() <= *spec)
                    .nth(index)
                    .unwrap();
                assert_eq!(CompassDirection::from_bearing(bearing, *spec), expected);
            }
        }
    }

    #[test]
    fn non_finite_bearing_is_north() {
        assert_eq!(CompassDirection::from_bearing_default(f64::NAN), CompassDirection::N);
        assert_eq!(CompassDirection::from_bearing_default(f64::INFINITY), CompassDirection::N);
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(CompassDirection::SW.to_string(), "SW - Southwest");
        assert_eq!("nbw".parse::<CompassDirection>().unwrap().name(), "North by West");
        assert_eq!("East".parse::<CompassDirection>().unwrap(), CompassDirection::E);
        assert!("up".parse::<CompassDirection>().is_err());
        assert_eq!("half_wind".parse::<Specificity>().unwrap(), Specificity::HalfWind);
    }

    #[test]
    fn divisions_round_trip() {
        for spec in Specificity::all() {
            assert_eq!(Specificity::from_divisions(spec.divisions()), Some(*spec));
        }
        assert_eq!(Specificity::from_divisions(12), None);
    }

    proptest! {
        #[test]
        fn quarter_wind_is_within_half_segment(b in -10_000.0f64..10_000.0) {
            let dir = CompassDirection::from_bearing(b, Specificity::QuarterWind);
            let normalized = normalize_bearing(b);
            prop_assert!(angular_distance(dir.bearing(), normalized) <= 5.625 + 1e-9);
        }

        #[test]
        fn requantizing_a_point_is_idempotent(index in 0usize..32, spec_idx in 0usize..4) {
            let dir = CompassDirection::from_index(index).unwrap();
            let spec = Specificity::all()[spec_idx];
            prop_assume!(dir.specificity() <= spec);
            prop_assert_eq!(CompassDirection::from_bearing(dir.bearing(), spec), dir);
        }
    }
}
