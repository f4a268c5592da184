//! Human-readable rendering of provider metadata and readings.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use weather_core::{
    Coordinates, DailyForecast, HourlyForecast, WeatherSnapshot,
    model::{Precipitation, Wind},
    provider::{FeatureSet, ProviderInformation, RateLimit},
};

/// Everything `weather show --json` prints.
#[derive(Debug, Serialize)]
pub struct ShowReport<'a> {
    pub provider: &'a ProviderInformation,
    pub location: Option<Coordinates>,
    pub readings: &'a WeatherSnapshot,
}

fn time(t: DateTime<Utc>) -> String {
    t.format("%H:%M UTC").to_string()
}

fn wind(w: &Wind) -> String {
    format!(
        "{} from {} ({}°)",
        w.speed(),
        w.direction().abbreviation(),
        w.bearing().round()
    )
}

fn precipitation(p: &Precipitation) -> String {
    format!("{:>3}% {}", p.probability(), p.amount())
}

pub fn provider_summary(info: &ProviderInformation, features: &FeatureSet, limit: RateLimit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", info.implementation_id, info.kind);
    let _ = writeln!(out, "  {info}");
    if let Some(url) = &info.info_url {
        let _ = writeln!(out, "  More info: {url}");
    }
    let _ = writeln!(out, "  Refresh limit: {limit}");
    if let Some(spec) = features.max_wind_specificity() {
        let _ = writeln!(out, "  Wind directions: {} points", spec.divisions());
    }
    let _ = writeln!(out, "  Features:");
    for feature in features.iter() {
        let _ = writeln!(out, "    - {feature}");
    }
    out
}

pub fn current(snapshot: &WeatherSnapshot, location: Option<&Coordinates>) -> String {
    let s = snapshot;
    let mut out = String::new();
    if let Some(location) = location {
        let _ = writeln!(out, "Location   {location}");
    }
    let _ = writeln!(
        out,
        "Now        {} (feels like {})",
        s.current_temperature, s.relative_temperature
    );
    let _ = writeln!(out, "High/Low   {} / {}", s.high_temperature, s.low_temperature);
    let _ = writeln!(out, "Humidity   {}%", s.humidity);
    let _ = writeln!(out, "Wind       {}", wind(&s.wind));
    let _ = writeln!(out, "Pressure   {}", s.pressure);
    let _ = writeln!(out, "UV index   {}", s.uv_index);
    let _ = writeln!(out, "AQI        {}", s.air_quality_index);
    let _ = writeln!(out, "Sunrise    {}", time(s.sunrise));
    let _ = writeln!(out, "Sunset     {}", time(s.sunset));
    out
}

pub fn hourly(hours: &[HourlyForecast]) -> String {
    let mut out = String::from("Hourly\n");
    for (i, h) in hours.iter().enumerate() {
        let _ = writeln!(
            out,
            "  +{i:>2}h  {:>9}  precip {:<12}  clouds {:>3}%  humidity {:>3}%  wind {}",
            h.temperature.to_string(),
            precipitation(&h.precipitation),
            h.cloud_cover,
            h.humidity,
            wind(&h.wind),
        );
    }
    out
}

pub fn daily(days: &[DailyForecast]) -> String {
    let mut out = String::from("Daily\n");
    for d in days {
        let _ = writeln!(
            out,
            "  {}  {:>9} / {:<9}  precip {:<12}  UV {:>2}  AQI {:>3}  sun {} - {}",
            d.sunrise.format("%a %m-%d"),
            d.high_temperature.to_string(),
            d.low_temperature.to_string(),
            precipitation(&d.precipitation),
            d.uv_index,
            d.air_quality_index,
            d.sunrise.format("%H:%M"),
            d.sunset.format("%H:%M"),
        );
    }
    out
}
