use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    datagen::{Preset, PresetKind},
    error::ConfigurationError,
    geo::Coordinates,
    provider::ProviderId,
    units::{Locale, Specificity},
};

/// One week of hourly entries.
pub const MAX_HOURLY_COUNT: usize = 168;
pub const MAX_DAILY_COUNT: usize = 16;

/// Knobs for the synthetic provider. Every preset field must name a preset of
/// the matching kind; see [`MockSettings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Wind direction is quantized to at most this many compass points.
    pub max_wind_specificity: Specificity,
    /// Range for the current and high temperature.
    pub warmth: Preset,
    /// Range for the low temperature.
    pub coldness: Preset,
    pub humidity: Preset,
    pub wind_speed: Preset,
    pub pressure: Preset,
    pub uv_index: Preset,
    pub air_quality: Preset,
    pub precipitation_chance: Preset,
    pub precipitation_amount: Preset,
    pub cloud_cover: Preset,
    /// When false every precipitation reading is `(0%, 0)`.
    pub precipitating: bool,
    pub hourly_count: usize,
    pub daily_count: usize,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            max_wind_specificity: Specificity::Ordinal,
            warmth: Preset::TemperatureWarm,
            coldness: Preset::TemperatureCool,
            humidity: Preset::HumidityMedium,
            wind_speed: Preset::WindSpeedFast,
            pressure: Preset::PressureNormal,
            uv_index: Preset::UvIndexMedium,
            air_quality: Preset::AirQualityGood,
            precipitation_chance: Preset::PrecipitationChanceMedium,
            precipitation_amount: Preset::PrecipitationAmountLow,
            cloud_cover: Preset::CloudCoverMedium,
            precipitating: true,
            hourly_count: 12,
            daily_count: 7,
        }
    }
}

impl MockSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.warmth.expect_kind("warmth", PresetKind::Temperature)?;
        self.coldness.expect_kind("coldness", PresetKind::Temperature)?;
        self.humidity.expect_kind("humidity", PresetKind::Humidity)?;
        self.wind_speed.expect_kind("wind_speed", PresetKind::WindSpeed)?;
        self.pressure.expect_kind("pressure", PresetKind::Pressure)?;
        self.uv_index.expect_kind("uv_index", PresetKind::UvIndex)?;
        self.air_quality.expect_kind("air_quality", PresetKind::AirQuality)?;
        self.precipitation_chance
            .expect_kind("precipitation_chance", PresetKind::PrecipitationChance)?;
        self.precipitation_amount
            .expect_kind("precipitation_amount", PresetKind::PrecipitationAmount)?;
        self.cloud_cover.expect_kind("cloud_cover", PresetKind::CloudCover)?;
        at_most("hourly_count", self.hourly_count, MAX_HOURLY_COUNT)?;
        at_most("daily_count", self.daily_count, MAX_DAILY_COUNT)?;
        Ok(())
    }
}

fn at_most(field: &'static str, value: usize, max: usize) -> Result<(), ConfigurationError> {
    if value > max {
        return Err(ConfigurationError::TooMany { field, value, max });
    }
    Ok(())
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "mock".
    pub default_provider: Option<String>,

    /// Unit system used when printing readings.
    pub locale: Locale,

    /// Upper bound for a single provider fetch.
    pub refresh_timeout_secs: u64,

    /// Example TOML:
    /// [location]
    /// latitude = 47.6062
    /// longitude = -122.3321
    pub location: Option<Coordinates>,

    pub mock: MockSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            locale: Locale::Si,
            refresh_timeout_secs: 30,
            location: None,
            mock: MockSettings::default(),
        }
    }
}

impl Config {
    /// Name of the default provider, falling back to the built-in mock.
    pub fn default_provider_name(&self) -> &str {
        self.default_provider
            .as_deref()
            .unwrap_or(ProviderId::MOCK.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.mock.validate()
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("weather-core-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.default_provider_name(), "mock");
        assert_eq!(cfg.locale, Locale::Si);
        assert_eq!(cfg.refresh_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.mock.max_wind_specificity, Specificity::Ordinal);
        assert_eq!(cfg.mock.warmth, Preset::TemperatureWarm);
        assert_eq!(cfg.mock.cloud_cover, Preset::CloudCoverMedium);
        assert!(cfg.mock.precipitating);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            locale = "CUSTOMARY"

            [mock]
            warmth = "TEMPERATURE_HOT"
            max_wind_specificity = "QUARTER_WIND"
            precipitating = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.locale, Locale::Customary);
        assert_eq!(cfg.mock.warmth, Preset::TemperatureHot);
        assert_eq!(cfg.mock.max_wind_specificity, Specificity::QuarterWind);
        assert!(!cfg.mock.precipitating);
        assert_eq!(cfg.mock.coldness, Preset::TemperatureCool);
        assert_eq!(cfg.mock.hourly_count, 12);
        assert_eq!(cfg.refresh_timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_mismatched_preset() {
        let mut cfg = Config::default();
        cfg.mock.warmth = Preset::HumidityLow;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::PresetKind {
                field: "warmth",
                expected: PresetKind::Temperature,
                ..
            }
        ));
    }

    #[test]
    fn validate_caps_forecast_lengths() {
        let mut cfg: Config = toml::from_str("[mock]\nhourly_count = 9223372036854775807\n").unwrap();
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::TooMany {
                field: "hourly_count",
                value: 9223372036854775807,
                max: MAX_HOURLY_COUNT,
            }
        );

        cfg.mock.hourly_count = MAX_HOURLY_COUNT;
        cfg.mock.daily_count = MAX_DAILY_COUNT + 1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigurationError::TooMany { field: "daily_count", .. })
        ));

        cfg.mock.daily_count = MAX_DAILY_COUNT;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn set_default_provider_overrides_fallback() {
        let mut cfg = Config::default();
        cfg.default_provider = Some("scraper".into());
        assert_eq!(cfg.default_provider_name(), "scraper");
        cfg.set_default_provider(ProviderId::MOCK);
        assert_eq!(cfg.default_provider.as_deref(), Some("mock"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = scratch_path("missing");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = scratch_path("roundtrip");
        let mut cfg = Config::default();
        cfg.locale = Locale::Mixed;
        cfg.location = Some(Coordinates::new(47.6062, -122.3321));
        cfg.mock.humidity = Preset::HumidityHigh;
        cfg.set_default_provider(ProviderId::MOCK);

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn load_reports_invalid_file() {
        let path = scratch_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[mock]\nhumidity = \"TEMPERATURE_HOT\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
