//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - A unit-of-measure model that renders one canonical value in SI, customary or mixed units
//! - A 32-point compass model with bearing quantization
//! - The provider contract, its rate-limited refresh and the provider registry
//! - A synthetic provider driven by named presets
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod datagen;
pub mod error;
pub mod geo;
pub mod model;
pub mod provider;
pub mod registry;
pub mod units;

pub use config::{Config, MockSettings};
pub use datagen::{Preset, PresetKind};
pub use error::{ConfigurationError, ParseError, RefreshError, RegistryError};
pub use geo::Coordinates;
pub use model::{DailyForecast, HourlyForecast, WeatherSnapshot};
pub use provider::{DataProvider, ProviderId, ProviderInstance, RefreshOutcome};
pub use registry::{BuiltinProviders, ProviderDiscovery, ProviderFactory, Registry};
pub use units::{CompassDirection, Locale, Specificity, UnitValue};
