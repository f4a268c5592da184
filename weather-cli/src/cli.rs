use std::{fmt::Display, sync::Arc};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select, Text};
use weather_core::{
    BuiltinProviders, Config, Coordinates, DataProvider, Locale, Preset, PresetKind,
    ProviderInstance, Registry, Specificity, WeatherSnapshot,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Print more log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered providers with their metadata and features.
    Providers,

    /// Refresh a provider and print its readings.
    Show {
        /// Provider short name, e.g. "mock". Defaults to the configured provider.
        #[arg(long)]
        provider: Option<String>,

        /// Unit system: SI, CUSTOMARY or MIXED. Defaults to the configured locale.
        #[arg(long)]
        locale: Option<Locale>,

        /// Print machine-readable JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Interactively edit the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Providers => providers(&config),
            Command::Show {
                provider,
                locale,
                json,
            } => show(config, provider.as_deref(), locale, json).await,
            Command::Configure => configure(config),
        }
    }
}

fn providers(config: &Config) -> anyhow::Result<()> {
    let registry = Registry::init(config.clone(), &BuiltinProviders);

    for factory in registry.factories() {
        match (factory.build)(config) {
            Ok(provider) => print!(
                "{}",
                output::provider_summary(provider.info(), provider.features(), provider.rate_limit())
            ),
            Err(e) => println!("{} (unavailable: {e:#})", factory.id),
        }
    }

    Ok(())
}

async fn show(
    config: Config,
    provider: Option<&str>,
    locale: Option<Locale>,
    json: bool,
) -> anyhow::Result<()> {
    let locale = locale.unwrap_or(config.locale);
    let location = config.location;
    let name = provider.unwrap_or(config.default_provider_name()).to_string();

    let registry = Registry::init(config, &BuiltinProviders);
    let id = registry.find(&name)?;
    tracing::debug!(provider = %id, %locale, json, "showing readings");
    let instance = registry.set_active(id).await?;

    let snapshot = readings(&instance)?.as_ref().clone().with_locale(locale);

    if json {
        let report = output::ShowReport {
            provider: instance.info(),
            location,
            readings: &snapshot,
        };
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize readings")?;
        println!("{text}");
    } else {
        println!("{}\n", instance.info());
        println!("{}", output::current(&snapshot, location.as_ref()));
        println!("{}", output::hourly(&snapshot.hourly));
        print!("{}", output::daily(&snapshot.daily));
    }

    registry.shutdown();
    Ok(())
}

/// The instance's latest snapshot, or an error pointing at the refresh log.
fn readings(instance: &ProviderInstance) -> anyhow::Result<Arc<WeatherSnapshot>> {
    instance.snapshot().ok_or_else(|| {
        let id = instance.id();
        tracing::warn!(provider = %id, "provider has no readings after its first refresh");
        anyhow!(
            "Provider '{id}' returned no data.\n\
             Hint: re-run with `-v` to see why the refresh failed."
        )
    })
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let registry = Registry::init(config.clone(), &BuiltinProviders);
    let ids: Vec<&'static str> = registry.factories().iter().map(|f| f.id.as_str()).collect();

    let current_provider = registry
        .find(config.default_provider_name())
        .map(|id| id.as_str())
        .unwrap_or(ids.first().copied().unwrap_or_default());
    let provider = select("Default provider:", ids, current_provider)?;
    config.default_provider = Some(provider.to_string());

    config.locale = select("Units:", Locale::all().to_vec(), config.locale)?;

    config.mock.max_wind_specificity = select(
        "Wind direction detail:",
        Specificity::all().to_vec(),
        config.mock.max_wind_specificity,
    )?;

    let temperatures: Vec<Preset> = Preset::of_kind(PresetKind::Temperature).collect();
    config.mock.warmth = select("Mock temperature range:", temperatures, config.mock.warmth)?;

    config.mock.precipitating = Confirm::new("Generate precipitation?")
        .with_default(config.mock.precipitating)
        .prompt()?;

    let current_location = config.location.map(|c| format!("{}, {}", c.latitude, c.longitude));
    let location = Text::new("Location as \"latitude, longitude\" (empty for none):")
        .with_initial_value(current_location.as_deref().unwrap_or_default())
        .prompt()?;
    config.location = parse_location(&location)?;

    config.save()?;
    tracing::debug!(provider, locale = %config.locale, "configuration updated");
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

/// `Select` with the cursor on `current`.
fn select<T: Display + PartialEq>(message: &str, options: Vec<T>, current: T) -> anyhow::Result<T> {
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Ok(Select::new(message, options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

/// Parse `"lat, lon"`; empty input clears the location.
fn parse_location(input: &str) -> anyhow::Result<Option<Coordinates>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected \"latitude, longitude\", got '{input}'"))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("Invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("Invalid longitude '{}'", lon.trim()))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(anyhow!("Coordinates out of range: {latitude}, {longitude}"));
    }

    Ok(Some(Coordinates::new(latitude, longitude)))
}
