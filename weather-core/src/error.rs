//! Error types shared across the core crate.

use std::time::Duration;

use thiserror::Error;

use crate::{datagen::PresetKind, provider::ProviderId};

/// Invalid unit or locale setup. Fatal to the constructing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("the locale used for mixed mode cannot itself be MIXED")]
    MixedPreferenceIsMixed,

    #[error("unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    #[error("preset {preset} cannot be used for {field}; expected a {expected} preset")]
    PresetKind {
        field: &'static str,
        preset: &'static str,
        expected: PresetKind,
    },

    #[error("{field} is {value}, at most {max} is allowed")]
    TooMany {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

/// A string that should have been a URL or timestamp could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid URL '{input}': {reason}")]
    Url { input: String, reason: String },

    #[error("invalid date/time '{input}': {reason}")]
    DateTime { input: String, reason: String },
}

/// A provider fetch did not produce new readings.
///
/// Being refused by the rate limit is not an error; see
/// [`RefreshOutcome::TooSoon`](crate::provider::RefreshOutcome::TooSoon).
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("refresh of '{provider}' timed out after {timeout:?}")]
    Timeout {
        provider: ProviderId,
        timeout: Duration,
    },

    #[error("refresh of '{provider}' failed: {source}")]
    Fetch {
        provider: ProviderId,
        #[source]
        source: anyhow::Error,
    },
}

/// Registry misuse or a provider that could not be built.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("provider '{0}' is not registered")]
    NotRegistered(ProviderId),

    #[error("unknown provider '{name}'. Registered providers: {available}")]
    Unknown { name: String, available: String },

    #[error("failed to create an instance of provider '{id}': {source}")]
    Instantiation {
        id: ProviderId,
        #[source]
        source: anyhow::Error,
    },
}
