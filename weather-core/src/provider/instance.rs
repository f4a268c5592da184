//! A constructed provider together with its refresh state and last readings.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{DataProvider, FeatureSet, ProviderId, ProviderInformation, RateLimit, RefreshGovernor};
use crate::{
    error::RefreshError,
    model::{DailyForecast, HourlyForecast, WeatherSnapshot, Wind},
    units::{Pressure, Temperature, UnitValue},
};

pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a refresh attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New readings were fetched and stored.
    Refreshed,
    /// The rate limit window is still open; nothing changed.
    TooSoon { next_allowed: DateTime<Utc> },
}

/// Owns one [`DataProvider`], its [`RefreshGovernor`] and the readings from
/// the last successful fetch.
///
/// Getters return `None` until the first fetch succeeds. A failed or timed-out
/// fetch keeps whatever was there before.
#[derive(Debug)]
pub struct ProviderInstance {
    provider: Box<dyn DataProvider>,
    governor: RefreshGovernor,
    readings: RwLock<Option<Arc<WeatherSnapshot>>>,
    timeout: Duration,
}

impl ProviderInstance {
    pub fn new(provider: Box<dyn DataProvider>) -> Self {
        let governor = RefreshGovernor::new(provider.rate_limit());
        Self {
            provider,
            governor,
            readings: RwLock::new(None),
            timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn id(&self) -> ProviderId {
        self.provider.info().implementation_id
    }

    pub fn info(&self) -> &ProviderInformation {
        self.provider.info()
    }

    pub fn features(&self) -> &FeatureSet {
        self.provider.features()
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.governor.rate_limit()
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.governor.last_update()
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        self.refresh_at(Utc::now()).await
    }

    /// Refresh as if the current time were `now`.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<RefreshOutcome, RefreshError> {
        let id = self.id();

        if !self.governor.try_acquire(now) {
            let next_allowed = self.governor.next_allowed();
            tracing::info!(provider = %id, %next_allowed, "too early to refresh, keeping current readings");
            return Ok(RefreshOutcome::TooSoon { next_allowed });
        }

        tracing::info!(provider = %id, "refreshing data");

        let snapshot = match tokio::time::timeout(self.timeout, self.provider.fetch()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(source)) => {
                tracing::warn!(provider = %id, error = %source, "refresh failed, keeping previous readings");
                return Err(RefreshError::Fetch { provider: id, source });
            }
            Err(_) => {
                tracing::warn!(provider = %id, timeout = ?self.timeout, "refresh timed out, keeping previous readings");
                return Err(RefreshError::Timeout {
                    provider: id,
                    timeout: self.timeout,
                });
            }
        };

        *self.readings.write() = Some(Arc::new(snapshot));
        tracing::info!(provider = %id, "data refreshed");
        Ok(RefreshOutcome::Refreshed)
    }

    /// Everything from the last successful fetch.
    pub fn snapshot(&self) -> Option<Arc<WeatherSnapshot>> {
        self.readings.read().clone()
    }

    fn read<T>(&self, f: impl FnOnce(&WeatherSnapshot) -> T) -> Option<T> {
        self.readings.read().as_deref().map(f)
    }

    pub fn current_temperature(&self) -> Option<UnitValue<Temperature>> {
        self.read(|s| s.current_temperature)
    }

    pub fn relative_temperature(&self) -> Option<UnitValue<Temperature>> {
        self.read(|s| s.relative_temperature)
    }

    pub fn high_temperature(&self) -> Option<UnitValue<Temperature>> {
        self.read(|s| s.high_temperature)
    }

    pub fn low_temperature(&self) -> Option<UnitValue<Temperature>> {
        self.read(|s| s.low_temperature)
    }

    pub fn humidity(&self) -> Option<u8> {
        self.read(|s| s.humidity)
    }

    pub fn wind(&self) -> Option<Wind> {
        self.read(|s| s.wind)
    }

    pub fn pressure(&self) -> Option<UnitValue<Pressure>> {
        self.read(|s| s.pressure)
    }

    pub fn uv_index(&self) -> Option<u32> {
        self.read(|s| s.uv_index)
    }

    pub fn air_quality_index(&self) -> Option<u32> {
        self.read(|s| s.air_quality_index)
    }

    pub fn sunrise(&self) -> Option<DateTime<Utc>> {
        self.read(|s| s.sunrise)
    }

    pub fn sunset(&self) -> Option<DateTime<Utc>> {
        self.read(|s| s.sunset)
    }

    pub fn hourly_forecast(&self) -> Option<Vec<HourlyForecast>> {
        self.read(|s| s.hourly.clone())
    }

    pub fn daily_forecast(&self) -> Option<Vec<DailyForecast>> {
        self.read(|s| s.daily.clone())
    }
}
