use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{self, Debug};

use crate::model::WeatherSnapshot;

pub mod governor;
pub mod instance;
pub mod metadata;
pub mod mock;

pub use governor::{RateLimit, RefreshGovernor, TimeUnit};
pub use instance::{ProviderInstance, RefreshOutcome};
pub use metadata::{
    FeatureSet, ProviderFeature, ProviderInformation, ProviderKind, parse_info_url,
    parse_updated_on,
};
pub use mock::MockDataProvider;

/// Stable identifier of a provider implementation, e.g. `"mock"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProviderId(&'static str);

impl ProviderId {
    pub const MOCK: ProviderId = ProviderId("mock");

    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source of weather readings.
///
/// Implementations only describe themselves and fetch. Rate limiting, caching
/// of the last readings and timeouts are handled by [`ProviderInstance`].
#[async_trait]
pub trait DataProvider: Send + Sync + Debug {
    fn info(&self) -> &ProviderInformation;

    fn features(&self) -> &FeatureSet;

    fn rate_limit(&self) -> RateLimit;

    /// Produce a full set of readings.
    async fn fetch(&self) -> anyhow::Result<WeatherSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_display_and_json() {
        assert_eq!(ProviderId::MOCK.to_string(), "mock");
        assert_eq!(ProviderId::new("mock"), ProviderId::MOCK);
        assert_eq!(serde_json::to_string(&ProviderId::MOCK).unwrap(), "\"mock\"");
    }
}
