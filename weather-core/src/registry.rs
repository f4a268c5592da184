//! Catalog of provider implementations and the currently active instance.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::{
    config::Config,
    error::RegistryError,
    provider::{DataProvider, MockDataProvider, ProviderId, ProviderInstance},
};

pub type BuildFn = fn(&Config) -> anyhow::Result<Box<dyn DataProvider>>;

/// How to construct one provider implementation.
#[derive(Debug, Clone, Copy)]
pub struct ProviderFactory {
    pub id: ProviderId,
    pub build: BuildFn,
}

impl ProviderFactory {
    pub const fn new(id: ProviderId, build: BuildFn) -> Self {
        Self { id, build }
    }
}

/// Source of the factories a registry starts with.
pub trait ProviderDiscovery {
    fn discover(&self) -> Vec<ProviderFactory>;
}

/// Implementations shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProviders;

impl ProviderDiscovery for BuiltinProviders {
    fn discover(&self) -> Vec<ProviderFactory> {
        vec![ProviderFactory::new(ProviderId::MOCK, MockDataProvider::from_config)]
    }
}

/// Owns the catalog and the active provider. Share it behind an `Arc`.
#[derive(Debug)]
pub struct Registry {
    config: RwLock<Config>,
    catalog: Mutex<Vec<ProviderFactory>>,
    active: RwLock<Option<Arc<ProviderInstance>>>,
    // Held across the build + first refresh so switches don't interleave.
    switching: tokio::sync::Mutex<()>,
}

impl Registry {
    /// An empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            catalog: Mutex::new(Vec::new()),
            active: RwLock::new(None),
            switching: tokio::sync::Mutex::new(()),
        }
    }

    /// A registry pre-filled with everything `discovery` reports.
    pub fn init(config: Config, discovery: &dyn ProviderDiscovery) -> Self {
        let registry = Self::new(config);
        for factory in discovery.discover() {
            registry.register(factory);
        }
        tracing::info!(providers = registry.catalog.lock().len(), "registry initialized");
        registry
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Used for instances created after this call.
    pub fn set_config(&self, config: Config) {
        *self.config.write() = config;
    }

    /// Adds `factory` to the catalog. A duplicate id is logged and added anyway.
    pub fn register(&self, factory: ProviderFactory) {
        let mut catalog = self.catalog.lock();
        if catalog.iter().any(|f| f.id == factory.id) {
            tracing::warn!(provider = %factory.id, "provider already registered, adding it again");
        } else {
            tracing::debug!(provider = %factory.id, "provider registered");
        }
        catalog.push(factory);
    }

    /// Removes one registration of `id`. Returns `false` (and logs) when there
    /// was none.
    pub fn unregister(&self, id: ProviderId) -> bool {
        let mut catalog = self.catalog.lock();
        match catalog.iter().position(|f| f.id == id) {
            Some(index) => {
                catalog.remove(index);
                tracing::debug!(provider = %id, "provider unregistered");
                true
            }
            None => {
                tracing::error!(provider = %id, "cannot unregister provider that was never registered");
                false
            }
        }
    }

    pub fn has_provider(&self, id: ProviderId) -> bool {
        self.catalog.lock().iter().any(|f| f.id == id)
    }

    /// Registered ids in registration order, duplicates included.
    pub fn list_available(&self) -> Vec<ProviderId> {
        self.catalog.lock().iter().map(|f| f.id).collect()
    }

    /// Snapshot of the catalog, first registration of each id only.
    pub fn factories(&self) -> Vec<ProviderFactory> {
        let catalog = self.catalog.lock();
        let mut factories: Vec<ProviderFactory> = Vec::with_capacity(catalog.len());
        for factory in catalog.iter() {
            if !factories.iter().any(|f| f.id == factory.id) {
                factories.push(*factory);
            }
        }
        factories
    }

    /// Resolve a user-supplied name (case-insensitive) to a registered id.
    pub fn find(&self, name: &str) -> Result<ProviderId, RegistryError> {
        let factories = self.factories();
        factories
            .iter()
            .map(|f| f.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
                available: factories
                    .iter()
                    .map(|f| f.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Build `id`, make it active and refresh it once.
    ///
    /// When `id` is not registered or fails to build, the previously active
    /// provider stays active. A failed first refresh is logged and the new
    /// provider stays active with empty readings.
    pub async fn set_active(&self, id: ProviderId) -> Result<Arc<ProviderInstance>, RegistryError> {
        let _switching = self.switching.lock().await;

        let factory = self.catalog.lock().iter().find(|f| f.id == id).copied();
        let Some(factory) = factory else {
            tracing::error!(provider = %id, "cannot activate provider that is not registered");
            return Err(RegistryError::NotRegistered(id));
        };

        let config = self.config();
        let provider = (factory.build)(&config).map_err(|source| {
            tracing::error!(provider = %id, error = %source, "failed to create provider instance");
            RegistryError::Instantiation { id, source }
        })?;

        let instance = Arc::new(ProviderInstance::new(provider).with_timeout(config.refresh_timeout()));
        let previous = self.active.write().replace(Arc::clone(&instance));
        tracing::info!(
            provider = %id,
            previous = previous.as_ref().map(|p| p.id().as_str()),
            "active provider set"
        );

        if let Err(e) = instance.refresh().await {
            tracing::warn!(provider = %id, error = %e, "initial refresh failed");
        }

        Ok(instance)
    }

    pub fn active(&self) -> Option<Arc<ProviderInstance>> {
        self.active.read().clone()
    }

    /// Drop the active provider and empty the catalog.
    pub fn shutdown(&self) {
        let active = self.active.write().take();
        self.catalog.lock().clear();
        tracing::info!(had_active = active.is_some(), "registry shut down");
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    /// Collects formatted log lines emitted while `f` runs.
    fn captured_logs(f: impl FnOnce()) -> String {
        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    const BROKEN: ProviderId = ProviderId::new("broken");

    fn broken(_: &Config) -> anyhow::Result<Box<dyn DataProvider>> {
        anyhow::bail!("missing credentials")
    }

    fn mock_factory() -> ProviderFactory {
        ProviderFactory::new(ProviderId::MOCK, MockDataProvider::from_config)
    }

    #[test]
    fn duplicate_registration_is_tolerated() {
        let registry = Registry::new(Config::default());
        registry.register(mock_factory());
        registry.register(mock_factory());

        assert!(registry.has_provider(ProviderId::MOCK));
        assert_eq!(registry.list_available(), vec![ProviderId::MOCK, ProviderId::MOCK]);

        assert_eq!(registry.factories().len(), 1);

        assert!(registry.unregister(ProviderId::MOCK));
        assert!(registry.has_provider(ProviderId::MOCK));
        assert!(registry.unregister(ProviderId::MOCK));
        assert!(!registry.has_provider(ProviderId::MOCK));
    }

    #[test]
    fn duplicate_registration_logs_a_conflict() {
        let registry = Registry::new(Config::default());
        let first = captured_logs(|| registry.register(mock_factory()));
        assert!(first.is_empty(), "{first}");

        let second = captured_logs(|| registry.register(mock_factory()));
        assert!(second.contains("WARN"), "{second}");
        assert!(second.contains("provider already registered"), "{second}");
        assert!(second.contains("provider=mock"), "{second}");
    }

    #[test]
    fn unregister_missing_is_a_no_op() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        let logs = captured_logs(|| assert!(!registry.unregister(BROKEN)));
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("provider=broken"), "{logs}");
        assert_eq!(registry.list_available(), vec![ProviderId::MOCK]);
    }

    #[test]
    fn find_is_case_insensitive() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        assert_eq!(registry.find("MOCK").unwrap(), ProviderId::MOCK);

        let err = registry.find("scraper").unwrap_err();
        assert!(matches!(err, RegistryError::Unknown { .. }));
        assert!(err.to_string().contains("Registered providers: mock"));
    }

    #[tokio::test]
    async fn set_active_builds_and_refreshes() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        assert!(registry.active().is_none());

        let instance = registry.set_active(ProviderId::MOCK).await.unwrap();
        assert_eq!(instance.id(), ProviderId::MOCK);
        assert!(instance.current_temperature().is_some());
        assert!(Arc::ptr_eq(&instance, &registry.active().unwrap()));
    }

    #[tokio::test]
    async fn unregistered_provider_keeps_previous_active() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        let first = registry.set_active(ProviderId::MOCK).await.unwrap();

        let err = registry.set_active(BROKEN).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered(id) if id == BROKEN));
        assert!(Arc::ptr_eq(&first, &registry.active().unwrap()));
    }

    #[tokio::test]
    async fn failing_factory_keeps_previous_active() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        registry.register(ProviderFactory::new(BROKEN, broken));
        let first = registry.set_active(ProviderId::MOCK).await.unwrap();

        let err = registry.set_active(BROKEN).await.unwrap_err();
        assert!(matches!(err, RegistryError::Instantiation { id, .. } if id == BROKEN));
        assert!(err.to_string().contains("missing credentials"));
        assert!(Arc::ptr_eq(&first, &registry.active().unwrap()));
    }

    #[tokio::test]
    async fn new_instances_use_current_config() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        let mut config = registry.config();
        config.mock.hourly_count = 3;
        registry.set_config(config);

        let instance = registry.set_active(ProviderId::MOCK).await.unwrap();
        assert_eq!(instance.hourly_forecast().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn shutdown_clears_everything() {
        let registry = Registry::init(Config::default(), &BuiltinProviders);
        registry.set_active(ProviderId::MOCK).await.unwrap();
        registry.shutdown();
        assert!(registry.active().is_none());
        assert!(registry.list_available().is_empty());
    }
}
