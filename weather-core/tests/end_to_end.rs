use std::sync::Arc;

use weather_core::{
    BuiltinProviders, Config, Locale, ProviderId, Registry, RefreshOutcome, RegistryError,
    datagen::Preset,
    units::{Temperature, UnitValue},
};

fn fahrenheit(celsius: f64) -> f64 {
    UnitValue::<Temperature>::new(celsius, Locale::Si).value_in(Locale::Customary)
}

#[tokio::test]
async fn mock_provider_through_registry() {
    let registry = Registry::new(Config::default());
    for factory in weather_core::ProviderDiscovery::discover(&BuiltinProviders) {
        registry.register(factory);
    }
    assert!(registry.has_provider(ProviderId::MOCK));

    let instance = registry.set_active(ProviderId::MOCK).await.unwrap();

    let current = instance.current_temperature().unwrap();
    let range = Preset::TemperatureWarm.range();
    let f = current.value_in(Locale::Customary);
    assert!(
        (fahrenheit(range.min)..=fahrenheit(range.max)).contains(&f),
        "{f} outside warm preset"
    );

    let hourly = instance.hourly_forecast().unwrap();
    assert_eq!(*hourly[0].temperature(), current);
    assert_eq!(instance.daily_forecast().unwrap().len(), 7);
}

#[tokio::test]
async fn unlimited_mock_refreshes_every_time() {
    let registry = Registry::init(Config::default(), &BuiltinProviders);
    let instance = registry.set_active(ProviderId::MOCK).await.unwrap();
    let first = instance.snapshot().unwrap();

    assert_eq!(instance.refresh().await.unwrap(), RefreshOutcome::Refreshed);
    let second = instance.snapshot().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn customary_config_renders_fahrenheit() {
    let config = Config {
        locale: Locale::Customary,
        ..Config::default()
    };
    let registry = Registry::init(config, &BuiltinProviders);
    let instance = registry.set_active(ProviderId::MOCK).await.unwrap();

    let snapshot = instance.snapshot().unwrap();
    assert_eq!(snapshot.current_temperature.unit_string(), "F");
    assert!(snapshot.current_temperature.render().ends_with("° F"));

    let si = snapshot.as_ref().clone().with_locale(Locale::Si);
    assert_eq!(si.current_temperature.unit_string(), "C");
    assert_eq!(
        si.current_temperature.value(),
        snapshot.current_temperature.value_in(Locale::Si)
    );
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let registry = Registry::init(Config::default(), &BuiltinProviders);
    let active = registry.set_active(ProviderId::MOCK).await.unwrap();

    let err = registry
        .set_active(ProviderId::new("scraper"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotRegistered(_)));
    assert_eq!(registry.active().unwrap().id(), active.id());
}
