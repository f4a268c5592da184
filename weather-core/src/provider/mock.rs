//! Provider producing plausible random readings from configured presets.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    DataProvider, FeatureSet, ProviderFeature, ProviderId, ProviderInformation, ProviderKind,
    RateLimit, parse_info_url, parse_updated_on,
};
use crate::{
    config::{Config, MockSettings},
    datagen::Preset,
    model::{DailyForecast, HourlyForecast, Precipitation, WeatherSnapshot, Wind},
    units::{
        CompassDirection, Locale, PrecipitationAmount, Pressure, Temperature, UnitValue, WindSpeed,
        compass::normalize_bearing,
    },
};

const INFO_URL: &str = "https://docs.rs/rand/latest/rand/";
const UPDATED_ON: &str = "2025-04-13T17:23:00";

/// Offset of the "feels like" temperature from the current one, in °C.
const RELATIVE_OFFSET: f64 = -2.0;
/// Offset of the daily high from the sampled warmth, in °C.
const HIGH_OFFSET: f64 = 7.0;

#[derive(Debug)]
pub struct MockDataProvider {
    info: ProviderInformation,
    features: FeatureSet,
    settings: MockSettings,
    locale: Locale,
    rng: Mutex<StdRng>,
}

impl MockDataProvider {
    pub fn new(settings: MockSettings, locale: Locale) -> anyhow::Result<Self> {
        Self::with_rng(settings, locale, StdRng::from_os_rng())
    }

    /// Deterministic output for a given seed.
    pub fn with_seed(settings: MockSettings, locale: Locale, seed: u64) -> anyhow::Result<Self> {
        Self::with_rng(settings, locale, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: MockSettings, locale: Locale, rng: StdRng) -> anyhow::Result<Self> {
        settings.validate()?;

        let info = ProviderInformation {
            kind: ProviderKind::Mock,
            implementation_id: ProviderId::MOCK,
            friendly_name: "Mock Data Provider".to_string(),
            owner: "pseudo-random numbers".to_string(),
            info_url: Some(parse_info_url(INFO_URL)?),
            last_updated_on: Some(parse_updated_on(UPDATED_ON)?),
        };

        Ok(Self {
            info,
            features: Self::feature_set(),
            settings,
            locale,
            rng: Mutex::new(rng),
        })
    }

    /// Factory entry point for the registry.
    pub fn from_config(config: &Config) -> anyhow::Result<Box<dyn DataProvider>> {
        Ok(Box::new(Self::new(config.mock.clone(), config.locale)?))
    }

    pub fn feature_set() -> FeatureSet {
        FeatureSet::from([
            ProviderFeature::LiveTemperature,
            ProviderFeature::HighTemperature,
            ProviderFeature::LowTemperature,
            ProviderFeature::Pressure,
            ProviderFeature::Precipitation,
            ProviderFeature::PrecipitationProbability,
            ProviderFeature::Sunrise,
            ProviderFeature::Sunset,
            ProviderFeature::Humidity,
            ProviderFeature::UvIndex,
            ProviderFeature::AirQualityIndex,
            ProviderFeature::WindSpeed,
            ProviderFeature::WindDirectionDegrees,
            ProviderFeature::WindDirectionCardinals32,
        ])
    }

    pub fn settings(&self) -> &MockSettings {
        &self.settings
    }

    /// Build one full set of readings relative to `now`.
    pub fn generate(&self, now: DateTime<Utc>) -> WeatherSnapshot {
        let mut guard = self.rng.lock();
        let mut generator = Generator {
            settings: &self.settings,
            locale: self.locale,
            rng: &mut *guard,
        };
        generator.snapshot(now)
    }
}

#[async_trait]
impl DataProvider for MockDataProvider {
    fn info(&self) -> &ProviderInformation {
        &self.info
    }

    fn features(&self) -> &FeatureSet {
        &self.features
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::UNLIMITED
    }

    async fn fetch(&self) -> anyhow::Result<WeatherSnapshot> {
        let snapshot = self.generate(Utc::now());
        tracing::debug!(
            temperature = %snapshot.current_temperature,
            hourly = snapshot.hourly.len(),
            daily = snapshot.daily.len(),
            "generated mock readings"
        );
        Ok(snapshot)
    }
}

struct Generator<'a, R: Rng + ?Sized> {
    settings: &'a MockSettings,
    locale: Locale,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> Generator<'_, R> {
    fn sample(&mut self, preset: Preset) -> f64 {
        preset.sample(&mut *self.rng)
    }

    fn percent(&mut self, preset: Preset) -> u8 {
        preset.sample_whole(&mut *self.rng).clamp(0, 100) as u8
    }

    fn index(&mut self, preset: Preset) -> u32 {
        preset.sample_whole(&mut *self.rng).max(0) as u32
    }

    fn temperature(&self, celsius: f64) -> UnitValue<Temperature> {
        UnitValue::new(celsius, self.locale)
    }

    fn wind(&mut self) -> Wind {
        let bearing = normalize_bearing(self.sample(Preset::WindDirection));
        let direction = CompassDirection::from_bearing(bearing, self.settings.max_wind_specificity);
        let speed = UnitValue::<WindSpeed>::new(self.sample(self.settings.wind_speed), self.locale);
        Wind::new(bearing, direction, speed)
    }

    fn precipitation(&mut self) -> Precipitation {
        if !self.settings.precipitating {
            return Precipitation::none(self.locale);
        }
        let chance = self.percent(self.settings.precipitation_chance);
        let amount = self.sample(self.settings.precipitation_amount);
        Precipitation::new(chance, UnitValue::<PrecipitationAmount>::new(amount, self.locale))
    }

    /// `midnight` plus a sampled hour from `hour` and a sampled minute.
    fn time_of_day(&mut self, midnight: DateTime<Utc>, hour: Preset) -> DateTime<Utc> {
        let hours = self.sample(hour) as i64;
        let minutes = self.sample(Preset::TimeMinute) as i64;
        midnight + TimeDelta::hours(hours) + TimeDelta::minutes(minutes)
    }

    fn snapshot(&mut self, now: DateTime<Utc>) -> WeatherSnapshot {
        let s = self.settings;

        let current = self.sample(s.warmth);
        let current_temperature = self.temperature(current);
        let relative_temperature = self.temperature(current + RELATIVE_OFFSET);
        let high_temperature = self.temperature(current + HIGH_OFFSET);
        let low = self.sample(s.coldness);
        let low_temperature = self.temperature(low);

        let humidity = self.percent(s.humidity);
        let wind = self.wind();
        let pressure = UnitValue::<Pressure>::new(self.sample(s.pressure), self.locale);
        let uv_index = self.index(s.uv_index);
        let air_quality_index = self.index(s.air_quality);

        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let sunrise = self.time_of_day(midnight, Preset::SunriseHour);
        let sunset = self.time_of_day(midnight, Preset::SunsetHour);

        let mut hourly = Vec::with_capacity(s.hourly_count);
        for i in 0..s.hourly_count {
            let precipitation = self.precipitation();
            let cloud_cover = self.percent(s.cloud_cover);

            if i == 0 {
                hourly.push(HourlyForecast {
                    temperature: current_temperature,
                    relative_temperature,
                    precipitation,
                    wind,
                    cloud_cover,
                    humidity,
                });
                continue;
            }

            let t = self.sample(s.warmth);
            hourly.push(HourlyForecast {
                temperature: self.temperature(t),
                relative_temperature: self.temperature(t + RELATIVE_OFFSET),
                precipitation,
                wind: self.wind(),
                cloud_cover,
                humidity: self.percent(s.humidity),
            });
        }

        let mut daily = Vec::with_capacity(s.daily_count);
        for i in 0..s.daily_count {
            let precipitation = self.precipitation();
            let cloud_cover = self.percent(s.cloud_cover);

            if i == 0 {
                daily.push(DailyForecast {
                    high_temperature,
                    low_temperature,
                    precipitation,
                    wind,
                    cloud_cover,
                    humidity,
                    uv_index,
                    air_quality_index,
                    sunrise,
                    sunset,
                });
                continue;
            }

            let day = midnight + TimeDelta::days(i as i64);
            let high = self.sample(s.warmth) + HIGH_OFFSET;
            let low = self.sample(s.coldness);
            daily.push(DailyForecast {
                high_temperature: self.temperature(high),
                low_temperature: self.temperature(low),
                precipitation,
                wind: self.wind(),
                cloud_cover,
                humidity: self.percent(s.humidity),
                uv_index: self.index(s.uv_index),
                air_quality_index: self.index(s.air_quality),
                sunrise: self.time_of_day(day, Preset::SunriseHour),
                sunset: self.time_of_day(day, Preset::SunsetHour),
            });
        }

        WeatherSnapshot {
            observed_at: now,
            current_temperature,
            relative_temperature,
            high_temperature,
            low_temperature,
            humidity,
            wind,
            pressure,
            uv_index,
            air_quality_index,
            sunrise,
            sunset,
            hourly,
            daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Specificity;
    use chrono::Timelike;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-04-13T17:23:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn provider(settings: MockSettings, seed: u64) -> MockDataProvider {
        MockDataProvider::with_seed(settings, Locale::Si, seed).unwrap()
    }

    #[test]
    fn metadata() {
        let mock = provider(MockSettings::default(), 1);
        assert_eq!(mock.info().implementation_id, ProviderId::MOCK);
        assert_eq!(mock.info().kind, ProviderKind::Mock);
        assert!(mock.rate_limit().is_unlimited());
        assert_eq!(mock.features().max_wind_specificity(), Some(Specificity::QuarterWind));
        assert!(
            mock.info()
                .to_string()
                .ends_with("Data provided by pseudo-random numbers (Updated on 2025-04-13)")
        );
    }

    #[test]
    fn rejects_mismatched_presets() {
        let settings = MockSettings {
            humidity: Preset::TemperatureHot,
            ..MockSettings::default()
        };
        assert!(MockDataProvider::with_seed(settings, Locale::Si, 1).is_err());
    }

    #[test]
    fn current_readings_follow_presets() {
        let settings = MockSettings::default();
        for seed in 0..200 {
            let s = provider(settings.clone(), seed).generate(now());
            let current = s.current_temperature.value_in(Locale::Si);
            assert!((12.0..=20.0).contains(&current));
            assert!((s.relative_temperature.value_in(Locale::Si) - (current - 2.0)).abs() < 1e-9);
            assert!((s.high_temperature.value_in(Locale::Si) - (current + 7.0)).abs() < 1e-9);
            assert!((2.0..=12.0).contains(&s.low_temperature.value_in(Locale::Si)));
            assert!((30..=70).contains(&s.humidity));
            assert!((2..=5).contains(&s.uv_index));
            assert!(s.air_quality_index <= 50);
            assert!((16.0..=27.0).contains(&s.wind.speed().value_in(Locale::Si)));
            assert!(s.sunrise < s.sunset);
        }
    }

    #[test]
    fn wind_is_quantized_to_configured_specificity() {
        let settings = MockSettings {
            max_wind_specificity: Specificity::Cardinal,
            ..MockSettings::default()
        };
        let s = provider(settings, 3).generate(now());
        let bearings = std::iter::once(s.wind).chain(s.hourly.iter().map(|h| h.wind));
        for wind in bearings {
            assert!((0.0..360.0).contains(&wind.bearing()));
            assert_eq!(wind.direction().specificity(), Specificity::Cardinal);
            assert_eq!(
                wind.direction(),
                CompassDirection::from_bearing(wind.bearing(), Specificity::Cardinal)
            );
        }
    }

    #[test]
    fn first_forecast_entries_reuse_current_values() {
        let s = provider(MockSettings::default(), 42).generate(now());
        assert_eq!(s.hourly.len(), 12);
        assert_eq!(s.daily.len(), 7);

        let hour = &s.hourly[0];
        assert_eq!(hour.temperature, s.current_temperature);
        assert_eq!(hour.relative_temperature, s.relative_temperature);
        assert_eq!(hour.wind, s.wind);
        assert_eq!(hour.humidity, s.humidity);

        let day = &s.daily[0];
        assert_eq!(day.high_temperature, s.high_temperature);
        assert_eq!(day.low_temperature, s.low_temperature);
        assert_eq!(day.uv_index, s.uv_index);
        assert_eq!(day.sunrise, s.sunrise);
        assert_eq!(day.sunset, s.sunset);
    }

    #[test]
    fn later_days_shift_sun_times() {
        let s = provider(MockSettings::default(), 9).generate(now());
        for (i, day) in s.daily.iter().enumerate() {
            let date = now().date_naive() + TimeDelta::days(i as i64);
            assert_eq!(day.sunrise.date_naive(), date);
            assert!((5..=7).contains(&day.sunrise.hour()));
            assert!((19..=21).contains(&day.sunset.hour()));
            let high = day.high_temperature.value_in(Locale::Si);
            assert!((19.0..=27.0).contains(&high), "day {i}: {high}");
        }
    }

    #[test]
    fn precipitation_switch_forces_zero() {
        let settings = MockSettings {
            precipitating: false,
            ..MockSettings::default()
        };
        let s = provider(settings, 5).generate(now());
        for p in s.hourly.iter().map(|h| h.precipitation).chain(s.daily.iter().map(|d| d.precipitation)) {
            assert_eq!(p.probability(), 0);
            assert_eq!(p.amount().value(), 0.0);
        }

        let s = provider(MockSettings::default(), 5).generate(now());
        assert!(s.hourly.iter().all(|h| (25..=50).contains(&h.precipitation.probability())));
    }

    #[test]
    fn counts_are_configurable() {
        let settings = MockSettings {
            hourly_count: 0,
            daily_count: 3,
            ..MockSettings::default()
        };
        let s = provider(settings, 8).generate(now());
        assert!(s.hourly.is_empty());
        assert_eq!(s.daily.len(), 3);
    }

    #[test]
    fn oversized_counts_are_rejected_before_generating() {
        let settings = MockSettings {
            hourly_count: usize::MAX,
            ..MockSettings::default()
        };
        let err = MockDataProvider::with_seed(settings, Locale::Si, 8).unwrap_err();
        assert!(err.to_string().contains("hourly_count"));
    }

    #[test]
    fn same_seed_same_readings() {
        let a = provider(MockSettings::default(), 77).generate(now());
        let b = provider(MockSettings::default(), 77).generate(now());
        assert_eq!(a, b);
    }

    #[test]
    fn readings_use_configured_locale() {
        let mock = MockDataProvider::with_seed(MockSettings::default(), Locale::Customary, 2).unwrap();
        let s = mock.generate(now());
        assert_eq!(s.current_temperature.unit_string(), "F");
        assert_eq!(s.pressure.unit_string(), "in Hg");
    }

    #[tokio::test]
    async fn fetch_produces_snapshot() {
        let mock = MockDataProvider::from_config(&Config::default()).unwrap();
        let snapshot = mock.fetch().await.unwrap();
        assert_eq!(snapshot.hourly[0].temperature, snapshot.current_temperature);
    }
}
