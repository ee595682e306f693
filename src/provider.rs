//! Weather data sources
//!
//! `AccuWeatherClient` fetches documents from the AccuWeather data service.
//! `MockWeatherSource` serves bundled fixture documents instead and is picked
//! when the configured API key is the all-zero mock key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::AccuWeatherConfig;
use crate::models::{ForecastDocument, ObservationDocument};
use crate::{NarratorError, Result};

/// API key that selects the bundled mock documents
pub const MOCK_API_KEY: &str = "00000000000000000000000000000000";

const FORECAST_PATH: &str = "forecasts/v1/daily/5day";
const OBSERVATION_PATH: &str = "currentconditions/v1";

/// (language, five-day forecast, current conditions)
const MOCK_DOCUMENTS: &[(&str, &str, &str)] = &[
    (
        "en",
        include_str!("../resources/mock/accuweather_5day_en.json"),
        include_str!("../resources/mock/accuweather_current_en.json"),
    ),
    (
        "fr",
        include_str!("../resources/mock/accuweather_5day_fr.json"),
        include_str!("../resources/mock/accuweather_current_fr.json"),
    ),
];

/// Supplier of the two documents a report is rendered from
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Five-day forecast for a provider location key, phrased in `language`
    async fn weekly_forecast(&self, location: &str, language: &str) -> Result<ForecastDocument>;

    /// Latest observation for a provider location key, phrased in `language`
    async fn current_observation(
        &self,
        location: &str,
        language: &str,
    ) -> Result<ObservationDocument>;
}

/// Build the source the configuration asks for
pub fn source_from_config(config: &AccuWeatherConfig) -> Result<Arc<dyn WeatherSource>> {
    match config.api_key.as_deref() {
        Some(MOCK_API_KEY) => {
            info!("AccuWeather mock key configured, serving bundled documents");
            Ok(Arc::new(MockWeatherSource))
        }
        Some(_) => Ok(Arc::new(AccuWeatherClient::new(config)?)),
        None => Err(NarratorError::config("AccuWeather API key not set")),
    }
}

/// HTTP client for the AccuWeather data service. One attempt per call.
pub struct AccuWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AccuWeatherClient {
    pub fn new(config: &AccuWeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| NarratorError::config("AccuWeather API key not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-narrator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NarratorError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint_url(&self, path: &str, location: &str, language: &str) -> String {
        format!(
            "{}/{}/{}?apikey={}&details=true&metric=true&language={}",
            self.base_url,
            path,
            urlencoding::encode(location),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(language)
        )
    }

    #[instrument(skip(self))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        location: &str,
        language: &str,
    ) -> Result<T> {
        let start_time = Instant::now();
        debug!("Requesting {}/{}/{}", self.base_url, path, location);

        let response = self
            .client
            .get(self.endpoint_url(path, location, language))
            .send()
            .await
            .map_err(|e| NarratorError::api(format!("Request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("AccuWeather responded with {}", status);
            return Err(NarratorError::api(format!(
                "AccuWeather responded with {status} for {path}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NarratorError::api(format!("Failed to read {path} response: {e}")))?;

        let document = serde_json::from_slice(&body)
            .map_err(|e| NarratorError::malformed(format!("{path} response: {e}")))?;

        let duration = start_time.elapsed();
        info!("Retrieved {} in {:.3}s", path, duration.as_secs_f64());
        if duration.as_secs() > 5 {
            warn!("Slow AccuWeather response: {:.3}s", duration.as_secs_f64());
        }

        Ok(document)
    }
}

#[async_trait]
impl WeatherSource for AccuWeatherClient {
    async fn weekly_forecast(&self, location: &str, language: &str) -> Result<ForecastDocument> {
        self.get_json(FORECAST_PATH, location, language).await
    }

    async fn current_observation(
        &self,
        location: &str,
        language: &str,
    ) -> Result<ObservationDocument> {
        self.get_json(OBSERVATION_PATH, location, language).await
    }
}

/// Serves the bundled documents for every location
pub struct MockWeatherSource;

impl MockWeatherSource {
    fn documents(language: &str) -> Result<(&'static str, &'static str)> {
        MOCK_DOCUMENTS
            .iter()
            .find(|(mock_language, _, _)| *mock_language == language)
            .map(|(_, forecast, observation)| (*forecast, *observation))
            .ok_or_else(|| {
                NarratorError::resource_missing(format!("mock documents for language '{language}'"))
            })
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn weekly_forecast(&self, location: &str, language: &str) -> Result<ForecastDocument> {
        info!("AccuWeather mock forecast: {} {}", location, language);
        let (forecast, _) = Self::documents(language)?;
        ForecastDocument::from_json(forecast)
    }

    async fn current_observation(
        &self,
        location: &str,
        language: &str,
    ) -> Result<ObservationDocument> {
        info!("AccuWeather mock observation: {} {}", location, language);
        let (_, observation) = Self::documents(language)?;
        ObservationDocument::from_json(observation)
    }
}
