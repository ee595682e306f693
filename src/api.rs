//! HTTP endpoint serving spoken weather reports as plain text

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::assembler::render_report;
use crate::cache::{ResponseCache, report_key};
use crate::catalog::{Catalogs, Locale};
use crate::config::NarratorConfig;
use crate::provider::WeatherSource;
use crate::{NarratorError, Result};

/// Shared, read-only state of the service. Every request renders with its own assembler.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn WeatherSource>,
    catalogs: Arc<Catalogs>,
    cache: Arc<ResponseCache>,
    default_locale: Locale,
}

impl AppState {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        catalogs: Catalogs,
        cache_bucket: Duration,
        default_locale: Locale,
    ) -> Self {
        Self {
            source,
            catalogs: Arc::new(catalogs),
            cache: Arc::new(ResponseCache::new(cache_bucket)),
            default_locale,
        }
    }

    pub fn from_config(config: &NarratorConfig, source: Arc<dyn WeatherSource>) -> Result<Self> {
        let catalogs = Catalogs::bundled()?;
        info!("Message catalogs loaded: {}", catalogs.languages().join(", "));
        Ok(Self::new(
            source,
            catalogs,
            Duration::from_secs(config.cache.ttl_seconds),
            Locale::parse(&config.defaults.locale)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    locale: Option<String>,
}

/// Error response carrying the user-facing message
pub struct ApiError(NarratorError);

impl From<NarratorError> for ApiError {
    fn from(err: NarratorError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            NarratorError::Validation { .. } => StatusCode::BAD_REQUEST,
            NarratorError::ResourceMissing { .. } => StatusCode::NOT_FOUND,
            NarratorError::Api { .. } | NarratorError::MalformedDocument { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (status, self.0.user_message()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{city}", get(get_report))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn get_report(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<ReportQuery>,
) -> std::result::Result<String, ApiError> {
    if city.is_empty() || !city.chars().all(|c| c.is_ascii_digit()) {
        return Err(NarratorError::validation(format!(
            "city must be a numeric location key, got '{city}'"
        ))
        .into());
    }

    let locale = match query.locale.as_deref() {
        Some(tag) => Locale::parse(tag)?,
        None => state.default_locale.clone(),
    };
    let catalog = state.catalogs.get(&locale)?;

    let key = report_key(&city, &locale.to_string());
    if let Some(report) = state.cache.get(&key).await {
        return Ok(report);
    }

    let language = locale.language();
    let (forecast, observation) = tokio::try_join!(
        state.source.weekly_forecast(&city, language),
        state.source.current_observation(&city, language)
    )?;

    let report = render_report(&catalog, &forecast, &observation)?;
    info!("Rendered {} byte report for {} in {}", report.len(), city, locale);
    state.cache.put(&key, report.clone()).await;
    Ok(report)
}
