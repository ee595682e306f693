//! Weather narrator - spoken-style localized weather reports
//!
//! Renders an AccuWeather five-day forecast and the current observation into a
//! single plain-text paragraph suitable for a voice assistant or screen reader.

pub mod api;
pub mod assembler;
pub mod cache;
pub mod catalog;
pub mod compass;
pub mod config;
pub mod error;
pub mod forecast;
pub mod format;
pub mod models;
pub mod observation;
pub mod provider;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use assembler::{TextAssembler, render_report};
pub use catalog::{Catalogs, Locale, MessageCatalog};
pub use compass::{code_to_words, degrees_to_code};
pub use config::NarratorConfig;
pub use error::NarratorError;
pub use models::{ForecastDocument, ObservationDocument};
pub use provider::{AccuWeatherClient, MockWeatherSource, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NarratorError>;
