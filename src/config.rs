//! Service configuration
//!
//! Settings come from an optional `config.toml` (working directory first, then
//! the user config directory) overlaid with `NARRATOR_*` environment variables.

use crate::NarratorError;
use crate::catalog::Locale;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable read when no API key is configured otherwise
pub const API_KEY_ENV: &str = "ACCUWEATHER_API_KEY";

const MAX_TIMEOUT_SECONDS: u32 = 300;
const MAX_CACHE_TTL_SECONDS: u64 = 86_400;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// AccuWeather API configuration
    #[serde(default)]
    pub accuweather: AccuWeatherConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default request settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[accuweather]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuWeatherConfig {
    /// API key; the all-zero key serves bundled mock data
    pub api_key: Option<String>,
    /// Base URL of the AccuWeather data service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// `[cache]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Width of a cache time bucket in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level written, unless `RUST_LOG` is set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// `[defaults]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Locale used when a request names none
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_base_url() -> String {
    "https://dataservice.accuweather.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_port() -> u16 {
    8080
}

fn default_cache_ttl() -> u64 {
    7200
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl Default for AccuWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            accuweather: AccuWeatherConfig::default(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl NarratorConfig {
    /// Read `config.toml` and `NARRATOR_*` overrides, then validate
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Same as [`NarratorConfig::load`] with an explicit file location
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let file = config_path.unwrap_or_else(|| {
            let local = PathBuf::from("config.toml");
            if local.exists() {
                local
            } else {
                Self::get_config_path().unwrap_or(local)
            }
        });

        let mut sources = Config::builder();
        if file.exists() {
            sources = sources.add_source(
                File::from(file.as_path())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // e.g. NARRATOR_ACCUWEATHER__API_KEY
        sources = sources.add_source(
            Environment::with_prefix("NARRATOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: NarratorConfig = sources
            .build()
            .and_then(|settings| settings.try_deserialize())
            .with_context(|| format!("Failed to read configuration from {}", file.display()))?;

        if config.accuweather.api_key.is_none() {
            config.accuweather.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/weather-narrator/config.toml`
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-narrator").join("config.toml"))
    }

    /// Replace empty or zero settings with their defaults
    pub fn apply_defaults(&mut self) {
        let defaults = Self::default();
        if self.accuweather.base_url.is_empty() {
            self.accuweather.base_url = defaults.accuweather.base_url;
        }
        if self.accuweather.timeout_seconds == 0 {
            self.accuweather.timeout_seconds = defaults.accuweather.timeout_seconds;
        }
        if self.server.port == 0 {
            self.server.port = defaults.server.port;
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = defaults.cache.ttl_seconds;
        }
        if self.logging.level.is_empty() {
            self.logging.level = defaults.logging.level;
        }
        if self.logging.format.is_empty() {
            self.logging.format = defaults.logging.format;
        }
        if self.defaults.locale.is_empty() {
            self.defaults.locale = defaults.defaults.locale;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_accuweather()?;
        self.validate_cache()?;
        self.validate_logging()?;
        self.validate_defaults()?;
        Ok(())
    }

    /// The service cannot start without an API key
    pub fn validate_api_key(&self) -> Result<()> {
        match &self.accuweather.api_key {
            None => Err(NarratorError::config(format!(
                "AccuWeather API key not set. Set {API_KEY_ENV} or accuweather.api_key."
            ))
            .into()),
            Some(api_key) if api_key.trim().is_empty() => {
                Err(NarratorError::config("AccuWeather API key cannot be empty").into())
            }
            Some(api_key) if !api_key.chars().all(|c| c.is_ascii_alphanumeric()) => Err(
                NarratorError::config("AccuWeather API key must be alphanumeric").into(),
            ),
            Some(_) => Ok(()),
        }
    }

    fn validate_accuweather(&self) -> Result<()> {
        let accuweather = &self.accuweather;
        if accuweather.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(NarratorError::config(format!(
                "AccuWeather timeout cannot exceed {MAX_TIMEOUT_SECONDS} seconds"
            ))
            .into());
        }
        if !(accuweather.base_url.starts_with("http://")
            || accuweather.base_url.starts_with("https://"))
        {
            return Err(NarratorError::config(format!(
                "AccuWeather base URL '{}' is not an HTTP(S) URL",
                accuweather.base_url
            ))
            .into());
        }
        Ok(())
    }

    fn validate_cache(&self) -> Result<()> {
        if self.cache.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(NarratorError::config(format!(
                "Cache TTL cannot exceed {MAX_CACHE_TTL_SECONDS} seconds"
            ))
            .into());
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        const FORMATS: [&str; 2] = ["pretty", "compact"];

        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(NarratorError::config(format!(
                "Invalid log level '{}', expected one of {}",
                self.logging.level,
                LEVELS.join("/")
            ))
            .into());
        }
        if !FORMATS.contains(&self.logging.format.as_str()) {
            return Err(NarratorError::config(format!(
                "Invalid log format '{}', expected one of {}",
                self.logging.format,
                FORMATS.join("/")
            ))
            .into());
        }
        Ok(())
    }

    fn validate_defaults(&self) -> Result<()> {
        Locale::parse(&self.defaults.locale)
            .map_err(|e| NarratorError::config(format!("Invalid default locale: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> NarratorConfig {
        let mut config = NarratorConfig::default();
        config.accuweather.api_key = Some("0123456789abcdef".to_string());
        config
    }

    #[test]
    fn test_builtin_defaults() {
        let config = NarratorConfig::default();
        assert_eq!(config.accuweather.base_url, "https://dataservice.accuweather.com");
        assert_eq!(config.accuweather.timeout_seconds, 30);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_seconds, 7200);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.locale, "en_US");
        assert!(config.accuweather.api_key.is_none());
    }

    #[test]
    fn test_missing_api_key_names_env_var() {
        let config = NarratorConfig::default();
        let result = config.validate_api_key();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_api_key_must_be_alphanumeric() {
        let mut config = valid();
        config.accuweather.api_key = Some("key&metric=false".to_string());
        assert!(config.validate_api_key().is_err());
    }

    #[test]
    fn test_unknown_log_level_and_format() {
        let mut config = valid();
        config.logging.level = "verbose".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid log level 'verbose'"), "{err}");

        let mut config = valid();
        config.logging.format = "json".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid log format 'json'"), "{err}");
    }

    #[test]
    fn test_upper_bounds() {
        let mut config = valid();
        config.accuweather.timeout_seconds = 500;
        assert!(config.validate().unwrap_err().to_string().contains("timeout cannot exceed 300"));

        let mut config = valid();
        config.cache.ttl_seconds = 86_401;
        assert!(config.validate().unwrap_err().to_string().contains("Cache TTL"));
    }

    #[test]
    fn test_base_url_scheme() {
        let mut config = valid();
        config.accuweather.base_url = "ftp://dataservice.accuweather.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_locale_must_parse() {
        let mut config = valid();
        config.defaults.locale = "not a locale".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid default locale"));
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = valid();
        config.accuweather.base_url.clear();
        config.cache.ttl_seconds = 0;
        config.defaults.locale.clear();
        config.apply_defaults();
        assert_eq!(config.accuweather.base_url, "https://dataservice.accuweather.com");
        assert_eq!(config.cache.ttl_seconds, 7200);
        assert_eq!(config.defaults.locale, "en_US");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "weather-narrator-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[accuweather]\napi_key = \"00000000000000000000000000000000\"\n\n[server]\nport = 9090\n\n[defaults]\nlocale = \"fr_CA\""
        )
        .unwrap();

        let config = NarratorConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.accuweather.api_key.as_deref(),
            Some("00000000000000000000000000000000")
        );
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.defaults.locale, "fr_CA");
        assert_eq!(config.cache.ttl_seconds, 7200);
    }

    #[test]
    fn test_user_config_path() {
        if let Some(path) = NarratorConfig::get_config_path() {
            assert!(path.ends_with("weather-narrator/config.toml"));
        }
    }
}
