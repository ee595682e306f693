//! Data models for the AccuWeather forecast and observation documents
//!
//! Only the fields the narrator reads are modelled; everything else in the
//! provider's payload is ignored during deserialization.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NarratorError, Result};

/// Five-day daily forecast (`forecasts/v1/daily/5day`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastDocument {
    pub headline: Headline,
    /// Calendar days in chronological order
    pub daily_forecasts: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Headline {
    /// Moment the headline applies from, in the location's local offset
    pub effective_date: DateTime<FixedOffset>,
}

/// One calendar day of the forecast, split into a day and a night phase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyForecast {
    pub date: DateTime<FixedOffset>,
    pub temperature: TemperatureRange,
    pub day: HalfDayForecast,
    pub night: HalfDayForecast,
    #[serde(default)]
    pub air_and_pollen: Vec<AirAndPollen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureRange {
    pub minimum: Measurement,
    pub maximum: Measurement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HalfDayForecast {
    pub short_phrase: String,
    pub long_phrase: String,
}

/// Air quality, pollen or UV reading attached to a forecast day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirAndPollen {
    pub name: String,
    #[serde(default)]
    pub value: i64,
    pub category: String,
}

impl ForecastDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| NarratorError::malformed(format!("forecast document: {e}")))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| NarratorError::malformed(format!("forecast document: {e}")))
    }
}

impl DailyForecast {
    /// Reading whose name matches `name` ignoring case; the last one wins on duplicates
    #[must_use]
    pub fn air_and_pollen(&self, name: &str) -> Option<&AirAndPollen> {
        self.air_and_pollen
            .iter()
            .filter(|reading| reading.name.to_lowercase() == name)
            .last()
    }
}

/// Current conditions (`currentconditions/v1`), an array with the latest observation first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationDocument(pub Vec<CurrentObservation>);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentObservation {
    pub local_observation_date_time: DateTime<FixedOffset>,
    pub weather_text: String,
    pub temperature: UnitValues,
    pub wind: Wind,
    pub pressure: UnitValues,
    /// Kept raw: the provider sends null or omits it when no reading is available
    #[serde(default)]
    pub relative_humidity: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitValues {
    pub metric: Measurement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Wind {
    pub direction: WindDirection,
    pub speed: UnitValues,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WindDirection {
    /// Bearing the wind blows from, degrees clockwise from north
    pub degrees: f64,
}

impl ObservationDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| NarratorError::malformed(format!("observation document: {e}")))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| NarratorError::malformed(format!("observation document: {e}")))
    }

    /// The observation to report
    pub fn current(&self) -> Result<&CurrentObservation> {
        self.0
            .first()
            .ok_or_else(|| NarratorError::malformed("observation document contains no observations"))
    }
}

impl CurrentObservation {
    /// Relative humidity when the provider sent a whole number
    #[must_use]
    pub fn relative_humidity_percent(&self) -> Option<i64> {
        self.relative_humidity
            .as_ref()
            .filter(|value| value.is_i64() || value.is_u64())
            .and_then(Value::as_i64)
    }
}
