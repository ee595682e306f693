//! Current conditions narration

use crate::catalog::MessageCatalog;
use crate::compass::{WIND_PRECISION, code_to_words, degrees_to_code};
use crate::format::{signed_whole, twelve_hour, whole};
use crate::models::ObservationDocument;
use crate::Result;

/// Provider pressure is in hectopascals; reports read it in kilopascals
const PRESSURE_DIVISOR: f64 = 10.0;

/// Renders the current-conditions part of a report
pub struct ObservationRenderer<'a> {
    catalog: &'a MessageCatalog,
}

impl<'a> ObservationRenderer<'a> {
    #[must_use]
    pub fn new(catalog: &'a MessageCatalog) -> Self {
        Self { catalog }
    }

    /// Append conditions time, temperature, wind, pressure and humidity to `out`, in that order
    pub fn render(&self, observations: &ObservationDocument, out: &mut String) -> Result<()> {
        let observation = observations.current()?;
        let catalog = self.catalog;

        let (hour, am) = twelve_hour(&observation.local_observation_date_time);
        let time = format!("{hour} {}", catalog.get(if am { "am" } else { "pm" })?);
        out.push_str(&catalog.format("conditions", &[("time", time.as_str())])?);
        out.push('\n');

        out.push_str(&catalog.format(
            "temperature",
            &[
                ("text", observation.weather_text.as_str()),
                (
                    "temperature",
                    signed_whole(observation.temperature.metric.value).as_str(),
                ),
            ],
        )?);
        out.push(' ');

        let code = degrees_to_code(observation.wind.direction.degrees, WIND_PRECISION)?;
        out.push_str(&catalog.format(
            "wind",
            &[
                ("direction", code_to_words(code, catalog)?.as_str()),
                ("speed", whole(observation.wind.speed.metric.value).as_str()),
            ],
        )?);
        out.push('\n');

        out.push_str(&catalog.format(
            "pressure",
            &[(
                "value",
                whole(observation.pressure.metric.value / PRESSURE_DIVISOR).as_str(),
            )],
        )?);
        out.push(' ');

        if let Some(humidity) = observation.relative_humidity_percent() {
            out.push_str(&catalog.format("humidity", &[("value", humidity.to_string().as_str())])?);
        }
        out.push('\n');
        Ok(())
    }
}
