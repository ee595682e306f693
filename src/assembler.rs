//! Report assembly
//!
//! `TextAssembler` owns the output buffer for one report. Sections are appended
//! in call order and `build` hands the text over, leaving the assembler empty
//! and ready for the next report.

use crate::catalog::MessageCatalog;
use crate::forecast::ForecastRenderer;
use crate::models::{ForecastDocument, ObservationDocument};
use crate::observation::ObservationRenderer;
use crate::Result;

pub struct TextAssembler<'a> {
    catalog: &'a MessageCatalog,
    buffer: String,
}

impl<'a> TextAssembler<'a> {
    #[must_use]
    pub fn new(catalog: &'a MessageCatalog) -> Self {
        Self {
            catalog,
            buffer: String::new(),
        }
    }

    /// Append the weekly forecast. On error the buffer is left as it was.
    pub fn append_forecast(&mut self, forecast: &ForecastDocument) -> Result<&mut Self> {
        let mut section = String::new();
        ForecastRenderer::new(self.catalog).render(forecast, &mut section)?;
        self.buffer.push_str(&section);
        Ok(self)
    }

    /// Append the current conditions. On error the buffer is left as it was.
    pub fn append_observation(&mut self, observation: &ObservationDocument) -> Result<&mut Self> {
        let mut section = String::new();
        ObservationRenderer::new(self.catalog).render(observation, &mut section)?;
        self.buffer.push_str(&section);
        Ok(self)
    }

    /// Take the accumulated text, leaving the buffer empty
    pub fn build(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Render the standard report: weekly forecast followed by current conditions
pub fn render_report(
    catalog: &MessageCatalog,
    forecast: &ForecastDocument,
    observation: &ObservationDocument,
) -> Result<String> {
    Ok(TextAssembler::new(catalog)
        .append_forecast(forecast)?
        .append_observation(observation)?
        .build())
}
