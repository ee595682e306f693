//! Weekly forecast narration
//!
//! Walks the daily forecasts as a sequence of half-day slots (day, then night)
//! and writes one line per slot. The first slots get the long phrase plus air
//! quality and UV details; from the brief index on, lines use the short phrase.
//! Air quality sentences for the detailed slots are held back and read out
//! together, followed by the outlook sentence, right before the first brief line.

use chrono::{Datelike, Timelike, Weekday};

use crate::catalog::MessageCatalog;
use crate::format::signed_whole;
use crate::models::{DailyForecast, ForecastDocument, HalfDayForecast};
use crate::Result;

/// Slot index from which lines switch to short phrases
pub const BRIEF_INDEX: i32 = 3;

/// First hour of the daytime window; earlier hours count as night
pub const DAYTIME_START_HOUR: u32 = 5;

/// First hour after today's daytime window has passed
pub const DAYTIME_END_HOUR: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfDay {
    Day,
    Night,
}

impl HalfDay {
    fn line_key(self) -> &'static str {
        match self {
            HalfDay::Day => "day",
            HalfDay::Night => "night",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            HalfDay::Day => "week_day",
            HalfDay::Night => "week_night",
        }
    }
}

/// Slot index of the first daily entry's day phase.
///
/// Past the daytime window (or before it starts) this morning's slot is already
/// stale, so it gets index -1 and is skipped.
#[must_use]
pub fn initial_slot_index(hour: u32) -> i32 {
    if !(DAYTIME_START_HOUR..DAYTIME_END_HOUR).contains(&hour) {
        -1
    } else {
        0
    }
}

fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// State of one forecast walk
#[derive(Debug)]
struct RenderCursor {
    index12: i32,
    air_quality: [String; BRIEF_INDEX as usize],
}

impl RenderCursor {
    fn new(index12: i32) -> Self {
        Self {
            index12,
            air_quality: Default::default(),
        }
    }

    fn advance(&mut self) {
        self.index12 += 1;
    }

    fn is_brief(&self) -> bool {
        self.index12 >= BRIEF_INDEX
    }
}

/// Renders the forecast part of a report
pub struct ForecastRenderer<'a> {
    catalog: &'a MessageCatalog,
}

impl<'a> ForecastRenderer<'a> {
    #[must_use]
    pub fn new(catalog: &'a MessageCatalog) -> Self {
        Self { catalog }
    }

    /// Append the narration of every half-day slot to `out`
    pub fn render(&self, forecast: &ForecastDocument, out: &mut String) -> Result<()> {
        let mut cursor = RenderCursor::new(initial_slot_index(
            forecast.headline.effective_date.hour(),
        ));

        for day in &forecast.daily_forecasts {
            self.render_slot(&mut cursor, day, HalfDay::Day, out)?;
            cursor.advance();
            self.render_slot(&mut cursor, day, HalfDay::Night, out)?;
            cursor.advance();
        }
        Ok(())
    }

    fn render_slot(
        &self,
        cursor: &mut RenderCursor,
        day: &DailyForecast,
        half: HalfDay,
        out: &mut String,
    ) -> Result<()> {
        if cursor.index12 < 0 {
            return Ok(());
        }

        let label = self.label(cursor.index12, day, half)?;
        let brief = cursor.is_brief();

        if cursor.index12 == BRIEF_INDEX {
            for sentence in &cursor.air_quality {
                out.push_str(sentence);
            }
            out.push_str(self.catalog.get("outlook")?);
            out.push('\n');
        }

        let (phase, temperature): (&HalfDayForecast, f64) = match half {
            HalfDay::Day => (&day.day, day.temperature.maximum.value),
            HalfDay::Night => (&day.night, day.temperature.minimum.value),
        };
        let phrase = if brief {
            &phase.short_phrase
        } else {
            &phase.long_phrase
        };
        out.push_str(&self.catalog.format(
            half.line_key(),
            &[
                ("label", label.as_str()),
                ("phrase", phrase.as_str()),
                ("temperature", signed_whole(temperature).as_str()),
            ],
        )?);

        if !brief {
            // 0 <= index12 < BRIEF_INDEX here
            cursor.air_quality[cursor.index12 as usize] = match day.air_and_pollen("airquality") {
                Some(air) => {
                    let mut sentence = self.catalog.format(
                        "air_quality",
                        &[("label", label.as_str()), ("category", air.category.as_str())],
                    )?;
                    sentence.push('\n');
                    sentence
                }
                None => String::new(),
            };

            if half == HalfDay::Day {
                if let Some(uv) = day.air_and_pollen("uvindex") {
                    out.push(' ');
                    out.push_str(&self.catalog.format(
                        "uv_index",
                        &[
                            ("label", label.as_str()),
                            ("value", uv.value.to_string().as_str()),
                            ("category", uv.category.as_str()),
                        ],
                    )?);
                }
            }
        }

        out.push('\n');
        Ok(())
    }

    fn label(&self, index12: i32, day: &DailyForecast, half: HalfDay) -> Result<String> {
        match (index12, half) {
            (0, HalfDay::Day) => Ok(self.catalog.get("today")?.to_string()),
            (0 | 1, HalfDay::Night) => Ok(self.catalog.get("tonight")?.to_string()),
            _ => {
                let weekday = self.catalog.get(weekday_key(day.date.weekday()))?;
                self.catalog.format(half.label_key(), &[("day", weekday)])
            }
        }
    }
}
