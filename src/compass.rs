//! Compass direction encoding
//!
//! Converts a wind bearing into one of the 32 compass points at a chosen
//! precision, and spells a compass code out with localized words.

use crate::catalog::MessageCatalog;
use crate::{NarratorError, Result};

/// The 32-point compass rose, clockwise from north
pub const COMPASS_POINTS: [&str; 32] = [
    "N", "NbE", "NNE", "NEbN", "NE", "NEbE", "ENE", "EbN", "E", "EbS", "ESE", "SEbE", "SE", "SEbS",
    "SSE", "SbE", "S", "SbW", "SSW", "SWbS", "SW", "SWbW", "WSW", "WbS", "W", "WbN", "WNW", "NWbW",
    "NW", "NWbN", "NNW", "NbW",
];

/// Finest supported precision: 2^5 = 32 points
pub const MAX_PRECISION: u32 = 5;

/// Precision used for spoken wind directions (8 points)
pub const WIND_PRECISION: u32 = 3;

/// Map a bearing in degrees onto `2^precision` compass points, rounding to the nearest point.
///
/// Any finite bearing is accepted, including fractional, negative and past a
/// full turn.
pub fn degrees_to_code(degrees: f64, precision: u32) -> Result<&'static str> {
    if !(1..=MAX_PRECISION).contains(&precision) {
        return Err(NarratorError::validation(format!(
            "Compass precision must be between 1 and {MAX_PRECISION}, got {precision}"
        )));
    }
    if !degrees.is_finite() {
        return Err(NarratorError::validation(format!(
            "Wind bearing must be a finite number of degrees, got {degrees}"
        )));
    }

    let half_sectors = f64::from(1u32 << (precision + 1));
    let half_sector = ((degrees + 360.0) * half_sectors / 360.0).floor() as i64;
    let sector = ((half_sector + 1) >> 1) & ((1i64 << precision) - 1);
    // masked to 0..2^precision, so the shifted index stays below 32
    let index = (sector as usize) << (MAX_PRECISION - precision);
    Ok(COMPASS_POINTS[index])
}

/// Spell out a compass code such as `NEbE` as localized words separated by spaces
pub fn code_to_words(code: &str, catalog: &MessageCatalog) -> Result<String> {
    let words = code
        .chars()
        .map(|letter| {
            let key = match letter {
                'N' => "north",
                'E' => "east",
                'S' => "south",
                'W' => "west",
                'b' => "by",
                _ => return Err(NarratorError::invalid_compass_code(code)),
            };
            catalog.get(key)
        })
        .collect::<Result<Vec<&str>>>()?;
    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Locale;
    use rstest::rstest;

    fn english() -> MessageCatalog {
        MessageCatalog::load(&Locale::parse("en_US").unwrap()).unwrap()
    }

    #[rstest]
    #[case(0.0, "N")]
    #[case(90.0, "E")]
    #[case(180.0, "S")]
    #[case(270.0, "W")]
    #[case(11.0, "NbE")]
    #[case(45.0, "NE")]
    #[case(355.0, "N")]
    #[case(349.0, "NbW")]
    fn test_full_precision(#[case] degrees: f64, #[case] expected: &str) {
        assert_eq!(degrees_to_code(degrees, 5).unwrap(), expected);
    }

    #[rstest]
    fn test_periodic(#[values(1, 2, 3, 4, 5)] precision: u32) {
        for degrees in -720..=720 {
            let degrees = f64::from(degrees);
            assert_eq!(
                degrees_to_code(degrees, precision).unwrap(),
                degrees_to_code(degrees + 360.0, precision).unwrap(),
                "degrees {degrees} precision {precision}"
            );
        }
    }

    #[test]
    fn test_eight_point_north_window() {
        for degrees in (338..360).chain(0..22) {
            assert_eq!(degrees_to_code(f64::from(degrees), 3).unwrap(), "N", "degrees {degrees}");
        }
        assert_eq!(degrees_to_code(337.4, 3).unwrap(), "NW");
        assert_eq!(degrees_to_code(337.5, 3).unwrap(), "N");
        assert_eq!(degrees_to_code(22.4, 3).unwrap(), "N");
        assert_eq!(degrees_to_code(22.5, 3).unwrap(), "NE");
    }

    #[test]
    fn test_eight_point_uses_every_fourth_entry() {
        let eight_points: Vec<&str> = COMPASS_POINTS.iter().step_by(4).copied().collect();
        assert_eq!(eight_points, ["N", "NE", "E", "SE", "S", "SW", "W", "NW"]);
        for (i, expected) in eight_points.iter().enumerate() {
            let degrees = 45.0 * i as f64;
            assert_eq!(degrees_to_code(degrees, 3).unwrap(), *expected);
            assert_eq!(degrees_to_code(degrees + 20.0, 3).unwrap(), *expected);
            assert_eq!(degrees_to_code(degrees - 20.0, 3).unwrap(), *expected);
        }
    }

    #[rstest]
    #[case(0.0, 1, "N")]
    #[case(89.0, 1, "N")]
    #[case(90.0, 1, "S")]
    #[case(269.0, 1, "S")]
    #[case(270.0, 1, "N")]
    #[case(44.0, 2, "N")]
    #[case(45.0, 2, "E")]
    #[case(-90.0, 2, "W")]
    #[case(-45.0, 3, "NW")]
    #[case(-1000.0, 3, "E")]
    fn test_coarse_precision(#[case] degrees: f64, #[case] precision: u32, #[case] expected: &str) {
        assert_eq!(degrees_to_code(degrees, precision).unwrap(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn test_precision_out_of_range(#[case] precision: u32) {
        assert!(matches!(
            degrees_to_code(0.0, precision),
            Err(NarratorError::Validation { .. })
        ));
    }

    #[rstest]
    #[case(247.5, 5, "WSW")]
    #[case(247.5, 3, "W")]
    #[case(247.4, 3, "SW")]
    #[case(-0.5, 5, "N")]
    #[case(719.9, 4, "N")]
    fn test_fractional_bearings(
        #[case] degrees: f64,
        #[case] precision: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(degrees_to_code(degrees, precision).unwrap(), expected);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_non_finite_bearing(#[case] degrees: f64) {
        assert!(matches!(
            degrees_to_code(degrees, 3),
            Err(NarratorError::Validation { .. })
        ));
    }

    #[test]
    fn test_code_to_words() {
        let catalog = english();
        assert_eq!(code_to_words("NEbE", &catalog).unwrap(), "north east by east");
        assert_eq!(code_to_words("SW", &catalog).unwrap(), "south west");
    }

    #[test]
    fn test_code_to_words_french() {
        let catalog = MessageCatalog::load(&Locale::parse("fr_CA").unwrap()).unwrap();
        assert_eq!(code_to_words("NWbW", &catalog).unwrap(), "nord ouest quart ouest");
    }

    #[rstest]
    #[case("X")]
    #[case("NX")]
    #[case("nE")]
    fn test_code_to_words_rejects_unknown_letters(#[case] code: &str) {
        assert!(matches!(
            code_to_words(code, &english()),
            Err(NarratorError::InvalidCompassCode { .. })
        ));
    }
}
