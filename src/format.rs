//! Number and time formatting shared by the renderers

use chrono::Timelike;

/// Round half away from zero and always show the sign: `+3`, `-6`, `+0`, `-0`
#[must_use]
pub fn signed_whole(value: f64) -> String {
    // a negative value rounding to zero keeps its sign: -0
    format!("{:+.0}", value.round())
}

/// Round half away from zero without a sign for positive values
#[must_use]
pub fn whole(value: f64) -> String {
    format!("{:.0}", value.round())
}

/// 12-hour clock hour with no leading zero, and whether it is before noon
#[must_use]
pub fn twelve_hour<T: Timelike>(time: &T) -> (u32, bool) {
    let (pm, hour) = time.hour12();
    (hour, !pm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rstest::rstest;

    #[rstest]
    #[case(3.4, "+3")]
    #[case(-6.1, "-6")]
    #[case(7.5, "+8")]
    #[case(-2.5, "-3")]
    #[case(0.2, "+0")]
    #[case(-0.2, "-0")]
    #[case(0.5, "+1")]
    #[case(-10.9, "-11")]
    fn test_signed_whole(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(signed_whole(value), expected);
    }

    #[rstest]
    #[case(101.66, "102")]
    #[case(14.8, "15")]
    #[case(100.0, "100")]
    fn test_whole(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(whole(value), expected);
    }

    #[rstest]
    #[case(0, 12, true)]
    #[case(9, 9, true)]
    #[case(12, 12, false)]
    #[case(13, 1, false)]
    #[case(23, 11, false)]
    fn test_twelve_hour(#[case] hour: u32, #[case] expected: u32, #[case] am: bool) {
        let time = NaiveTime::from_hms_opt(hour, 45, 0).unwrap();
        assert_eq!(twelve_hour(&time), (expected, am));
    }
}
