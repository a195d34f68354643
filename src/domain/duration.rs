//! Work durations. Effort is measured in working time, not wall-clock time.
//!
//! One working day is 7.5 hours and one working week is 5 working days.

use super::DomainError;
use chrono::TimeDelta;

/// Seconds in one working day (7.5 h).
pub const WORKING_DAY_SECS: i64 = 27_000;
/// Seconds in one working week (5 working days).
pub const WORKING_WEEK_SECS: i64 = WORKING_DAY_SECS * 5;
pub const HOURS_PER_DAY: f64 = 7.5;
pub const HOURS_PER_WEEK: f64 = HOURS_PER_DAY * 5.0;
/// Largest effort magnitude accepted, in hours (over 500 working years).
pub const MAX_WORK_HOURS: i64 = 1_000_000;

/// [`MAX_WORK_HOURS`] as a duration.
pub fn max_work_duration() -> TimeDelta {
    TimeDelta::hours(MAX_WORK_HOURS)
}

/// `days` working days as a duration.
pub fn working_days(days: i64) -> TimeDelta {
    TimeDelta::seconds(days * WORKING_DAY_SECS)
}

/// Fractional number of working days in `duration`.
pub fn as_working_days(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / WORKING_DAY_SECS as f64
}

/// Parse `"1w 2d 3h 30m"` style strings. Empty input is zero.
///
/// Values may be fractional (`"1.5d"`). A leading `-` negates the whole duration.
pub fn parse_work_duration(input: &str) -> Result<TimeDelta, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(TimeDelta::zero());
    }
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let error = |reason: &str| DomainError::DurationParse {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut total_hours = 0f64;
    for part in body.to_lowercase().split_whitespace() {
        let unit = part.chars().last().ok_or_else(|| error("empty component"))?;
        let value: f64 = part[..part.len() - unit.len_utf8()]
            .parse()
            .map_err(|_| error(&format!("invalid number in '{}'", part)))?;
        if !value.is_finite() {
            return Err(error(&format!("non-finite number in '{}'", part)));
        }
        total_hours += match unit {
            'w' => value * HOURS_PER_WEEK,
            'd' => value * HOURS_PER_DAY,
            'h' => value,
            'm' => value / 60.0,
            other => return Err(error(&format!("invalid unit '{}'", other))),
        };
    }

    if !total_hours.is_finite() || total_hours.abs() > MAX_WORK_HOURS as f64 {
        return Err(error(&format!("exceeds {} hours", MAX_WORK_HOURS)));
    }
    let minutes = (total_hours * 60.0).round() as i64;
    let duration = TimeDelta::try_minutes(minutes).ok_or_else(|| error("out of range"))?;
    Ok(if negative { -duration } else { duration })
}

/// Render a duration in working units, skipping zero components: `"1w 2d 3h 30m"`.
pub fn format_work_duration(duration: TimeDelta) -> String {
    let negative = duration < TimeDelta::zero();
    let mut rest = duration.num_seconds().abs();

    let weeks = rest / WORKING_WEEK_SECS;
    rest -= weeks * WORKING_WEEK_SECS;
    let days = rest / WORKING_DAY_SECS;
    rest -= days * WORKING_DAY_SECS;
    let hours = rest / 3600;
    rest -= hours * 3600;
    let minutes = rest / 60;

    let parts: Vec<String> = [(weeks, 'w'), (days, 'd'), (hours, 'h'), (minutes, 'm')]
        .into_iter()
        .filter(|(value, _)| *value != 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        return "0m".to_string();
    }
    let joined = parts.join(" ");
    if negative {
        format!("-{}", joined)
    } else {
        joined
    }
}

/// Serde adapter: durations as work-duration strings.
pub mod serde_work {
    use super::{format_work_duration, parse_work_duration};
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_work_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_work_duration(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::{format_work_duration, parse_work_duration};
        use chrono::TimeDelta;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<TimeDelta>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => serializer.serialize_some(&format_work_duration(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<TimeDelta>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse_work_duration(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_units() {
        let d = parse_work_duration("1w 2d 3h 30m").unwrap();
        let expected = WORKING_WEEK_SECS + 2 * WORKING_DAY_SECS + 3 * 3600 + 30 * 60;
        assert_eq!(d.num_seconds(), expected);
    }

    #[test]
    fn parses_fractions_and_case() {
        assert_eq!(parse_work_duration("1.5D").unwrap().num_minutes(), 675);
        assert_eq!(parse_work_duration("0.5h").unwrap().num_minutes(), 30);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_work_duration("  ").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = parse_work_duration("3x").unwrap_err();
        assert!(matches!(err, DomainError::DurationParse { .. }));
        assert!(parse_work_duration("abcd").is_err());
    }

    #[test]
    fn formats_working_units() {
        assert_eq!(format_work_duration(working_days(3)), "3d");
        assert_eq!(format_work_duration(working_days(5)), "1w");
        assert_eq!(
            format_work_duration(working_days(2) + TimeDelta::hours(3)),
            "2d 3h"
        );
        assert_eq!(format_work_duration(TimeDelta::zero()), "0m");
        assert_eq!(format_work_duration(-working_days(1)), "-1d");
    }

    #[test]
    fn negative_strings_parse_back() {
        let d = -(working_days(1) + TimeDelta::hours(2));
        assert_eq!(parse_work_duration(&format_work_duration(d)).unwrap(), d);
    }

    #[test]
    fn rejects_non_finite_and_huge_values() {
        for input in ["NaNd", "infh", "-inf w", "1.5e12h", "200000w"] {
            assert!(
                matches!(parse_work_duration(input), Err(DomainError::DurationParse { .. })),
                "{} should be rejected",
                input
            );
        }
        assert_eq!(
            parse_work_duration("1000000h").unwrap(),
            max_work_duration()
        );
    }

    #[test]
    fn huge_json_effort_fails_to_deserialize() {
        #[derive(serde::Deserialize)]
        struct Effort {
            #[serde(with = "serde_work")]
            worked: TimeDelta,
        }
        let parsed = serde_json::from_str::<Effort>(r#"{"worked": "1.5e12h"}"#);
        assert!(parsed.is_err());
        let ok: Effort = serde_json::from_str(r#"{"worked": "2d"}"#).unwrap();
        assert_eq!(ok.worked, working_days(2));
    }

    #[test]
    fn working_day_conversion() {
        assert_eq!(as_working_days(working_days(4)), 4.0);
        assert_eq!(as_working_days(TimeDelta::seconds(WORKING_DAY_SECS / 2)), 0.5);
    }
}
