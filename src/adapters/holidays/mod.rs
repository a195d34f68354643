//! Rule-based holiday data. Implements HolidayProvider.

pub mod germany;

use crate::domain::{DomainError, Holiday, Location};
use crate::ports::HolidayProvider;

/// Computes holidays from calendar rules. No lookup tables, no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleHolidayProvider;

impl RuleHolidayProvider {
    pub fn new() -> Self {
        Self
    }
}

impl HolidayProvider for RuleHolidayProvider {
    fn holidays(&self, location: &Location, year: i32) -> Result<Vec<Holiday>, DomainError> {
        let country = location.country.to_ascii_lowercase();
        let state = location.subdivision.as_deref().map(str::to_ascii_lowercase);
        match country.as_str() {
            "de" => {
                if let Some(s) = state.as_deref() {
                    if !germany::STATES.contains(&s) {
                        return Err(DomainError::CalendarLookup(format!(
                            "unknown subdivision '{}' for {}",
                            s, country
                        )));
                    }
                }
                if !(germany::FIRST_YEAR..=germany::LAST_YEAR).contains(&year) {
                    return Err(DomainError::CalendarLookup(format!(
                        "no holiday data for {} in {}",
                        location, year
                    )));
                }
                Ok(germany::holidays(state.as_deref(), year))
            }
            other => Err(DomainError::CalendarLookup(format!(
                "unsupported country '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn location(country: &str, subdivision: Option<&str>) -> Location {
        Location {
            country: country.into(),
            subdivision: subdivision.map(String::from),
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        }
    }

    #[test]
    fn germany_is_case_insensitive() {
        let provider = RuleHolidayProvider::new();
        let list = provider.holidays(&location("DE", Some("NW")), 2025).unwrap();
        assert!(list.iter().any(|h| h.name == "Rosenmontag"));
    }

    #[test]
    fn unknown_regions_fail() {
        let provider = RuleHolidayProvider::new();
        assert!(matches!(
            provider.holidays(&location("fr", None), 2025),
            Err(DomainError::CalendarLookup(_))
        ));
        assert!(matches!(
            provider.holidays(&location("de", Some("zz")), 2025),
            Err(DomainError::CalendarLookup(_))
        ));
        assert!(provider.holidays(&location("de", None), 1980).is_err());
    }
}
