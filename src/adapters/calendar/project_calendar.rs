//! Implements CalendarContext as an in-memory per-user calendar.
//!
//! Working weekdays plus named exceptions, built from the user's locations
//! (public holidays) and stored off-days.

use crate::domain::{DomainError, Location, OffDayRecord};
use crate::ports::{CalendarContext, HolidayProvider};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Range whose holiday data could not be loaded.
#[derive(Debug, Clone)]
struct UnavailableRange {
    first: NaiveDate,
    last: NaiveDate,
    reason: String,
}

/// Per-user calendar. Mon–Fri working by default.
#[derive(Debug, Clone)]
pub struct ProjectCalendar {
    name: String,
    working_weekdays: [bool; 7],
    exceptions: BTreeMap<NaiveDate, String>,
    unavailable: Vec<UnavailableRange>,
}

impl ProjectCalendar {
    pub fn new(name: impl Into<String>) -> Self {
        let mut working_weekdays = [true; 7];
        working_weekdays[Weekday::Sat.num_days_from_monday() as usize] = false;
        working_weekdays[Weekday::Sun.num_days_from_monday() as usize] = false;
        Self {
            name: name.into(),
            working_weekdays,
            exceptions: BTreeMap::new(),
            unavailable: Vec::new(),
        }
    }

    /// Build a user's calendar: holidays of each location for the period it is
    /// valid (until the next location starts, or `horizon_end`), then off-days.
    ///
    /// Holiday lookups that fail are logged and the period is marked unavailable;
    /// queries in that period then report `CalendarLookup` to the caller.
    pub fn for_user(
        name: impl Into<String>,
        locations: &[Location],
        off_days: &[OffDayRecord],
        holidays: &dyn HolidayProvider,
        horizon_end: NaiveDate,
    ) -> Self {
        let mut calendar = Self::new(name);
        for (i, location) in locations.iter().enumerate() {
            let last = match locations.get(i + 1) {
                Some(next) => next.start.pred_opt().unwrap_or(next.start),
                None => horizon_end,
            };
            if last < location.start {
                continue;
            }
            calendar.load_holidays(location, location.start, last, holidays);
        }
        for off_day in off_days {
            calendar.add_off_day(off_day);
        }
        debug!(
            calendar = %calendar.name,
            exceptions = calendar.exceptions.len(),
            "calendar initialized"
        );
        calendar
    }

    fn load_holidays(
        &mut self,
        location: &Location,
        first: NaiveDate,
        last: NaiveDate,
        holidays: &dyn HolidayProvider,
    ) {
        for year in first.year()..=last.year() {
            match holidays.holidays(location, year) {
                Ok(list) => {
                    for holiday in list
                        .into_iter()
                        .filter(|h| h.date >= first && h.date <= last)
                    {
                        self.add_exception(holiday.date, holiday.name);
                    }
                }
                Err(e) => {
                    warn!(
                        calendar = %self.name,
                        location = %location,
                        year,
                        error = %e,
                        "holiday data unavailable"
                    );
                    let year_first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(first);
                    let year_last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(last);
                    self.mark_unavailable(first.max(year_first), last.min(year_last), e.to_string());
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_working_day(&mut self, weekday: Weekday, working: bool) {
        self.working_weekdays[weekday.num_days_from_monday() as usize] = working;
    }

    /// Add a named exception. An existing exception on the same date is kept.
    pub fn add_exception(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.exceptions.entry(date).or_insert_with(|| name.into());
    }

    /// Add the days of an off-day record, named after its type.
    pub fn add_off_day(&mut self, record: &OffDayRecord) {
        for day in record.days() {
            self.add_exception(day, record.kind.as_str());
        }
    }

    /// Dates in `[first, last]` without holiday data.
    pub fn mark_unavailable(&mut self, first: NaiveDate, last: NaiveDate, reason: impl Into<String>) {
        self.unavailable.push(UnavailableRange {
            first,
            last,
            reason: reason.into(),
        });
    }
}

impl CalendarContext for ProjectCalendar {
    fn is_working_weekday(&self, weekday: Weekday) -> bool {
        self.working_weekdays[weekday.num_days_from_monday() as usize]
    }

    fn exception_on(&self, date: NaiveDate) -> Result<Option<String>, DomainError> {
        if let Some(name) = self.exceptions.get(&date) {
            return Ok(Some(name.clone()));
        }
        match self
            .unavailable
            .iter()
            .find(|r| r.first <= date && date <= r.last)
        {
            Some(range) => Err(DomainError::CalendarLookup(format!(
                "{}: {}",
                self.name, range.reason
            ))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::holidays::RuleHolidayProvider;
    use crate::domain::OffDayType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn location(country: &str, subdivision: Option<&str>, start: NaiveDate) -> Location {
        Location {
            country: country.into(),
            subdivision: subdivision.map(String::from),
            start,
        }
    }

    #[test]
    fn default_week_is_monday_to_friday() {
        let cal = ProjectCalendar::new("default");
        assert!(cal.is_working_weekday(Weekday::Mon));
        assert!(cal.is_working_weekday(Weekday::Fri));
        assert!(!cal.is_working_weekday(Weekday::Sat));
        assert!(!cal.is_working_weekday(Weekday::Sun));
    }

    #[test]
    fn loads_holidays_and_off_days() {
        let off = OffDayRecord {
            user: "kim".into(),
            first_day: date(2025, 6, 2),
            last_day: date(2025, 6, 3),
            kind: OffDayType::Trip,
        };
        let cal = ProjectCalendar::for_user(
            "kim",
            &[location("de", Some("nw"), date(2025, 1, 1))],
            &[off],
            &RuleHolidayProvider::new(),
            date(2025, 12, 31),
        );
        assert_eq!(
            cal.exception_on(date(2025, 12, 25)).unwrap().as_deref(),
            Some("Christmas Day")
        );
        assert_eq!(cal.exception_on(date(2025, 6, 3)).unwrap().as_deref(), Some("TRIP"));
        assert_eq!(cal.exception_on(date(2025, 6, 4)).unwrap(), None);
    }

    #[test]
    fn location_change_switches_holidays() {
        // Epiphany (Jan 6) is a holiday in Bavaria but not in North Rhine-Westphalia.
        let cal = ProjectCalendar::for_user(
            "lee",
            &[
                location("de", Some("nw"), date(2024, 1, 1)),
                location("de", Some("by"), date(2025, 1, 1)),
            ],
            &[],
            &RuleHolidayProvider::new(),
            date(2025, 12, 31),
        );
        assert_eq!(cal.exception_on(date(2024, 1, 6)).unwrap(), None);
        assert!(cal.exception_on(date(2025, 1, 6)).unwrap().is_some());
    }

    #[test]
    fn unsupported_region_reports_lookup_failure() {
        let cal = ProjectCalendar::for_user(
            "sam",
            &[location("xx", None, date(2025, 1, 1))],
            &[],
            &RuleHolidayProvider::new(),
            date(2025, 12, 31),
        );
        let err = cal.exception_on(date(2025, 3, 3)).unwrap_err();
        assert!(matches!(err, DomainError::CalendarLookup(_)));
    }

    #[test]
    fn holiday_wins_over_off_day_name() {
        let mut cal = ProjectCalendar::new("x");
        cal.add_exception(date(2025, 12, 25), "Christmas Day");
        cal.add_off_day(&OffDayRecord {
            user: "x".into(),
            first_day: date(2025, 12, 24),
            last_day: date(2025, 12, 26),
            kind: OffDayType::Vacation,
        });
        assert_eq!(
            cal.exception_on(date(2025, 12, 25)).unwrap().as_deref(),
            Some("Christmas Day")
        );
        assert_eq!(
            cal.exception_on(date(2025, 12, 24)).unwrap().as_deref(),
            Some("VACATION")
        );
    }
}
