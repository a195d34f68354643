//! Working-day arithmetic over a CalendarContext.
//!
//! Failed holiday lookups never abort a calculation: the day counts as
//! "no holiday" and a warning is recorded for the caller.

use crate::domain::OffDayType;
use crate::ports::CalendarContext;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeSet;
use tracing::warn;

/// Largest working-day offset [`CalendarService::add_working_days`] resolves.
pub const MAX_WORKING_DAY_OFFSET: u32 = 300;
/// Calendar days scanned before giving up on a calendar without working days.
const MAX_SCAN_DAYS: usize = 5 * 366;

/// A date whose holiday status could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CalendarWarning {
    pub date: NaiveDate,
    pub message: String,
}

pub struct CalendarService<'a> {
    calendar: &'a dyn CalendarContext,
    exclude_holidays: bool,
    warnings: RefCell<BTreeSet<CalendarWarning>>,
}

impl<'a> CalendarService<'a> {
    pub fn new(calendar: &'a dyn CalendarContext) -> Self {
        Self {
            calendar,
            exclude_holidays: false,
            warnings: RefCell::new(BTreeSet::new()),
        }
    }

    /// Also skip holidays when counting and offsetting working days.
    pub fn with_exclude_holidays(mut self, exclude: bool) -> Self {
        self.exclude_holidays = exclude;
        self
    }

    /// True unless the weekday of `date` is non-working.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.calendar.is_working_weekday(date.weekday())
    }

    /// True for a named exception that is not a personal off-day.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        match self.calendar.exception_on(date) {
            Ok(Some(name)) => !OffDayType::is_off_day_name(&name),
            Ok(None) => false,
            Err(e) => {
                self.record_warning(date, e.to_string());
                false
            }
        }
    }

    /// Weekend or holiday.
    pub fn is_non_working(&self, date: NaiveDate) -> bool {
        !self.is_working_day(date) || self.is_holiday(date)
    }

    fn counts_as_working(&self, date: NaiveDate) -> bool {
        self.is_working_day(date) && !(self.exclude_holidays && self.is_holiday(date))
    }

    /// Working days in `[start, end]`. Zero when `end < start`.
    pub fn count_working_days_inclusive(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.counts_as_working(*d))
            .count() as u32
    }

    /// Date of the `n`-th working day counted from `start` inclusive.
    ///
    /// Counting begins at the first working day on or after `start`.
    /// `n == 0` returns `start`; `None` beyond [`MAX_WORKING_DAY_OFFSET`].
    pub fn add_working_days(&self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        if n == 0 {
            return Some(start);
        }
        if n > MAX_WORKING_DAY_OFFSET {
            return None;
        }
        start
            .iter_days()
            .take(MAX_SCAN_DAYS)
            .filter(|d| self.counts_as_working(*d))
            .nth(n as usize - 1)
    }

    fn record_warning(&self, date: NaiveDate, message: String) {
        let mut warnings = self.warnings.borrow_mut();
        let warning = CalendarWarning { date, message };
        if !warnings.contains(&warning) {
            warn!(date = %warning.date, message = %warning.message, "calendar lookup failed, assuming no holiday");
            warnings.insert(warning);
        }
    }

    /// Warnings recorded so far, ordered by date.
    pub fn warnings(&self) -> Vec<CalendarWarning> {
        self.warnings.borrow().iter().cloned().collect()
    }

    pub fn take_warnings(&self) -> Vec<CalendarWarning> {
        self.warnings.take().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::calendar::ProjectCalendar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekends_are_not_working_days() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        assert!(svc.is_working_day(date(2025, 6, 6)));
        assert!(!svc.is_working_day(date(2025, 6, 7)));
        assert!(!svc.is_working_day(date(2025, 6, 8)));
    }

    #[test]
    fn off_day_exceptions_are_not_holidays() {
        let mut cal = ProjectCalendar::new("t");
        cal.add_exception(date(2025, 6, 9), "Whit Monday");
        cal.add_exception(date(2025, 6, 10), "VACATION");
        let svc = CalendarService::new(&cal);
        assert!(svc.is_holiday(date(2025, 6, 9)));
        assert!(!svc.is_holiday(date(2025, 6, 10)));
        assert!(!svc.is_holiday(date(2025, 6, 11)));
    }

    #[test]
    fn six_day_week() {
        let mut cal = ProjectCalendar::new("t");
        cal.set_working_day(chrono::Weekday::Sat, true);
        let svc = CalendarService::new(&cal);
        assert!(svc.is_working_day(date(2025, 6, 7)));
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 2), date(2025, 6, 8)), 6);
        assert_eq!(svc.add_working_days(date(2025, 6, 2), 7), Some(date(2025, 6, 9)));
    }

    #[test]
    fn counts_inclusive_range() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 2), date(2025, 6, 13)), 10);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 7), date(2025, 6, 8)), 0);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 4), date(2025, 6, 4)), 1);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 13), date(2025, 6, 2)), 0);
    }

    #[test]
    fn counting_is_additive() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let (start, end) = (date(2025, 5, 28), date(2025, 7, 4));
        let total = svc.count_working_days_inclusive(start, end);
        for mid in start.iter_days().take_while(|d| *d <= end) {
            let next = mid.succ_opt().unwrap();
            assert_eq!(
                svc.count_working_days_inclusive(start, mid)
                    + svc.count_working_days_inclusive(next, end),
                total,
                "split at {}",
                mid
            );
        }
    }

    #[test]
    fn holidays_count_unless_excluded() {
        let mut cal = ProjectCalendar::new("t");
        cal.add_exception(date(2025, 6, 9), "Whit Monday");
        let svc = CalendarService::new(&cal);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 9), date(2025, 6, 13)), 5);
        let strict = CalendarService::new(&cal).with_exclude_holidays(true);
        assert_eq!(strict.count_working_days_inclusive(date(2025, 6, 9), date(2025, 6, 13)), 4);
    }

    #[test]
    fn add_working_days_skips_weekends() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        assert_eq!(svc.add_working_days(date(2018, 3, 12), 5), Some(date(2018, 3, 16)));
        assert_eq!(svc.add_working_days(date(2018, 3, 12), 10), Some(date(2018, 3, 23)));
        assert_eq!(svc.add_working_days(date(2018, 3, 10), 10), Some(date(2018, 3, 23)));
        assert_eq!(svc.add_working_days(date(2018, 3, 11), 10), Some(date(2018, 3, 23)));
        assert_eq!(svc.add_working_days(date(2018, 1, 9), 60), Some(date(2018, 4, 2)));
        assert_eq!(svc.add_working_days(date(2018, 1, 9), 61), Some(date(2018, 4, 3)));
        assert_eq!(svc.add_working_days(date(2018, 3, 10), 0), Some(date(2018, 3, 10)));
        assert_eq!(svc.add_working_days(date(2018, 3, 12), 301), None);
    }

    #[test]
    fn lookup_failure_warns_and_fails_open() {
        let mut cal = ProjectCalendar::new("t");
        cal.mark_unavailable(date(2025, 6, 2), date(2025, 6, 3), "no data");
        let svc = CalendarService::new(&cal).with_exclude_holidays(true);
        assert_eq!(svc.count_working_days_inclusive(date(2025, 6, 2), date(2025, 6, 6)), 5);
        assert!(!svc.is_holiday(date(2025, 6, 2)));
        let warnings = svc.take_warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].date, date(2025, 6, 2));
        assert!(svc.warnings().is_empty());
    }

    #[test]
    fn repeated_lookups_warn_once_per_date() {
        let mut cal = ProjectCalendar::new("t");
        cal.mark_unavailable(date(2025, 6, 2), date(2025, 6, 3), "no data");
        let svc = CalendarService::new(&cal).with_exclude_holidays(true);
        let first = svc.count_working_days_inclusive(date(2025, 6, 2), date(2025, 6, 6));
        let second = svc.count_working_days_inclusive(date(2025, 6, 2), date(2025, 6, 6));
        assert_eq!(first, second);
        assert!(!svc.is_holiday(date(2025, 6, 3)));
        let warnings = svc.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].date, date(2025, 6, 3));
        assert_eq!(svc.take_warnings(), warnings);
    }
}
