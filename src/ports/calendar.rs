//! Calendar ports. Read-only query surfaces consumed by the calculation core.

use crate::domain::{DomainError, Holiday, Location};
use chrono::{NaiveDate, Weekday};

/// Per-user calendar: working weekdays plus named exceptions.
///
/// Exceptions cover public holidays and personal off-days; off-days are named
/// after their [`OffDayType`](crate::domain::OffDayType).
pub trait CalendarContext: Send + Sync {
    /// True if `weekday` is conventionally a working day.
    fn is_working_weekday(&self, weekday: Weekday) -> bool;

    /// Name of the calendar exception on `date`, if any.
    ///
    /// # Errors
    /// `DomainError::CalendarLookup` when holiday data for the date is unavailable.
    fn exception_on(&self, date: NaiveDate) -> Result<Option<String>, DomainError>;
}

/// Public holiday source for a location.
pub trait HolidayProvider: Send + Sync {
    /// Holidays of `location` in `year`, sorted by date.
    ///
    /// # Errors
    /// `DomainError::CalendarLookup` for unsupported countries or subdivisions.
    fn holidays(&self, location: &Location, year: i32) -> Result<Vec<Holiday>, DomainError>;
}
