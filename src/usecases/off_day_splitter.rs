//! Splits an off-day request into contiguous runs of working days.
//!
//! Weekends and public holidays interrupt a run; personal off-days already in
//! the calendar do not.

use super::calendar_service::CalendarService;
use crate::domain::{DomainError, OffDayRecord, OffDayRequest};
use chrono::NaiveDate;

/// Maximal runs of `[first_day, last_day]` without weekends or holidays.
///
/// Empty when every day of the range is excluded.
///
/// # Errors
/// `DomainError::InvalidRange` when `first_day > last_day`.
pub fn split(
    request: &OffDayRequest,
    calendar: &CalendarService<'_>,
) -> Result<Vec<OffDayRecord>, DomainError> {
    if request.first_day > request.last_day {
        return Err(DomainError::invalid_range(request.first_day, request.last_day));
    }

    let record = |first: NaiveDate, last: NaiveDate| OffDayRecord {
        user: request.user.clone(),
        first_day: first,
        last_day: last,
        kind: request.kind,
    };

    let mut records = Vec::new();
    let mut run_start: Option<NaiveDate> = None;
    for day in request
        .first_day
        .iter_days()
        .take_while(|d| *d <= request.last_day)
    {
        let excluded = calendar.is_non_working(day);
        match (excluded, run_start) {
            (false, None) => run_start = Some(day),
            (true, Some(start)) => {
                // day > start, so the predecessor exists
                let end = day.pred_opt().unwrap_or(start);
                records.push(record(start, end));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        records.push(record(start, request.last_day));
    }
    Ok(records)
}
