//! Calendar adapters. Implement CalendarContext.

pub mod project_calendar;

pub use project_calendar::ProjectCalendar;
