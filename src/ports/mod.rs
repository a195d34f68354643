//! Port traits. API boundaries for the hexagon.
//!
//! - Calendar: read-only queries the calculation core runs against
//! - Outbound: called by use cases into infrastructure

pub mod calendar;
pub mod outbound;

pub use calendar::{CalendarContext, HolidayProvider};
pub use outbound::{OffDayGateway, SprintProvider};
