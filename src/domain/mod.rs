//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod duration;
pub mod entities;
pub mod errors;
pub mod status;

pub use entities::{Holiday, Location, OffDayRecord, OffDayRequest, OffDayType, Sprint};
pub use errors::DomainError;
pub use status::{Projection, SprintStatus, StatusThresholds};
