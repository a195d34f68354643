//! Application use cases. Calculation core plus services orchestrating it via ports.

pub mod calendar_service;
pub mod effort_projection;
pub mod off_day_service;
pub mod off_day_splitter;
pub mod quality_board_service;
pub mod statistics;

pub use calendar_service::{CalendarService, CalendarWarning, MAX_WORKING_DAY_OFFSET};
pub use effort_projection::{EffortInputs, EffortProjection};
pub use off_day_service::OffDayService;
pub use quality_board_service::{BoardEntry, QualityBoardService};
pub use statistics::{ReleaseDate, ReleaseDateKind, SprintStatistics, SprintStatisticsAssembler};
