//! Sprint statistics. One immutable snapshot per sprint and instant.
//!
//! Combines working-day counts from the calendar with the effort projection.
//! Raw values only; display strings live in `adapters::presentation`.

use super::calendar_service::{CalendarService, CalendarWarning};
use super::effort_projection::{EffortInputs, EffortProjection};
use crate::domain::{DomainError, Projection, Sprint, SprintStatus, StatusThresholds};
use crate::ports::CalendarContext;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseDateKind {
    /// Sprint complete; the date is when it finished.
    Actual,
    Extrapolated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseDate {
    pub date: Option<NaiveDateTime>,
    pub kind: ReleaseDateKind,
}

/// All metrics of one sprint at `current_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintStatistics {
    pub sprint_id: i64,
    pub sprint_name: String,
    pub sprint_start: NaiveDateTime,
    pub sprint_end: NaiveDateTime,
    pub current_time: NaiveDateTime,

    pub effort_spent: TimeDelta,
    pub effort_remaining: TimeDelta,
    pub effort_estimate: TimeDelta,
    pub original_estimation: Option<TimeDelta>,

    pub total_work_days: u32,
    pub remaining_work_days: u32,

    pub expected_progress: f64,
    pub actual_progress: f64,
    pub delay_fraction: f64,
    pub effort_delay: TimeDelta,
    pub schedule_delay: Projection<TimeDelta>,
    pub extrapolated_delay_fraction: Projection<f64>,
    pub extrapolated_schedule_delay: Projection<TimeDelta>,

    pub optimal_efficiency: f64,
    pub current_efficiency: f64,

    pub status: SprintStatus,
    pub extrapolated_status: SprintStatus,
    pub release_date: ReleaseDate,

    /// Dates counted as "no holiday" because holiday data was missing.
    pub calendar_warnings: Vec<CalendarWarning>,
}

impl SprintStatistics {
    pub fn is_actual_release_date(&self) -> bool {
        self.release_date.kind == ReleaseDateKind::Actual
    }

    /// Status matching the release date shown: current for finished sprints,
    /// extrapolated otherwise.
    pub fn release_date_status(&self) -> SprintStatus {
        match self.release_date.kind {
            ReleaseDateKind::Actual => self.status,
            ReleaseDateKind::Extrapolated => self.extrapolated_status,
        }
    }
}

/// Builds [`SprintStatistics`]. Stateless apart from policy; share freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SprintStatisticsAssembler {
    thresholds: StatusThresholds,
    exclude_holidays: bool,
}

impl SprintStatisticsAssembler {
    pub fn new(thresholds: StatusThresholds) -> Self {
        Self {
            thresholds,
            exclude_holidays: false,
        }
    }

    pub fn with_exclude_holidays(mut self, exclude: bool) -> Self {
        self.exclude_holidays = exclude;
        self
    }

    /// Snapshot of `sprint` at `now`.
    ///
    /// # Errors
    /// `InvalidRange` when the sprint starts after it ends, `InvalidEffort` for
    /// negative effort figures.
    pub fn compute(
        &self,
        sprint: &Sprint,
        now: NaiveDateTime,
        calendar: &dyn CalendarContext,
    ) -> Result<SprintStatistics, DomainError> {
        let days = CalendarService::new(calendar).with_exclude_holidays(self.exclude_holidays);
        let projection = EffortProjection::new(EffortInputs::from_sprint(sprint, now), &days)?;

        let remaining_work_days =
            days.count_working_days_inclusive(now.date(), sprint.end.date());
        let delay_fraction = projection.delay_fraction();
        let extrapolated_delay_fraction = projection.extrapolated_delay_fraction();

        let release_date = ReleaseDate {
            date: sprint
                .release_date
                .or_else(|| projection.projected_release_date().value().copied()),
            kind: if sprint.is_complete() {
                ReleaseDateKind::Actual
            } else {
                ReleaseDateKind::Extrapolated
            },
        };

        let stats = SprintStatistics {
            sprint_id: sprint.id,
            sprint_name: sprint.name.clone(),
            sprint_start: sprint.start,
            sprint_end: sprint.end,
            current_time: now,
            effort_spent: sprint.worked,
            effort_remaining: sprint.remaining,
            effort_estimate: projection.estimated_total(),
            original_estimation: sprint.original_estimation,
            total_work_days: projection.total_working_days(),
            remaining_work_days,
            expected_progress: projection.expected_progress(),
            actual_progress: projection.actual_progress(),
            delay_fraction,
            effort_delay: projection.effort_delay(),
            schedule_delay: projection.schedule_delay(),
            extrapolated_delay_fraction,
            extrapolated_schedule_delay: projection.extrapolated_schedule_delay(),
            optimal_efficiency: projection.optimal_efficiency(),
            current_efficiency: projection.efficiency(),
            status: self.thresholds.categorize(delay_fraction),
            extrapolated_status: self
                .thresholds
                .categorize_projection(extrapolated_delay_fraction),
            release_date,
            calendar_warnings: days.take_warnings(),
        };

        debug!(
            sprint = %stats.sprint_name,
            now = %now,
            expected = stats.expected_progress,
            actual = stats.actual_progress,
            status = %stats.status,
            "sprint statistics computed"
        );
        Ok(stats)
    }
}
