//! Display strings for a [`SprintStatistics`] snapshot.
//!
//! Every caller renders the same strings from here: percentages as `"50%"`,
//! durations in working units, dates as `yyyy.MM.dd`, indeterminate values as
//! [`NA`].

use crate::domain::Projection;
use crate::domain::duration::format_work_duration;
use crate::usecases::{CalendarWarning, SprintStatistics};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

/// Rendering of an indeterminate value.
pub const NA: &str = "NA";

pub const ACTUAL_RELEASE_LABEL: &str = "Actual Sprint Release Date";
pub const EXTRAPOLATED_RELEASE_LABEL: &str = "Extrapolated Sprint Release Date";

const DATE_FORMAT: &str = "%Y.%m.%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsView {
    pub sprint_name: String,
    pub sprint_start_date: String,
    pub sprint_end_date: String,
    pub current_date: String,

    pub effort_spent_display: String,
    pub effort_remaining_display: String,
    pub effort_estimate_display: String,
    pub original_estimation_display: Option<String>,

    pub total_work_days: u32,
    pub remaining_work_days: u32,

    pub expected_progress_display: String,
    pub actual_progress_display: String,
    pub delay_fraction: f64,
    pub current_effort_delay_display: String,
    pub current_schedule_delay: String,
    pub extrapolated_delay_fraction: Option<f64>,
    pub extrapolated_schedule_delay: String,
    pub extrapolated_schedule_delay_display: String,

    pub optimal_efficiency: String,
    pub current_efficiency: String,

    pub status: String,
    pub extrapolated_status: String,
    pub release_date_status: String,
    pub is_actual_release_date: bool,
    pub release_date_label: String,
    pub release_date: String,

    pub calendar_warnings: Vec<String>,
}

impl StatisticsView {
    pub fn new(stats: &SprintStatistics) -> Self {
        let extrapolated_schedule_delay_display = match (
            stats.extrapolated_schedule_delay,
            stats.extrapolated_delay_fraction,
        ) {
            (Projection::Determinate(delay), Projection::Determinate(fraction)) => {
                delay_with_fraction(delay, fraction)
            }
            _ => NA.to_string(),
        };

        Self {
            sprint_name: stats.sprint_name.clone(),
            sprint_start_date: date(stats.sprint_start.date()),
            sprint_end_date: date(stats.sprint_end.date()),
            current_date: date(stats.current_time.date()),
            effort_spent_display: format_work_duration(stats.effort_spent),
            effort_remaining_display: format_work_duration(stats.effort_remaining),
            effort_estimate_display: format_work_duration(stats.effort_estimate),
            original_estimation_display: stats.original_estimation.map(format_work_duration),
            total_work_days: stats.total_work_days,
            remaining_work_days: stats.remaining_work_days,
            expected_progress_display: percent(stats.expected_progress),
            actual_progress_display: percent(stats.actual_progress),
            delay_fraction: stats.delay_fraction,
            current_effort_delay_display: delay_with_fraction(
                stats.effort_delay,
                stats.delay_fraction,
            ),
            current_schedule_delay: duration_or_na(stats.schedule_delay),
            extrapolated_delay_fraction: stats.extrapolated_delay_fraction.value().copied(),
            extrapolated_schedule_delay: duration_or_na(stats.extrapolated_schedule_delay),
            extrapolated_schedule_delay_display,
            optimal_efficiency: efficiency(stats.optimal_efficiency),
            current_efficiency: efficiency(stats.current_efficiency),
            status: stats.status.to_string(),
            extrapolated_status: stats.extrapolated_status.to_string(),
            release_date_status: stats.release_date_status().to_string(),
            is_actual_release_date: stats.is_actual_release_date(),
            release_date_label: release_label(stats).to_string(),
            release_date: stats
                .release_date
                .date
                .map(datetime)
                .unwrap_or_else(|| NA.to_string()),
            calendar_warnings: stats.calendar_warnings.iter().map(warning).collect(),
        }
    }
}

impl From<&SprintStatistics> for StatisticsView {
    fn from(stats: &SprintStatistics) -> Self {
        Self::new(stats)
    }
}

fn release_label(stats: &SprintStatistics) -> &'static str {
    if stats.is_actual_release_date() {
        ACTUAL_RELEASE_LABEL
    } else {
        EXTRAPOLATED_RELEASE_LABEL
    }
}

/// `0.5` -> `"50%"`. Rounded to whole percent; never `"-0%"`.
pub fn percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// `"1d (10%)"`.
pub fn delay_with_fraction(delay: TimeDelta, fraction: f64) -> String {
    format!("{} ({})", format_work_duration(delay), percent(fraction))
}

/// Person-days per workday as `"75% Person"`.
pub fn efficiency(value: f64) -> String {
    format!("{} Person", percent(value))
}

pub fn date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

fn datetime(dt: NaiveDateTime) -> String {
    date(dt.date())
}

fn duration_or_na(value: Projection<TimeDelta>) -> String {
    match value {
        Projection::Determinate(d) => format_work_duration(d),
        Projection::Indeterminate => NA.to_string(),
    }
}

fn warning(w: &CalendarWarning) -> String {
    format!("{}: {}", date(w.date), w.message)
}
