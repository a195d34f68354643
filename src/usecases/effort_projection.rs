//! Progress, delay, velocity-based extrapolation and efficiency of a sprint.
//!
//! Elapsed time is measured in working days strictly before `now`'s date, so
//! nothing has elapsed on the sprint's first day. Time progress stops at the
//! sprint's end; pace (velocity, efficiency, release projection) keeps counting
//! up to `now`. All figures are pure functions of the inputs and the calendar.

use super::calendar_service::CalendarService;
use crate::domain::duration::{WORKING_DAY_SECS, max_work_duration, working_days};
use crate::domain::{DomainError, Projection, Sprint};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Timing and effort figures a projection is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct EffortInputs {
    pub start: NaiveDateTime,
    pub now: NaiveDateTime,
    pub end: NaiveDateTime,
    pub worked: TimeDelta,
    pub remaining: TimeDelta,
    pub original_estimate: Option<TimeDelta>,
}

impl EffortInputs {
    pub fn from_sprint(sprint: &Sprint, now: NaiveDateTime) -> Self {
        Self {
            start: sprint.start,
            now,
            end: sprint.end,
            worked: sprint.worked,
            remaining: sprint.remaining,
            original_estimate: sprint.original_estimation,
        }
    }

    /// `worked + remaining`. `None` on overflow.
    pub fn estimated_total(&self) -> Option<TimeDelta> {
        self.worked.checked_add(&self.remaining)
    }

    /// # Errors
    /// `InvalidRange` for `start > end`, `InvalidEffort` for negative or
    /// oversized durations.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.start > self.end {
            return Err(DomainError::invalid_range(self.start, self.end));
        }
        let negative = |d: TimeDelta| d < TimeDelta::zero();
        if negative(self.worked) {
            return Err(DomainError::InvalidEffort(format!("worked is negative: {}", self.worked)));
        }
        if negative(self.remaining) {
            return Err(DomainError::InvalidEffort(format!(
                "remaining is negative: {}",
                self.remaining
            )));
        }
        if self.original_estimate.is_some_and(negative) {
            return Err(DomainError::InvalidEffort("original estimate is negative".into()));
        }
        let max = max_work_duration();
        let oversized = |d: TimeDelta| d > max;
        if oversized(self.worked)
            || oversized(self.remaining)
            || self.original_estimate.is_some_and(oversized)
        {
            return Err(DomainError::InvalidEffort(format!(
                "effort above {}h",
                max.num_hours()
            )));
        }
        if self.estimated_total().is_none() {
            return Err(DomainError::InvalidEffort("worked + remaining overflows".into()));
        }
        Ok(())
    }
}

/// `worked / estimated_total`, never negative. Nothing to do counts as done.
pub fn actual_progress(worked: TimeDelta, estimated_total: TimeDelta) -> f64 {
    if estimated_total <= TimeDelta::zero() {
        return 1.0;
    }
    (worked.num_seconds() as f64 / estimated_total.num_seconds() as f64).max(0.0)
}

/// Projection of one sprint at one instant.
pub struct EffortProjection<'c, 'a> {
    inputs: EffortInputs,
    calendar: &'c CalendarService<'a>,
    estimated_total: TimeDelta,
    total_days: u32,
    /// Working days in `[start, now)`, capped at `end`.
    elapsed_days: u32,
    /// Working days in `[start, now)`.
    paced_days: u32,
}

impl<'c, 'a> EffortProjection<'c, 'a> {
    /// # Errors
    /// See [`EffortInputs::validate`].
    pub fn new(inputs: EffortInputs, calendar: &'c CalendarService<'a>) -> Result<Self, DomainError> {
        inputs.validate()?;
        let estimated_total = inputs
            .estimated_total()
            .ok_or_else(|| DomainError::InvalidEffort("worked + remaining overflows".into()))?;
        let start = inputs.start.date();
        let end = inputs.end.date();
        let total_days = calendar.count_working_days_inclusive(start, end);
        let before_now = if inputs.now <= inputs.start {
            None
        } else {
            inputs.now.date().pred_opt()
        };
        let (elapsed_days, paced_days) = match before_now {
            Some(last) if last > end => (
                total_days,
                total_days
                    + end
                        .succ_opt()
                        .map(|next| calendar.count_working_days_inclusive(next, last))
                        .unwrap_or(0),
            ),
            Some(last) => {
                let days = calendar.count_working_days_inclusive(start, last);
                (days, days)
            }
            None => (0, 0),
        };
        Ok(Self {
            inputs,
            calendar,
            estimated_total,
            total_days,
            elapsed_days,
            paced_days,
        })
    }

    /// Working days in `[start, end]`.
    pub fn total_working_days(&self) -> u32 {
        self.total_days
    }

    /// Working days between `start` and the day before `now`, capped at `end`.
    pub fn elapsed_working_days(&self) -> u32 {
        self.elapsed_days
    }

    /// Working days between `start` and the day before `now`, not capped.
    pub fn paced_working_days(&self) -> u32 {
        self.paced_days
    }

    /// `worked + remaining`.
    pub fn estimated_total(&self) -> TimeDelta {
        self.estimated_total
    }

    fn total_secs(&self) -> i64 {
        self.estimated_total.num_seconds()
    }

    fn worked_secs(&self) -> i64 {
        self.inputs.worked.num_seconds()
    }

    /// Share of the sprint's working time that has passed.
    pub fn time_progress(&self) -> f64 {
        if self.inputs.now >= self.inputs.end {
            return 1.0;
        }
        if self.total_days == 0 {
            return 0.0;
        }
        self.elapsed_days as f64 / self.total_days as f64
    }

    /// Fraction of the estimated total that should be consumed by `now`.
    ///
    /// The time share is scaled by `original / estimated_total` when an original
    /// estimate exists, so scope added after planning is not expected yet.
    pub fn expected_progress(&self) -> f64 {
        let total = self.total_secs();
        let scale = match self.inputs.original_estimate {
            Some(original) if total > 0 && original > TimeDelta::zero() => {
                original.num_seconds() as f64 / total as f64
            }
            _ => 1.0,
        };
        (self.time_progress() * scale).clamp(0.0, 1.0)
    }

    pub fn actual_progress(&self) -> f64 {
        actual_progress(self.inputs.worked, self.estimated_total)
    }

    /// `expected - actual`. Positive means behind schedule.
    pub fn delay_fraction(&self) -> f64 {
        self.expected_progress() - self.actual_progress()
    }

    /// Effort that should have been done by now but was not (signed).
    pub fn effort_delay(&self) -> TimeDelta {
        TimeDelta::seconds((self.delay_fraction() * self.total_secs() as f64).round() as i64)
    }

    /// Effort delivered per unit of working time from `start` to `now`.
    pub fn velocity(&self) -> Option<f64> {
        if self.paced_days == 0 || self.worked_secs() <= 0 {
            return None;
        }
        Some(self.worked_secs() as f64 / (self.paced_days as i64 * WORKING_DAY_SECS) as f64)
    }

    /// Effort delay converted into working time at the observed velocity.
    pub fn schedule_delay(&self) -> Projection<TimeDelta> {
        self.velocity()
            .and_then(|v| {
                let secs = (self.effort_delay().num_seconds() as f64 / v).round();
                if !secs.is_finite() || secs.abs() > i64::MAX as f64 {
                    return None;
                }
                TimeDelta::try_seconds(secs as i64)
            })
            .into()
    }

    /// Release date if the observed velocity holds until all work is done.
    pub fn projected_release_date(&self) -> Projection<NaiveDateTime> {
        if self.velocity().is_none() {
            return Projection::Indeterminate;
        }
        let needed = (self.total_secs() as f64 * self.paced_days as f64
            / self.worked_secs() as f64)
            .ceil();
        if !needed.is_finite() || needed > u32::MAX as f64 {
            return Projection::Indeterminate;
        }
        self.calendar
            .add_working_days(self.inputs.start.date(), needed as u32)
            .map(|date| date.and_time(self.inputs.end.time()))
            .into()
    }

    /// Working days from `end` to the projected release. Negative when early.
    pub fn extrapolated_delay_days(&self) -> Projection<i64> {
        let end = self.inputs.end.date();
        self.projected_release_date()
            .map(|release| self.signed_working_days(end, release.date()))
    }

    fn signed_working_days(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        if to > from {
            from.succ_opt()
                .map(|next| self.calendar.count_working_days_inclusive(next, to) as i64)
                .unwrap_or(0)
        } else {
            to.succ_opt()
                .map(|next| -(self.calendar.count_working_days_inclusive(next, from) as i64))
                .unwrap_or(0)
        }
    }

    /// Extrapolated delay relative to the sprint's working days.
    pub fn extrapolated_delay_fraction(&self) -> Projection<f64> {
        if self.total_days == 0 {
            return Projection::Indeterminate;
        }
        let total = self.total_days as f64;
        self.extrapolated_delay_days().map(|days| days as f64 / total)
    }

    pub fn extrapolated_schedule_delay(&self) -> Projection<TimeDelta> {
        self.extrapolated_delay_days().map(working_days)
    }

    /// Person-days per workday needed to finish exactly on time.
    pub fn optimal_efficiency(&self) -> f64 {
        if self.total_days == 0 {
            return 0.0;
        }
        self.total_secs() as f64 / (self.total_days as i64 * WORKING_DAY_SECS) as f64
    }

    /// Person-days per workday delivered so far.
    pub fn efficiency(&self) -> f64 {
        self.velocity().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::calendar::ProjectCalendar;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn inputs(now: NaiveDateTime, worked: i64, remaining: i64) -> EffortInputs {
        EffortInputs {
            start: at(2025, 6, 2, 8),
            now,
            end: at(2025, 6, 13, 17),
            worked: working_days(worked),
            remaining: working_days(remaining),
            original_estimate: None,
        }
    }

    #[test]
    fn halfway_on_track() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let p = EffortProjection::new(inputs(at(2025, 6, 9, 8), 5, 5), &svc).unwrap();
        assert_eq!(p.total_working_days(), 10);
        assert_eq!(p.elapsed_working_days(), 5);
        assert!((p.expected_progress() - 0.5).abs() < 1e-9);
        assert_eq!(p.actual_progress(), 0.5);
        assert!(p.delay_fraction().abs() < 1e-9);
        assert_eq!(p.effort_delay(), TimeDelta::zero());
        assert_eq!(p.schedule_delay(), Projection::Determinate(TimeDelta::zero()));
        assert_eq!(p.extrapolated_delay_fraction(), Projection::Determinate(0.0));
        assert_eq!(p.projected_release_date(), Projection::Determinate(at(2025, 6, 13, 17)));
        assert!((p.optimal_efficiency() - 1.0).abs() < 1e-9);
        assert!((p.efficiency() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn behind_schedule() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        // 5 days elapsed, 2.5 days of 10 done: half speed.
        let mut i = inputs(at(2025, 6, 9, 8), 0, 0);
        i.worked = TimeDelta::seconds(WORKING_DAY_SECS * 5 / 2);
        i.remaining = TimeDelta::seconds(WORKING_DAY_SECS * 15 / 2);
        let p = EffortProjection::new(i, &svc).unwrap();
        assert!((p.delay_fraction() - 0.25).abs() < 1e-9);
        assert_eq!(p.effort_delay(), TimeDelta::seconds(WORKING_DAY_SECS * 5 / 2));
        // 2.5 days of effort at 0.5 per day is 5 working days late.
        assert_eq!(p.schedule_delay(), Projection::Determinate(working_days(5)));
        // 20 working days needed from 2025-06-02: 2025-06-27, ten days after the end.
        assert_eq!(p.projected_release_date(), Projection::Determinate(at(2025, 6, 27, 17)));
        assert_eq!(p.extrapolated_delay_days(), Projection::Determinate(10));
        assert_eq!(p.extrapolated_delay_fraction(), Projection::Determinate(1.0));
        assert_eq!(p.extrapolated_schedule_delay(), Projection::Determinate(working_days(10)));
    }

    #[test]
    fn ahead_of_schedule_is_negative() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let p = EffortProjection::new(inputs(at(2025, 6, 9, 8), 8, 2), &svc).unwrap();
        assert!(p.delay_fraction() < 0.0);
        // ceil(10 * 5 / 8) = 7 working days: 2025-06-10.
        assert_eq!(p.extrapolated_delay_days(), Projection::Determinate(-3));
    }

    #[test]
    fn first_day_has_no_history() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let mut i = inputs(at(2025, 6, 2, 8), 1, 9);
        i.now = i.start;
        let p = EffortProjection::new(i, &svc).unwrap();
        assert_eq!(p.expected_progress(), 0.0);
        assert_eq!(p.extrapolated_delay_fraction(), Projection::Indeterminate);
        assert_eq!(p.schedule_delay(), Projection::Indeterminate);
        assert_eq!(p.efficiency(), 0.0);
    }

    #[test]
    fn zero_velocity_is_indeterminate() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let p = EffortProjection::new(inputs(at(2025, 6, 11, 8), 0, 10), &svc).unwrap();
        assert_eq!(p.extrapolated_delay_fraction(), Projection::Indeterminate);
        assert_eq!(p.projected_release_date(), Projection::Indeterminate);
        assert!((p.delay_fraction() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn after_end_expects_everything() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let p = EffortProjection::new(inputs(at(2025, 6, 20, 8), 9, 1), &svc).unwrap();
        assert_eq!(p.time_progress(), 1.0);
        assert_eq!(p.expected_progress(), 1.0);
        assert_eq!(p.elapsed_working_days(), 10);
        assert!((p.delay_fraction() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn overdue_pace_counts_up_to_now() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let now = at(2025, 7, 11, 8);
        let p = EffortProjection::new(inputs(now, 5, 5), &svc).unwrap();
        assert_eq!(p.elapsed_working_days(), 10);
        assert_eq!(p.paced_working_days(), 29);
        assert_eq!(p.time_progress(), 1.0);
        assert!((p.efficiency() - 5.0 / 29.0).abs() < 1e-9);
        // 5 days behind at 5/29 per day.
        assert_eq!(p.schedule_delay(), Projection::Determinate(working_days(29)));
        // ceil(10 * 29 / 5) = 58 working days from 2025-06-02.
        let release = p.projected_release_date();
        assert_eq!(release, Projection::Determinate(at(2025, 8, 20, 17)));
        assert!(release.value().is_some_and(|r| *r >= now));
        assert_eq!(p.extrapolated_delay_days(), Projection::Determinate(48));
        assert_eq!(p.extrapolated_delay_fraction(), Projection::Determinate(4.8));
    }

    #[test]
    fn one_week_overdue() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let p = EffortProjection::new(inputs(at(2025, 6, 20, 8), 5, 5), &svc).unwrap();
        assert_eq!(p.paced_working_days(), 14);
        assert_eq!(
            p.projected_release_date(),
            Projection::Determinate(at(2025, 7, 9, 17))
        );
        assert_eq!(p.extrapolated_schedule_delay(), Projection::Determinate(working_days(18)));
    }

    #[test]
    fn oversized_effort_is_rejected() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let mut i = inputs(at(2025, 6, 9, 8), 0, 0);
        i.worked = TimeDelta::hours(1_500_000_000_000);
        i.remaining = TimeDelta::hours(1_500_000_000_000);
        assert!(matches!(
            EffortProjection::new(i, &svc),
            Err(DomainError::InvalidEffort(_))
        ));
        let mut i = inputs(at(2025, 6, 9, 8), 0, 0);
        i.worked = TimeDelta::MAX;
        i.remaining = TimeDelta::MAX;
        assert_eq!(i.estimated_total(), None);
        assert!(matches!(i.validate(), Err(DomainError::InvalidEffort(_))));
    }

    #[test]
    fn original_estimate_scales_expectation() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        // Planned 8 days, scope grew to 10.
        let mut i = inputs(at(2025, 6, 9, 8), 4, 6);
        i.original_estimate = Some(working_days(8));
        let p = EffortProjection::new(i, &svc).unwrap();
        assert!((p.expected_progress() - 0.4).abs() < 1e-9);
        assert!(p.delay_fraction().abs() < 1e-9);
    }

    #[test]
    fn empty_sprint_counts_as_done() {
        assert_eq!(actual_progress(TimeDelta::zero(), TimeDelta::zero()), 1.0);
    }

    #[test]
    fn actual_progress_is_monotonic_in_worked() {
        let total = working_days(10);
        let mut last = f64::MIN;
        for hours in 0..=75 {
            let p = actual_progress(TimeDelta::hours(hours), total);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let cal = ProjectCalendar::new("t");
        let svc = CalendarService::new(&cal);
        let mut i = inputs(at(2025, 6, 9, 8), 1, 1);
        i.end = at(2025, 6, 1, 8);
        assert!(matches!(
            EffortProjection::new(i, &svc),
            Err(DomainError::InvalidRange { .. })
        ));
        let mut i = inputs(at(2025, 6, 9, 8), 1, 1);
        i.remaining = -TimeDelta::hours(1);
        assert!(matches!(
            EffortProjection::new(i, &svc),
            Err(DomainError::InvalidEffort(_))
        ));
    }
}
