//! Domain entities. Pure data structures for the core business.
//!
//! No storage or UI types here; adapters map those.

use super::duration::serde_work;
use super::errors::DomainError;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregated timing and effort figures of one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Effort already logged.
    #[serde(with = "serde_work")]
    pub worked: TimeDelta,
    /// Effort still outstanding. Zero means the sprint is complete.
    #[serde(with = "serde_work")]
    pub remaining: TimeDelta,
    /// Estimate made at planning time.
    #[serde(default, with = "serde_work::option")]
    pub original_estimation: Option<TimeDelta>,
    /// Persisted actual or projected completion.
    #[serde(default)]
    pub release_date: Option<NaiveDateTime>,
}

impl Sprint {
    /// `worked + remaining`. `None` on overflow.
    pub fn estimated_total(&self) -> Option<TimeDelta> {
        self.worked.checked_add(&self.remaining)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Why a user is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OffDayType {
    Vacation,
    Sick,
    Trip,
}

impl OffDayType {
    pub const ALL: [OffDayType; 3] = [OffDayType::Vacation, OffDayType::Sick, OffDayType::Trip];

    /// Name used for the calendar exception of an off-day.
    pub fn as_str(self) -> &'static str {
        match self {
            OffDayType::Vacation => "VACATION",
            OffDayType::Sick => "SICK",
            OffDayType::Trip => "TRIP",
        }
    }

    /// True if a calendar exception with this name is a personal off-day.
    pub fn is_off_day_name(name: &str) -> bool {
        Self::ALL.iter().any(|t| t.as_str() == name)
    }
}

impl fmt::Display for OffDayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffDayType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownOffDayType(s.to_string()))
    }
}

/// Raw off-day request as entered by a user (inclusive range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffDayRequest {
    pub user: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OffDayType,
}

/// Contiguous run of working days a user is off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffDayRecord {
    pub user: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OffDayType,
}

impl OffDayRecord {
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.first_day <= last && first <= self.last_day
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first_day
            .iter_days()
            .take_while(move |d| *d <= self.last_day)
    }
}

/// Where a user works from `start` on. Valid until the next location starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// ISO-3166 alpha-2, lower case (`"de"`).
    pub country: String,
    /// Subdivision code (`"nw"`), if any.
    #[serde(default)]
    pub subdivision: Option<String>,
    pub start: NaiveDate,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subdivision {
            Some(sub) => write!(f, "{}-{}", self.country, sub),
            None => f.write_str(&self.country),
        }
    }
}

/// Public holiday of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}
