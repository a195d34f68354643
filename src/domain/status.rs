//! Sprint health banding and extrapolated values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of an extrapolation. `Indeterminate` when there is not enough
/// history to project (no elapsed working day, zero velocity with work left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Projection<T> {
    Determinate(T),
    Indeterminate,
}

impl<T> Projection<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Projection::Determinate(v) => Some(v),
            Projection::Indeterminate => None,
        }
    }

    pub fn is_determinate(&self) -> bool {
        matches!(self, Projection::Determinate(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Projection<U> {
        match self {
            Projection::Determinate(v) => Projection::Determinate(f(v)),
            Projection::Indeterminate => Projection::Indeterminate,
        }
    }
}

impl<T> From<Option<T>> for Projection<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Projection::Determinate(v),
            None => Projection::Indeterminate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SprintStatus {
    Good,
    Normal,
    Warning,
    Critical,
}

impl SprintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SprintStatus::Good => "GOOD",
            SprintStatus::Normal => "NORMAL",
            SprintStatus::Warning => "WARNING",
            SprintStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_NORMAL_ABOVE: f64 = 0.0;
pub const DEFAULT_WARNING_ABOVE: f64 = 0.1;
pub const DEFAULT_CRITICAL_ABOVE: f64 = 0.2;

/// Delay-fraction cutoffs. A fraction strictly above a cutoff reaches that band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub normal_above: f64,
    pub warning_above: f64,
    pub critical_above: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            normal_above: DEFAULT_NORMAL_ABOVE,
            warning_above: DEFAULT_WARNING_ABOVE,
            critical_above: DEFAULT_CRITICAL_ABOVE,
        }
    }
}

impl StatusThresholds {
    /// Cutoffs must be ascending.
    pub fn is_valid(&self) -> bool {
        self.normal_above <= self.warning_above && self.warning_above <= self.critical_above
    }

    pub fn categorize(&self, delay_fraction: f64) -> SprintStatus {
        if delay_fraction > self.critical_above {
            SprintStatus::Critical
        } else if delay_fraction > self.warning_above {
            SprintStatus::Warning
        } else if delay_fraction > self.normal_above {
            SprintStatus::Normal
        } else {
            SprintStatus::Good
        }
    }

    /// Indeterminate projections band as `Normal`.
    pub fn categorize_projection(&self, delay_fraction: Projection<f64>) -> SprintStatus {
        match delay_fraction {
            Projection::Determinate(fraction) => self.categorize(fraction),
            Projection::Indeterminate => SprintStatus::Normal,
        }
    }
}
