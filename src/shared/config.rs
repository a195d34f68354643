//! Application configuration. Paths, default location, status policy.
//!
//! Read from `SPRINT_STATS_*` environment variables (and `.env`), plus an
//! optional file named by `SPRINT_STATS_CONFIG`.

use crate::domain::{DomainError, Location, StatusThresholds};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_COUNTRY: &str = "de";
pub const DEFAULT_SUBDIVISION: &str = "nw";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Holds sprints.json, off_days.json and reports/. Read from SPRINT_STATS_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Country of the default location. Read from SPRINT_STATS_COUNTRY.
    #[serde(default)]
    pub country: Option<String>,

    /// Subdivision of the default location; empty for none. Read from SPRINT_STATS_SUBDIVISION.
    #[serde(default)]
    pub subdivision: Option<String>,

    /// First day the default location applies (yyyy-mm-dd). Read from SPRINT_STATS_LOCATION_START.
    #[serde(default)]
    pub location_start: Option<NaiveDate>,

    #[serde(default)]
    pub normal_above: Option<f64>,
    #[serde(default)]
    pub warning_above: Option<f64>,
    #[serde(default)]
    pub critical_above: Option<f64>,

    /// Skip holidays when counting working days. Read from SPRINT_STATS_EXCLUDE_HOLIDAYS.
    #[serde(default)]
    pub exclude_holidays: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let file = std::env::var("SPRINT_STATS_CONFIG").ok();
        Self::from_sources(file.as_deref())
    }

    /// Environment overlaid by `file`, if given.
    pub fn from_sources(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SPRINT_STATS").try_parsing(true));
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(path));
        }
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn sprints_path(&self) -> PathBuf {
        self.data_dir_or_default().join("sprints.json")
    }

    pub fn off_days_path(&self) -> PathBuf {
        self.data_dir_or_default().join("off_days.json")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("reports")
    }

    /// Location used for every calendar. Defaults to Germany, North Rhine-Westphalia,
    /// valid from `default_start` unless a start is configured.
    pub fn location_or_default(&self, default_start: NaiveDate) -> Location {
        let subdivision = match self.subdivision.as_deref() {
            Some("") => None,
            Some(s) => Some(s.to_ascii_lowercase()),
            None => Some(DEFAULT_SUBDIVISION.to_string()),
        };
        Location {
            country: self
                .country
                .as_deref()
                .unwrap_or(DEFAULT_COUNTRY)
                .to_ascii_lowercase(),
            subdivision,
            start: self.location_start.unwrap_or(default_start),
        }
    }

    /// Thresholds with defaults filled in. Errors unless ascending.
    pub fn thresholds(&self) -> Result<StatusThresholds, DomainError> {
        let defaults = StatusThresholds::default();
        let thresholds = StatusThresholds {
            normal_above: self.normal_above.unwrap_or(defaults.normal_above),
            warning_above: self.warning_above.unwrap_or(defaults.warning_above),
            critical_above: self.critical_above.unwrap_or(defaults.critical_above),
        };
        if !thresholds.is_valid() {
            return Err(DomainError::Config(format!(
                "thresholds must ascend: {} <= {} <= {}",
                thresholds.normal_above, thresholds.warning_above, thresholds.critical_above
            )));
        }
        Ok(thresholds)
    }

    pub fn exclude_holidays_or_default(&self) -> bool {
        self.exclude_holidays.unwrap_or(false)
    }
}
