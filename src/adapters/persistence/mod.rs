//! File-backed collaborators.

pub mod json_store;

pub use json_store::{JsonOffDayStore, JsonSprintStore};
