//! Infrastructure adapters. Implement ports, render results.
//!
//! Calendars, holiday rules, JSON files, CSV export. Map errors to DomainError.

pub mod calendar;
pub mod holidays;
pub mod persistence;
pub mod presentation;
pub mod report;
