//! sprint-stats: Sprint progress, delay projection and off-day splitting with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
