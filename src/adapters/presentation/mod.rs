//! Display formatting of sprint statistics.

pub mod view;

pub use view::{NA, StatisticsView};
