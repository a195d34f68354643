//! Board exports.

pub mod csv_report;

pub use csv_report::{board_to_csv, write_board_csv};
