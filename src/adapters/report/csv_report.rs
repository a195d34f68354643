//! Quality board as CSV. Uses the `csv` crate for quoting and escaping.
//!
//! Semicolon-delimited, one row per sprint, cells rendered by StatisticsView.
//! Sprints whose statistics failed are left out.

use crate::adapters::presentation::StatisticsView;
use crate::domain::DomainError;
use crate::usecases::BoardEntry;
use std::path::Path;
use tracing::info;

const HEADER: [&str; 13] = [
    "Sprint",
    "Start",
    "End",
    "Expected",
    "Actual",
    "Effort Delay",
    "Schedule Delay",
    "Extrapolated Delay",
    "Efficiency",
    "Optimal Efficiency",
    "Status",
    "Release Date Label",
    "Release Date",
];

/// Render `board` as a CSV string with header row.
pub fn board_to_csv(board: &[BoardEntry]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;

    for stats in board.iter().filter_map(|e| e.statistics.as_ref().ok()) {
        let view = StatisticsView::new(stats);
        wtr.write_record([
            &view.sprint_name,
            &view.sprint_start_date,
            &view.sprint_end_date,
            &view.expected_progress_display,
            &view.actual_progress_display,
            &view.current_effort_delay_display,
            &view.current_schedule_delay,
            &view.extrapolated_schedule_delay_display,
            &view.current_efficiency,
            &view.optimal_efficiency,
            &view.release_date_status,
            &view.release_date_label,
            &view.release_date,
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Write the board CSV to `path`, creating parent directories.
pub async fn write_board_csv(path: &Path, board: &[BoardEntry]) -> Result<(), DomainError> {
    let csv = board_to_csv(board).map_err(|e| DomainError::Repo(format!("render csv: {}", e)))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Repo(format!("create report dir: {}", e)))?;
    }
    tokio::fs::write(path, csv)
        .await
        .map_err(|e| DomainError::Repo(format!("write {}: {}", path.display(), e)))?;
    info!(path = %path.display(), "board report written");
    Ok(())
}
