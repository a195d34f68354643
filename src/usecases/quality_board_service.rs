//! Quality board: statistics for every sprint of the provider.
//!
//! One blocking task per sprint, joined back in provider order.

use super::statistics::{SprintStatistics, SprintStatisticsAssembler};
use crate::domain::{DomainError, Sprint};
use crate::ports::{CalendarContext, SprintProvider};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{info, warn};

/// One board row. A malformed sprint fails its own row only.
#[derive(Debug, Clone)]
pub struct BoardEntry {
    pub sprint: Sprint,
    pub statistics: Result<SprintStatistics, DomainError>,
}

pub struct QualityBoardService {
    sprints: Arc<dyn SprintProvider>,
    calendar: Arc<dyn CalendarContext>,
    assembler: SprintStatisticsAssembler,
}

impl QualityBoardService {
    pub fn new(
        sprints: Arc<dyn SprintProvider>,
        calendar: Arc<dyn CalendarContext>,
        assembler: SprintStatisticsAssembler,
    ) -> Self {
        Self {
            sprints,
            calendar,
            assembler,
        }
    }

    /// Board at `now`, in provider order.
    pub async fn board(&self, now: NaiveDateTime) -> Result<Vec<BoardEntry>, DomainError> {
        let sprints = self.sprints.get_sprints().await?;
        info!(sprints = sprints.len(), now = %now, "computing quality board");

        let handles: Vec<_> = sprints
            .into_iter()
            .map(|sprint| {
                let calendar = Arc::clone(&self.calendar);
                let assembler = self.assembler;
                tokio::task::spawn_blocking(move || {
                    let statistics = assembler.compute(&sprint, now, calendar.as_ref());
                    BoardEntry { sprint, statistics }
                })
            })
            .collect();

        let mut board = Vec::with_capacity(handles.len());
        for handle in handles {
            let entry = handle
                .await
                .map_err(|e| DomainError::Task(e.to_string()))?;
            if let Err(e) = &entry.statistics {
                warn!(sprint = %entry.sprint.name, error = %e, "sprint skipped on board");
            }
            board.push(entry);
        }
        Ok(board)
    }

    /// Statistics of a single sprint. `None` if the provider does not know `id`.
    pub async fn sprint(
        &self,
        id: i64,
        now: NaiveDateTime,
    ) -> Result<Option<SprintStatistics>, DomainError> {
        let Some(sprint) = self.sprints.get_sprint(id).await? else {
            return Ok(None);
        };
        let calendar = Arc::clone(&self.calendar);
        let assembler = self.assembler;
        tokio::task::spawn_blocking(move || assembler.compute(&sprint, now, calendar.as_ref()))
            .await
            .map_err(|e| DomainError::Task(e.to_string()))?
            .map(Some)
    }
}
