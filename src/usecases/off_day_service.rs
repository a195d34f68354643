//! Off-day requests: validate -> overlap check -> split -> store.

use super::calendar_service::CalendarService;
use super::off_day_splitter;
use crate::domain::{DomainError, OffDayRecord, OffDayRequest};
use crate::ports::{CalendarContext, OffDayGateway};
use std::sync::Arc;
use tracing::{info, warn};

/// Registers off-days of one calendar's user(s).
pub struct OffDayService {
    gateway: Arc<dyn OffDayGateway>,
    calendar: Arc<dyn CalendarContext>,
}

impl OffDayService {
    pub fn new(gateway: Arc<dyn OffDayGateway>, calendar: Arc<dyn CalendarContext>) -> Self {
        Self { gateway, calendar }
    }

    /// Split `request` into working-day runs and store them.
    ///
    /// Returns the stored records; empty (and nothing stored) when the range
    /// holds no working day.
    ///
    /// # Errors
    /// `InvalidRange` for a reversed range, `OffDayOverlap` when the range
    /// intersects a stored record of the same user, gateway errors as-is.
    pub async fn register(&self, request: &OffDayRequest) -> Result<Vec<OffDayRecord>, DomainError> {
        if request.first_day > request.last_day {
            return Err(DomainError::invalid_range(request.first_day, request.last_day));
        }

        let existing = self.gateway.get_off_days(&request.user).await?;
        if let Some(conflict) = existing
            .iter()
            .find(|r| r.overlaps(request.first_day, request.last_day))
        {
            warn!(
                user = %request.user,
                first = %conflict.first_day,
                last = %conflict.last_day,
                "off day request overlaps stored record"
            );
            return Err(DomainError::OffDayOverlap {
                user: request.user.clone(),
                first: conflict.first_day,
                last: conflict.last_day,
            });
        }

        let records = {
            let days = CalendarService::new(self.calendar.as_ref());
            off_day_splitter::split(request, &days)?
        };
        if records.is_empty() {
            info!(user = %request.user, "off day request covers no working day");
            return Ok(records);
        }

        self.gateway.save_off_days(&records).await?;
        info!(
            user = %request.user,
            kind = %request.kind,
            records = records.len(),
            "off days stored"
        );
        Ok(records)
    }
}
