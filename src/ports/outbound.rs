//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, OffDayRecord, Sprint};

/// Sprint data provider. Sprints arrive already aggregated from tasks and worklogs.
#[async_trait::async_trait]
pub trait SprintProvider: Send + Sync {
    /// All sprints known to the provider, in provider order.
    async fn get_sprints(&self) -> Result<Vec<Sprint>, DomainError>;

    /// A single sprint by id. `None` if unknown.
    async fn get_sprint(&self, id: i64) -> Result<Option<Sprint>, DomainError>;
}

/// Off-day persistence gateway. The core only produces records; this stores them.
#[async_trait::async_trait]
pub trait OffDayGateway: Send + Sync {
    /// Off-day records already stored for `user`.
    async fn get_off_days(&self, user: &str) -> Result<Vec<OffDayRecord>, DomainError>;

    /// Append records. An empty slice is a no-op.
    async fn save_off_days(&self, records: &[OffDayRecord]) -> Result<(), DomainError>;
}
