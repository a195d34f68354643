//! Implements SprintProvider and OffDayGateway on JSON files.
//!
//! Sprint data is read on every request. Off-days are cached and written back
//! with an atomic write-replace.

use crate::domain::{DomainError, OffDayRecord, Sprint};
use crate::ports::{OffDayGateway, SprintProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SprintDocument {
    #[serde(default)]
    sprints: Vec<Sprint>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OffDayDocument {
    #[serde(default)]
    off_days: Vec<OffDayRecord>,
}

/// Sprints from `{"sprints": [...]}`.
pub struct JsonSprintStore {
    path: PathBuf,
}

impl JsonSprintStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read(&self) -> Result<SprintDocument, DomainError> {
        let s = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&s)
            .map_err(|e| DomainError::Repo(format!("parse {}: {}", self.path.display(), e)))
    }
}

#[async_trait::async_trait]
impl SprintProvider for JsonSprintStore {
    async fn get_sprints(&self) -> Result<Vec<Sprint>, DomainError> {
        let doc = self.read().await?;
        debug!(path = %self.path.display(), sprints = doc.sprints.len(), "sprints loaded");
        Ok(doc.sprints)
    }

    async fn get_sprint(&self, id: i64) -> Result<Option<Sprint>, DomainError> {
        Ok(self.read().await?.sprints.into_iter().find(|s| s.id == id))
    }
}

/// Off-day records in `{"off_days": [...]}`.
pub struct JsonOffDayStore {
    path: PathBuf,
    cache: RwLock<OffDayDocument>,
}

impl JsonOffDayStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(OffDayDocument::default()),
        }
    }

    /// Load records from disk. A missing file is an empty store; a malformed
    /// one is an error so it is never overwritten.
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| DomainError::Repo(format!("parse {}: {}", self.path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => OffDayDocument::default(),
            Err(e) => {
                return Err(DomainError::Repo(format!(
                    "read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        *self.cache.write().await = data;
        Ok(())
    }

    /// Every stored record, all users.
    pub async fn all(&self) -> Vec<OffDayRecord> {
        self.cache.read().await.off_days.clone()
    }

    /// Temp file, fsync, rename over the target.
    async fn save(&self, data: &OffDayDocument) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::Repo(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl OffDayGateway for JsonOffDayStore {
    async fn get_off_days(&self, user: &str) -> Result<Vec<OffDayRecord>, DomainError> {
        let cache = self.cache.read().await;
        Ok(cache
            .off_days
            .iter()
            .filter(|r| r.user == user)
            .cloned()
            .collect())
    }

    async fn save_off_days(&self, records: &[OffDayRecord]) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }
        // Held across the write so concurrent saves serialize.
        let mut cache = self.cache.write().await;
        cache.off_days.extend_from_slice(records);
        if let Err(e) = self.save(&cache).await {
            let keep = cache.off_days.len() - records.len();
            cache.off_days.truncate(keep);
            return Err(e);
        }
        debug!(path = %self.path.display(), added = records.len(), "off days saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OffDayType;
    use chrono::NaiveDate;

    fn record(user: &str, d: u32) -> OffDayRecord {
        let day = NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
        OffDayRecord {
            user: user.into(),
            first_day: day,
            last_day: day,
            kind: OffDayType::Sick,
        }
    }

    #[tokio::test]
    async fn sprint_store_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprints.json");
        std::fs::write(
            &path,
            r#"{"sprints": [
                {"id": 1, "name": "S1", "start": "2025-06-02T08:00:00", "end": "2025-06-13T17:00:00",
                 "worked": "1w", "remaining": "2d 3h 45m"},
                {"id": 2, "name": "S2", "start": "2025-06-16T08:00:00", "end": "2025-06-27T17:00:00",
                 "worked": "0m", "remaining": "2w", "original_estimation": "1w 3d",
                 "release_date": "2025-06-27T12:00:00"}
            ]}"#,
        )
        .unwrap();
        let store = JsonSprintStore::new(&path);
        let sprints = store.get_sprints().await.unwrap();
        assert_eq!(sprints.len(), 2);
        assert_eq!(sprints[0].worked.num_seconds(), 5 * 27_000);
        assert_eq!(sprints[0].remaining.num_seconds(), 2 * 27_000 + 3 * 3600 + 45 * 60);
        assert!(sprints[0].release_date.is_none());
        assert_eq!(
            sprints[1].original_estimation.map(|d| d.num_seconds()),
            Some(8 * 27_000)
        );
        assert_eq!(store.get_sprint(2).await.unwrap().unwrap().name, "S2");
        assert!(store.get_sprint(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_sprint_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSprintStore::new(dir.path().join("none.json"));
        assert!(matches!(store.get_sprints().await, Err(DomainError::Repo(_))));
    }

    #[tokio::test]
    async fn off_days_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("off_days.json");
        let store = JsonOffDayStore::new(&path);
        store.load().await.unwrap();
        assert!(store.get_off_days("kim").await.unwrap().is_empty());

        store
            .save_off_days(&[record("kim", 2), record("lee", 3)])
            .await
            .unwrap();
        store.save_off_days(&[record("kim", 5)]).await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = JsonOffDayStore::new(&path);
        reloaded.load().await.unwrap();
        assert_eq!(
            reloaded.get_off_days("kim").await.unwrap(),
            vec![record("kim", 2), record("kim", 5)]
        );
        assert_eq!(reloaded.all().await.len(), 3);
    }

    #[tokio::test]
    async fn malformed_off_day_file_is_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("off_days.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonOffDayStore::new(&path);
        assert!(matches!(store.load().await, Err(DomainError::Repo(_))));
    }
}
