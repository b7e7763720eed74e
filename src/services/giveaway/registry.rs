use std::sync::Arc;

use tracing::{error, info};

use crate::db::models::{GiveawayMap, GiveawayRecord};
use crate::db::store::{GiveawayStore, StoreError};
use crate::services::log_channel::LogSink;

/// Create/fetch/delete operations on live giveaways.
///
/// Store failures stop here: they are logged, reported to the log channel
/// and the operation behaves as a no-op, so the bot keeps running on a
/// degraded disk.
#[derive(Debug, Clone)]
pub struct Registry {
    store: Arc<GiveawayStore>,
    log: LogSink,
}

impl Registry {
    pub fn new(store: GiveawayStore, log: LogSink) -> Self {
        Self {
            store: Arc::new(store),
            log,
        }
    }

    /// Persist a new giveaway. Returns false if it could not be saved.
    pub async fn create(&self, record: GiveawayRecord) -> bool {
        let id = record.id;
        let prize = record.prize.clone();
        let ends_at = record.ends_at_unix();

        match self.store.update(|giveaways| giveaways.insert(id, record)).await {
            Ok(_) => {
                info!("Saved giveaway {} for \"{}\"", id, prize);
                self.log.success(
                    "📢 Giveaway Saved",
                    format!(
                        "New giveaway for \"{}\" (ID: {}) saved. Ends at <t:{}:F>.",
                        prize, id, ends_at
                    ),
                );
                true
            }
            Err(e) => {
                self.report_failure(StoreOp::of_update(&e), &e);
                false
            }
        }
    }

    /// Delete a giveaway. Removing an unknown id is not an error.
    pub async fn remove(&self, id: u64) -> bool {
        match self.store.update(|giveaways| giveaways.remove(&id)).await {
            Ok(Some(_)) => {
                info!("Removed giveaway {} from storage", id);
                self.log.notice(
                    "🗑️ Giveaway Deleted",
                    format!("Giveaway with ID {} removed from storage.", id),
                );
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.report_failure(StoreOp::of_update(&e), &e);
                false
            }
        }
    }

    pub async fn get(&self, id: u64) -> Option<GiveawayRecord> {
        self.all().await.remove(&id)
    }

    /// Every live giveaway; empty if the store cannot be read
    pub async fn all(&self) -> GiveawayMap {
        match self.store.load().await {
            Ok(giveaways) => giveaways,
            Err(e) => {
                self.report_failure(StoreOp::Read, &e);
                GiveawayMap::new()
            }
        }
    }

    /// Giveaways whose end time is at or before `now_ms`
    pub async fn all_due(&self, now_ms: i64) -> Vec<GiveawayRecord> {
        self.all()
            .await
            .into_values()
            .filter(|record| record.is_due(now_ms))
            .collect()
    }

    fn report_failure(&self, op: StoreOp, e: &StoreError) {
        let (title, verb) = match op {
            StoreOp::Read => ("🚨 File Read Error", "read"),
            StoreOp::Write => ("🚨 File Write Error", "write to"),
        };
        error!("Giveaway store error: {}", e);
        self.log.error(
            title,
            format!(
                "Failed to {} `{}`: ```{}```",
                verb,
                self.store.path().display(),
                e
            ),
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum StoreOp {
    Read,
    Write,
}

impl StoreOp {
    /// Updates that fail while reading are reported as reads
    fn of_update(e: &StoreError) -> Self {
        match e {
            StoreError::Json { .. } => StoreOp::Read,
            StoreError::Io { .. } => StoreOp::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::tests::{record, temp_path};
    use crate::services::log_channel::LogLevel;

    fn registry() -> (Registry, std::path::PathBuf) {
        let path = temp_path();
        (Registry::new(GiveawayStore::new(&path), LogSink::disabled()), path)
    }

    #[tokio::test]
    async fn test_create_get_and_all() {
        let (registry, path) = registry();
        assert!(registry.create(record(1, 100)).await);
        assert!(registry.create(record(2, 200)).await);

        assert_eq!(registry.get(1).await, Some(record(1, 100)));
        assert_eq!(registry.all().await.len(), 2);
        assert_eq!(registry.get(3).await, None);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (registry, path) = registry();
        registry.create(record(1, 100)).await;
        registry.create(record(2, 200)).await;

        assert!(registry.remove(1).await);
        let once = std::fs::read_to_string(&path).unwrap();
        assert!(!registry.remove(1).await);
        let twice = std::fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
        assert_eq!(registry.all().await.keys().copied().collect::<Vec<_>>(), vec![2]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_all_due_filters_by_end_time() {
        let (registry, path) = registry();
        registry.create(record(1, 1_000)).await;
        registry.create(record(2, 2_000)).await;
        registry.create(record(3, 3_000)).await;

        let due: Vec<u64> = registry.all_due(2_000).await.iter().map(|r| r.id).collect();
        assert_eq!(due, vec![1, 2]);
        assert!(registry.all_due(999).await.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_write_failure_is_absorbed_and_reported() {
        let dir = std::env::temp_dir().join(format!("prizepal-missing-{}", uuid::Uuid::new_v4()));
        let (log, mut rx) = LogSink::channel();
        let registry = Registry::new(GiveawayStore::new(dir.join("giveaways.json")), log);

        assert!(!registry.create(record(1, 100)).await);
        assert!(registry.all().await.is_empty());

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.title, "🚨 File Write Error");
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let path = temp_path();
        std::fs::write(&path, "[1, 2").unwrap();
        let (log, mut rx) = LogSink::channel();
        let registry = Registry::new(GiveawayStore::new(&path), log);

        assert!(registry.all_due(i64::MAX).await.is_empty());
        assert!(!registry.remove(1).await);
        assert_eq!(rx.try_recv().unwrap().title, "🚨 File Read Error");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2");

        let _ = std::fs::remove_file(path);
    }
}
