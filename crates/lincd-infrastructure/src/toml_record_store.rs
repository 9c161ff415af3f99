//! TOML-snapshot RecordStore implementation.
//!
//! File layout:
//! ```text
//! store.toml
//! ├── version = "1.0.0"
//! ├── [[users]]
//! ├── [[threads]]
//! └── [[communities]]
//! ```

use async_trait::async_trait;
use chrono::Utc;
use lincd_core::community::{Community, NewCommunity};
use lincd_core::store::{PageRequest, RecordStore, SortDirection, ThreadFilter, UserFilter};
use lincd_core::thread::{NewThread, ThreadRecord};
use lincd_core::user::{ProfileFields, UserRecord};
use lincd_core::{LincdError, Result};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::storage::{AtomicTomlFile, FileStamp, SNAPSHOT_VERSION, StoreSnapshot};

/// A `RecordStore` persisted as a single TOML snapshot file.
///
/// Reads are served from a cached copy. `connect` reloads that copy whenever
/// the file has been committed since it was loaded, so each service call
/// sees every write finished before it started, from this handle or any
/// other. Every write re-reads the file under an exclusive lock, applies the
/// change, commits it atomically, and then replaces the cache.
pub struct TomlRecordStore {
    file: AtomicTomlFile<StoreSnapshot>,
    cache: RwLock<Option<Loaded>>,
}

struct Loaded {
    snapshot: StoreSnapshot,
    /// `None` when the file did not exist at load time.
    stamp: Option<FileStamp>,
}

impl TomlRecordStore {
    /// Creates a store handle for `path`. Nothing is read until `connect`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path.into()),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Runs `f` against the cached snapshot, failing if `connect` never ran.
    async fn read<R>(&self, f: impl FnOnce(&StoreSnapshot) -> R) -> Result<R> {
        let guard = self.cache.read().await;
        let loaded = guard
            .as_ref()
            .ok_or_else(|| LincdError::store_unavailable("store is not connected"))?;
        Ok(f(&loaded.snapshot))
    }

    /// Applies `f` to the on-disk snapshot under lock and refreshes the cache.
    async fn write<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut StoreSnapshot) -> Result<R> + Send + 'static,
    {
        let mut guard = self.cache.write().await;
        if guard.is_none() {
            return Err(LincdError::store_unavailable("store is not connected"));
        }

        let file = self.file.clone();
        let (result, snapshot, stamp) = tokio::task::spawn_blocking(move || {
            file.update(StoreSnapshot::default(), f)
        })
        .await
        .map_err(|e| LincdError::internal(format!("store write task failed: {}", e)))??;

        *guard = Some(Loaded {
            snapshot,
            stamp: Some(stamp),
        });
        Ok(result)
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> LincdError {
        LincdError::store_unavailable(format!(
            "cannot open {}: {}",
            self.file.path().display(),
            e
        ))
    }
}

#[async_trait]
impl RecordStore for TomlRecordStore {
    async fn connect(&self) -> Result<()> {
        let mut guard = self.cache.write().await;

        let file = self.file.clone();
        let current = tokio::task::spawn_blocking(move || file.stamp())
            .await
            .map_err(|e| LincdError::internal(format!("store stat task failed: {}", e)))?
            .map_err(|e| self.unavailable(e))?;
        if let Some(loaded) = guard.as_ref()
            && loaded.stamp == current
        {
            return Ok(());
        }

        let file = self.file.clone();
        let (data, stamp) = tokio::task::spawn_blocking(move || file.load_stamped())
            .await
            .map_err(|e| LincdError::internal(format!("store load task failed: {}", e)))?
            .map_err(|e| self.unavailable(e))?;

        let snapshot = data.unwrap_or_default();
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(
                found = %snapshot.version,
                expected = SNAPSHOT_VERSION,
                "store snapshot version differs; reading it as the current layout"
            );
        }
        if guard.is_none() {
            tracing::info!(
                path = %self.file.path().display(),
                users = snapshot.users.len(),
                threads = snapshot.threads.len(),
                "connected to TOML record store"
            );
        } else {
            tracing::debug!(
                path = %self.file.path().display(),
                "store file changed; reloaded snapshot"
            );
        }
        *guard = Some(Loaded { snapshot, stamp });
        Ok(())
    }

    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>> {
        self.read(|s| s.find_user(identity)).await
    }

    async fn find_users(
        &self,
        filter: &UserFilter,
        sort: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<UserRecord>> {
        self.read(|s| s.find_users(filter, sort, page)).await
    }

    async fn find_users_by_ids(&self, identities: &[String]) -> Result<Vec<UserRecord>> {
        self.read(|s| s.find_users_by_ids(identities)).await
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        self.read(|s| s.count_users(filter)).await
    }

    async fn upsert_user(&self, identity: &str, fields: &ProfileFields) -> Result<()> {
        let identity_owned = identity.to_string();
        let fields = fields.clone();
        let outcome = self
            .write(move |s| s.upsert_user(&identity_owned, &fields, Utc::now()))
            .await?;
        tracing::debug!(identity, ?outcome, "upserted user in TOML store");
        Ok(())
    }

    async fn find_threads(&self, filter: &ThreadFilter) -> Result<Vec<ThreadRecord>> {
        self.read(|s| s.find_threads(filter)).await
    }

    async fn insert_thread(&self, thread: NewThread) -> Result<ThreadRecord> {
        self.write(move |s| s.insert_thread(thread, Utc::now())).await
    }

    async fn find_communities(&self, ids: &[String]) -> Result<Vec<Community>> {
        self.read(|s| s.find_communities(ids)).await
    }

    async fn insert_community(&self, community: NewCommunity) -> Result<Community> {
        self.write(move |s| s.insert_community(community, Utc::now()))
            .await
    }

    async fn add_membership(&self, identity: &str, community_id: &str) -> Result<()> {
        let identity = identity.to_string();
        let community_id = community_id.to_string();
        self.write(move |s| s.add_membership(&identity, &community_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(username: &str, bio: &str) -> ProfileFields {
        ProfileFields {
            username: username.to_string(),
            name: "Ada Lovelace".to_string(),
            bio: bio.to_string(),
            image: String::new(),
            onboarded: true,
        }
    }

    async fn create_test_store() -> (TomlRecordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlRecordStore::new(temp_dir.path().join("data/store.toml"));
        store.connect().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_queries_before_connect_fail() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlRecordStore::new(temp_dir.path().join("store.toml"));

        let err = store.find_user("u1").await.unwrap_err();
        assert!(matches!(err, LincdError::StoreUnavailable(_)));
        let err = store.upsert_user("u1", &fields("ada", "")).await.unwrap_err();
        assert!(matches!(err, LincdError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let (store, _temp_dir) = create_test_store().await;
        store.upsert_user("u1", &fields("ada", "")).await.unwrap();

        store.connect().await.unwrap();
        assert!(store.find_user("u1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let (store, _temp_dir) = create_test_store().await;
        store.upsert_user("u1", &fields("ada", "first")).await.unwrap();
        store.upsert_user("u1", &fields("ada", "second")).await.unwrap();
        let root = store.insert_thread(NewThread::new("u1", "root")).await.unwrap();
        store
            .insert_thread(NewThread::new("u2", "reply").reply_to(&root.id))
            .await
            .unwrap();

        let reopened = TomlRecordStore::new(store.path());
        reopened.connect().await.unwrap();

        let user = reopened.find_user("u1").await.unwrap().unwrap();
        assert_eq!(user.bio, "second");
        let threads = reopened
            .find_threads(&ThreadFilter::by_author("u1"))
            .await
            .unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].children.len(), 1);
    }

    #[tokio::test]
    async fn test_two_handles_do_not_lose_writes() {
        let (first, _temp_dir) = create_test_store().await;
        let second = TomlRecordStore::new(first.path());
        second.connect().await.unwrap();

        first.upsert_user("u1", &fields("ada", "")).await.unwrap();
        second.upsert_user("u2", &fields("bob", "")).await.unwrap();

        let reopened = TomlRecordStore::new(first.path());
        reopened.connect().await.unwrap();
        assert_eq!(reopened.count_users(&UserFilter::default()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_connect_picks_up_writes_from_other_handles() {
        let (first, _temp_dir) = create_test_store().await;
        first.upsert_user("u1", &fields("ada", "")).await.unwrap();

        let second = TomlRecordStore::new(first.path());
        second.connect().await.unwrap();
        second.upsert_user("u2", &fields("bob", "")).await.unwrap();
        second.upsert_user("u1", &fields("ada", "edited")).await.unwrap();

        first.connect().await.unwrap();
        assert!(first.find_user("u2").await.unwrap().is_some());
        assert_eq!(first.find_user("u1").await.unwrap().unwrap().bio, "edited");
        assert_eq!(first.count_users(&UserFilter::default()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_connect_sees_file_created_after_first_connect() {
        let (first, _temp_dir) = create_test_store().await;
        assert!(!first.path().exists());

        let second = TomlRecordStore::new(first.path());
        second.connect().await.unwrap();
        second.upsert_user("u1", &fields("ada", "")).await.unwrap();

        first.connect().await.unwrap();
        assert!(first.find_user("u1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_conflict_leaves_file_untouched() {
        let (store, _temp_dir) = create_test_store().await;
        store.upsert_user("u1", &fields("ada", "")).await.unwrap();

        let err = store.upsert_user("u2", &fields("ada", "")).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(store.find_user("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.toml");
        std::fs::write(&path, "[[users]\nid = ").unwrap();

        let store = TomlRecordStore::new(&path);
        let err = store.connect().await.unwrap_err();
        assert!(matches!(err, LincdError::StoreUnavailable(_)));
    }
}
