//! In-memory RecordStore implementation.

use async_trait::async_trait;
use chrono::Utc;
use lincd_core::community::{Community, NewCommunity};
use lincd_core::store::{PageRequest, RecordStore, SortDirection, ThreadFilter, UserFilter};
use lincd_core::thread::{NewThread, ThreadRecord};
use lincd_core::user::{ProfileFields, UserRecord};
use lincd_core::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::StoreSnapshot;

/// A `RecordStore` that lives entirely in process memory.
///
/// Cloning shares the underlying collections. Used by tests and by the
/// `memory` backend, where losing data on exit is acceptable.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<StoreSnapshot>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the current contents.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>> {
        Ok(self.state.read().await.find_user(identity))
    }

    async fn find_users(
        &self,
        filter: &UserFilter,
        sort: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<UserRecord>> {
        Ok(self.state.read().await.find_users(filter, sort, page))
    }

    async fn find_users_by_ids(&self, identities: &[String]) -> Result<Vec<UserRecord>> {
        Ok(self.state.read().await.find_users_by_ids(identities))
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        Ok(self.state.read().await.count_users(filter))
    }

    async fn upsert_user(&self, identity: &str, fields: &ProfileFields) -> Result<()> {
        let outcome = self
            .state
            .write()
            .await
            .upsert_user(identity, fields, Utc::now())?;
        tracing::debug!(identity, ?outcome, "upserted user in memory");
        Ok(())
    }

    async fn find_threads(&self, filter: &ThreadFilter) -> Result<Vec<ThreadRecord>> {
        Ok(self.state.read().await.find_threads(filter))
    }

    async fn insert_thread(&self, thread: NewThread) -> Result<ThreadRecord> {
        self.state.write().await.insert_thread(thread, Utc::now())
    }

    async fn find_communities(&self, ids: &[String]) -> Result<Vec<Community>> {
        Ok(self.state.read().await.find_communities(ids))
    }

    async fn insert_community(&self, community: NewCommunity) -> Result<Community> {
        self.state
            .write()
            .await
            .insert_community(community, Utc::now())
    }

    async fn add_membership(&self, identity: &str, community_id: &str) -> Result<()> {
        self.state
            .write()
            .await
            .add_membership(identity, community_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(username: &str, name: &str) -> ProfileFields {
        ProfileFields {
            username: username.to_string(),
            name: name.to_string(),
            bio: String::new(),
            image: format!("https://img.example/{}.png", username),
            onboarded: true,
        }
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryRecordStore::new();
        let other = store.clone();

        store.upsert_user("u1", &fields("ada", "Ada")).await.unwrap();

        let found = other.find_user("u1").await.unwrap();
        assert_eq!(found.unwrap().username, "ada");
    }

    #[tokio::test]
    async fn test_populated_user_keeps_membership_order() {
        let store = InMemoryRecordStore::new();
        store.upsert_user("u1", &fields("ada", "Ada")).await.unwrap();
        let first = store
            .insert_community(NewCommunity::new("zeta", "Zeta"))
            .await
            .unwrap();
        let second = store
            .insert_community(NewCommunity::new("alpha", "Alpha"))
            .await
            .unwrap();
        store.add_membership("u1", &second.id).await.unwrap();
        store.add_membership("u1", &first.id).await.unwrap();

        let profile = store.find_user_populated("u1").await.unwrap().unwrap();
        let slugs: Vec<&str> = profile.communities.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_populated_user_missing() {
        let store = InMemoryRecordStore::new();
        assert!(store.find_user_populated("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_author_summaries() {
        let store = InMemoryRecordStore::new();
        store.upsert_user("u1", &fields("ada", "Ada")).await.unwrap();
        store.upsert_user("u2", &fields("bob", "Bob")).await.unwrap();

        let summaries = store
            .find_author_summaries(&["u2".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        let bob = &summaries["u2"];
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.image, "https://img.example/bob.png");
    }
}
