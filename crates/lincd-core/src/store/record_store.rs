//! The persistence capability every service depends on.

use async_trait::async_trait;
use std::collections::HashMap;

use super::query::{PageRequest, SortDirection, ThreadFilter, UserFilter};
use crate::community::{Community, NewCommunity};
use crate::error::Result;
use crate::thread::{NewThread, ThreadRecord};
use crate::user::{AuthorSummary, ProfileFields, UserProfile, UserRecord};

/// An abstract store over the Users, Threads and Communities collections.
///
/// This trait defines the contract the profile, directory and activity
/// services rely on, decoupling them from the concrete storage mechanism
/// (in-memory maps, TOML snapshots, a document database).
///
/// # Implementation Notes
///
/// Implementations must:
/// - Make `connect` idempotent; services call it before every operation
/// - Enforce username uniqueness in `upsert_user`
/// - Return `find_threads` results in insertion order
/// - Report their own failures as `StoreUnavailable` or `StoreQuery`
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Acquires the underlying connection. Safe to call redundantly.
    async fn connect(&self) -> Result<()>;

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Finds a user by exact identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserRecord))`: User found
    /// - `Ok(None)`: No user with that identity
    /// - `Err(_)`: Store failure
    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>>;

    /// Finds users matching `filter`, sorted by creation time in `sort`,
    /// then windowed by `page`.
    async fn find_users(
        &self,
        filter: &UserFilter,
        sort: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<UserRecord>>;

    /// Finds users whose identity is in `identities`, in no particular order.
    async fn find_users_by_ids(&self, identities: &[String]) -> Result<Vec<UserRecord>>;

    /// Counts every user matching `filter`, ignoring pagination.
    async fn count_users(&self, filter: &UserFilter) -> Result<u64>;

    /// Creates the user if `identity` matches nothing, else overwrites the
    /// settable fields.
    ///
    /// # Errors
    ///
    /// `Conflict` if `fields.username` already belongs to another identity.
    async fn upsert_user(&self, identity: &str, fields: &ProfileFields) -> Result<()>;

    // ------------------------------------------------------------------
    // Threads
    // ------------------------------------------------------------------

    /// Finds threads matching `filter`, in insertion order.
    async fn find_threads(&self, filter: &ThreadFilter) -> Result<Vec<ThreadRecord>>;

    /// Stores a new thread. When `parent_id` is set, the new id is appended
    /// to the parent's children.
    ///
    /// # Errors
    ///
    /// `NotFound` if the parent thread does not exist.
    async fn insert_thread(&self, thread: NewThread) -> Result<ThreadRecord>;

    // ------------------------------------------------------------------
    // Communities
    // ------------------------------------------------------------------

    /// Finds communities by id. Unknown ids are skipped.
    async fn find_communities(&self, ids: &[String]) -> Result<Vec<Community>>;

    /// Stores a new community.
    ///
    /// # Errors
    ///
    /// `Conflict` if the slug is taken.
    async fn insert_community(&self, community: NewCommunity) -> Result<Community>;

    /// Records that `identity` belongs to `community_id`. Joining twice is a no-op.
    ///
    /// # Errors
    ///
    /// `NotFound` if either the user or the community does not exist.
    async fn add_membership(&self, identity: &str, community_id: &str) -> Result<()>;

    // ------------------------------------------------------------------
    // Joins
    // ------------------------------------------------------------------

    /// Finds a user and resolves its community ids into full records,
    /// keeping membership order and dropping dangling ids.
    async fn find_user_populated(&self, identity: &str) -> Result<Option<UserProfile>> {
        let Some(record) = self.find_user(identity).await? else {
            return Ok(None);
        };
        let found = self.find_communities(&record.communities).await?;
        let mut by_id: HashMap<String, Community> =
            found.into_iter().map(|c| (c.id.clone(), c)).collect();
        let communities = record
            .communities
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        Ok(Some(record.into_profile(communities)))
    }

    /// Resolves the minimal author projection for each identity.
    async fn find_author_summaries(
        &self,
        identities: &[String],
    ) -> Result<HashMap<String, AuthorSummary>> {
        let users = self.find_users_by_ids(identities).await?;
        Ok(users
            .iter()
            .map(|user| (user.id.clone(), user.summary()))
            .collect())
    }
}
