//! Directory Service
//!
//! Paginated, searchable listing of every user except the one asking.

use lincd_core::config::DirectoryConfig;
use lincd_core::directory::{DirectoryPage, DirectoryQuery};
use lincd_core::store::{PageRequest, RecordStore, SearchPattern, UserFilter};
use lincd_core::{LincdError, Result};
use std::sync::Arc;

const FETCH_USERS: &str = "fetch users";

/// Service for browsing the user directory
pub struct DirectoryService {
    store: Arc<dyn RecordStore>,
    config: DirectoryConfig,
}

impl DirectoryService {
    /// Create a new DirectoryService
    ///
    /// Page sizes in `config` are raised to at least 1, and the default is
    /// capped at the maximum.
    pub fn new(store: Arc<dyn RecordStore>, config: &DirectoryConfig) -> Self {
        let max_page_size = config.max_page_size.max(1);
        let default_page_size = config.default_page_size.clamp(1, max_page_size);
        if max_page_size != config.max_page_size || default_page_size != config.default_page_size {
            tracing::warn!(
                configured_default = config.default_page_size,
                configured_max = config.max_page_size,
                default_page_size,
                max_page_size,
                "adjusted out-of-range directory page sizes"
            );
        }
        Self {
            store,
            config: DirectoryConfig {
                default_page_size,
                max_page_size,
            },
        }
    }

    /// Returns one page of users matching `query`.
    ///
    /// The requester is always excluded. A non-blank search is compiled as a
    /// case-insensitive regular expression and matched against username or
    /// display name. `has_next_page` is computed from a separate count over
    /// the whole filtered set.
    ///
    /// # Errors
    ///
    /// Page numbers or sizes below 1 are rejected, as are searches that do
    /// not compile. Sizes above `max_page_size` are clamped instead. All failures come back wrapped
    /// as "Failed to fetch users"; no partial page is ever returned.
    pub async fn fetch_users(&self, query: DirectoryQuery) -> Result<DirectoryPage> {
        self.search(&query).await.map_err(|e| {
            tracing::error!(
                identity = %query.requesting_identity,
                error = %e,
                "directory search failed"
            );
            e.during(FETCH_USERS)
        })
    }

    async fn search(&self, query: &DirectoryQuery) -> Result<DirectoryPage> {
        if query.requesting_identity.trim().is_empty() {
            return Err(LincdError::validation("requesting identity must not be empty"));
        }

        let page = PageRequest::for_page(query.page_number, self.page_size(query))?;
        let filter = UserFilter::excluding(&query.requesting_identity)
            .with_search(SearchPattern::compile(&query.search)?);

        tracing::debug!(
            search = filter.search.as_ref().map(SearchPattern::as_str),
            skip = page.skip,
            limit = page.limit,
            sort = %query.sort,
            "directory search"
        );

        self.store.connect().await?;
        let total = self.store.count_users(&filter).await?;
        let users = self.store.find_users(&filter, query.sort, page).await?;

        let has_next_page = total > page.skip + users.len() as u64;

        Ok(DirectoryPage {
            users,
            has_next_page,
            total,
            page_number: query.page_number,
        })
    }

    fn page_size(&self, query: &DirectoryQuery) -> i64 {
        let requested = query.page_size.unwrap_or(self.config.default_page_size);
        if requested > self.config.max_page_size {
            tracing::debug!(
                requested,
                max = self.config.max_page_size,
                "clamping page size"
            );
            self.config.max_page_size
        } else {
            requested
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingRecordStore;
    use lincd_core::store::SortDirection;
    use lincd_core::user::ProfileFields;
    use lincd_infrastructure::InMemoryRecordStore;

    fn fields(username: &str, name: &str) -> ProfileFields {
        ProfileFields {
            username: username.to_string(),
            name: name.to_string(),
            bio: String::new(),
            image: String::new(),
            onboarded: true,
        }
    }

    /// Users are inserted in order, so creation time ascends with the index.
    async fn seeded_service(users: &[(&str, &str, &str)]) -> DirectoryService {
        let store = InMemoryRecordStore::new();
        for (id, username, name) in users {
            store.upsert_user(id, &fields(username, name)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        DirectoryService::new(Arc::new(store), &DirectoryConfig::default())
    }

    fn ids(page: &DirectoryPage) -> Vec<&str> {
        page.users.iter().map(|u| u.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_excludes_requester() {
        let service = seeded_service(&[
            ("me", "me", "Me"),
            ("u1", "ada", "Ada"),
            ("u2", "bob", "Bob"),
        ])
        .await;

        let page = service.fetch_users(DirectoryQuery::new("me")).await.unwrap();
        assert_eq!(ids(&page), vec!["u2", "u1"]);
        assert_eq!(page.total, 2);
        assert!(!page.has_next_page);

        let page = service
            .fetch_users(DirectoryQuery::new("me").search("me"))
            .await
            .unwrap();
        assert!(page.users.iter().all(|u| u.id != "me"));
    }

    #[tokio::test]
    async fn test_search_matches_username_or_name_case_insensitively() {
        let service = seeded_service(&[
            ("me", "me", "Me"),
            ("u1", "lovelace", "Ada"),
            ("u2", "grace", "Grace Hopper"),
            ("u3", "ada_fan", "Fan"),
        ])
        .await;

        let page = service
            .fetch_users(DirectoryQuery::new("me").search("ADA").sort(SortDirection::Asc))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["u1", "u3"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_search_uses_regex_anchors() {
        let service = seeded_service(&[
            ("u1", "adam", "Adam"),
            ("u2", "nomad", "Nomad"),
        ])
        .await;

        let page = service
            .fetch_users(DirectoryQuery::new("me").search("^ada"))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["u1"]);
    }

    #[tokio::test]
    async fn test_invalid_search_is_rejected() {
        let service = seeded_service(&[("u1", "ada", "Ada")]).await;

        let err = service
            .fetch_users(DirectoryQuery::new("me").search("(ada"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Failed to fetch users"));
    }

    #[tokio::test]
    async fn test_pagination_and_has_next_page() {
        let service = seeded_service(&[
            ("u1", "a", "A"),
            ("u2", "b", "B"),
            ("u3", "c", "C"),
            ("u4", "d", "D"),
            ("u5", "e", "E"),
        ])
        .await;

        let query = DirectoryQuery::new("me").sort(SortDirection::Asc).page_size(2);

        let first = service.fetch_users(query.clone().page(1)).await.unwrap();
        assert_eq!(ids(&first), vec!["u1", "u2"]);
        assert!(first.has_next_page);

        let third = service.fetch_users(query.clone().page(3)).await.unwrap();
        assert_eq!(ids(&third), vec!["u5"]);
        assert!(!third.has_next_page);

        let beyond = service.fetch_users(query.page(4)).await.unwrap();
        assert!(beyond.is_empty());
        assert!(!beyond.has_next_page);
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let service = seeded_service(&[("me", "me", "Me")]).await;

        let page = service.fetch_users(DirectoryQuery::new("me")).await.unwrap();
        assert!(page.is_empty());
        assert!(!page.has_next_page);
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_paging() {
        let service = seeded_service(&[]).await;

        let err = service
            .fetch_users(DirectoryQuery::new("me").page(0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Failed to fetch users"));

        let err = service
            .fetch_users(DirectoryQuery::new("me").page_size(-5))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let store = InMemoryRecordStore::new();
        for i in 0..5 {
            let id = format!("u{}", i);
            store.upsert_user(&id, &fields(&id, "N")).await.unwrap();
        }
        let config = DirectoryConfig {
            default_page_size: 2,
            max_page_size: 3,
        };
        let service = DirectoryService::new(Arc::new(store), &config);

        let page = service.fetch_users(DirectoryQuery::new("me")).await.unwrap();
        assert_eq!(page.users.len(), 2);

        let page = service
            .fetch_users(DirectoryQuery::new("me").page_size(50))
            .await
            .unwrap();
        assert_eq!(page.users.len(), 3);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_non_positive_configured_sizes_fall_back_to_one() {
        let store = InMemoryRecordStore::new();
        for i in 0..3 {
            let id = format!("u{}", i);
            store.upsert_user(&id, &fields(&id, "N")).await.unwrap();
        }
        let config = DirectoryConfig {
            default_page_size: 0,
            max_page_size: -4,
        };
        let service = DirectoryService::new(Arc::new(store), &config);

        let page = service.fetch_users(DirectoryQuery::new("me")).await.unwrap();
        assert_eq!(page.users.len(), 1);
        assert!(page.has_next_page);

        let page = service
            .fetch_users(DirectoryQuery::new("me").page_size(10))
            .await
            .unwrap();
        assert_eq!(page.users.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_returns_no_partial_page() {
        let service = DirectoryService::new(Arc::new(FailingRecordStore), &DirectoryConfig::default());
        let err = service
            .fetch_users(DirectoryQuery::new("me"))
            .await
            .unwrap_err();
        assert!(err.is_store());
    }
}
