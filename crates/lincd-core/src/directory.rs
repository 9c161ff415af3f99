//! Directory search request and response models.

use serde::{Deserialize, Serialize};

use crate::store::SortDirection;
use crate::user::UserRecord;

/// A paginated directory search on behalf of `requesting_identity`.
///
/// `page_size` of `None` means "use the configured default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryQuery {
    pub requesting_identity: String,
    #[serde(default)]
    pub search: String,
    #[serde(default = "first_page")]
    pub page_number: i64,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort: SortDirection,
}

fn first_page() -> i64 {
    1
}

impl DirectoryQuery {
    /// Everyone except the requester, first page, newest first.
    pub fn new(requesting_identity: impl Into<String>) -> Self {
        Self {
            requesting_identity: requesting_identity.into(),
            search: String::new(),
            page_number: first_page(),
            page_size: None,
            sort: SortDirection::default(),
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn page(mut self, page_number: i64) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort(mut self, sort: SortDirection) -> Self {
        self.sort = sort;
        self
    }
}

/// One page of directory results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPage {
    pub users: Vec<UserRecord>,
    pub has_next_page: bool,
    /// Count of every matching user, ignoring pagination
    pub total: u64,
    pub page_number: i64,
}

impl DirectoryPage {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = DirectoryQuery::new("me");
        assert_eq!(query.search, "");
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, None);
        assert_eq!(query.sort, SortDirection::Desc);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let query: DirectoryQuery =
            serde_json::from_str(r#"{"requesting_identity":"me","sort":"asc"}"#).unwrap();
        assert_eq!(query.page_number, 1);
        assert_eq!(query.sort, SortDirection::Asc);
    }
}
