//! Query shapes understood by every `RecordStore`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{LincdError, Result};
use crate::thread::ThreadRecord;
use crate::user::UserRecord;

/// A compiled case-insensitive pattern matched against username or name.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    raw: String,
    regex: Regex,
}

impl SearchPattern {
    /// Compiles `text` as a case-insensitive regular expression, matched
    /// anywhere in the haystack.
    ///
    /// Returns `Ok(None)` when `text` is blank, meaning "no search filter".
    /// Otherwise the text is compiled as given, surrounding whitespace
    /// included.
    ///
    /// ```
    /// use lincd_core::store::SearchPattern;
    ///
    /// let pattern = SearchPattern::compile("^Ad.").unwrap().unwrap();
    /// assert!(pattern.is_match("adam"));
    /// assert!(!pattern.is_match("mad.hatter"));
    /// assert!(SearchPattern::compile("   ").unwrap().is_none());
    /// assert!(SearchPattern::compile("(").unwrap_err().is_validation());
    /// ```
    pub fn compile(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let regex = RegexBuilder::new(text).case_insensitive(true).build()?;
        Ok(Some(Self {
            raw: text.to_string(),
            regex,
        }))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// The text the pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Filter over the Users collection. All present clauses must hold.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// `id != exclude_identity`
    pub exclude_identity: Option<String>,
    /// `username ~ pattern OR name ~ pattern`
    pub search: Option<SearchPattern>,
}

impl UserFilter {
    pub fn excluding(identity: impl Into<String>) -> Self {
        Self {
            exclude_identity: Some(identity.into()),
            search: None,
        }
    }

    pub fn with_search(mut self, search: Option<SearchPattern>) -> Self {
        self.search = search;
        self
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        if self
            .exclude_identity
            .as_deref()
            .is_some_and(|excluded| excluded == user.id)
        {
            return false;
        }
        match &self.search {
            Some(pattern) => pattern.is_match(&user.username) || pattern.is_match(&user.name),
            None => true,
        }
    }
}

/// Filter over the Threads collection. All present clauses must hold.
#[derive(Debug, Clone, Default)]
pub struct ThreadFilter {
    /// `author == author`
    pub author: Option<String>,
    /// `id IN ids`
    pub ids: Option<Vec<String>>,
    /// `author != exclude_author`
    pub exclude_author: Option<String>,
}

impl ThreadFilter {
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    pub fn with_ids(ids: Vec<String>) -> Self {
        Self {
            ids: Some(ids),
            ..Default::default()
        }
    }

    pub fn excluding_author(mut self, author: impl Into<String>) -> Self {
        self.exclude_author = Some(author.into());
        self
    }

    pub fn matches(&self, thread: &ThreadRecord) -> bool {
        if let Some(author) = &self.author
            && thread.author != *author
        {
            return false;
        }
        if let Some(ids) = &self.ids
            && !ids.contains(&thread.id)
        {
            return false;
        }
        if let Some(excluded) = &self.exclude_author
            && thread.author == *excluded
        {
            return false;
        }
        true
    }
}

/// Direction for creation-time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Orders users by `created_at`, breaking ties by id ascending.
    pub fn compare_users(self, a: &UserRecord, b: &UserRecord) -> Ordering {
        let by_time = match self {
            SortDirection::Asc => a.created_at.cmp(&b.created_at),
            SortDirection::Desc => b.created_at.cmp(&a.created_at),
        };
        by_time.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for SortDirection {
    type Err = LincdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Asc),
            "desc" | "descending" | "-1" => Ok(SortDirection::Desc),
            other => Err(LincdError::validation(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Skip/limit window applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Converts a 1-based page number and a page size into a skip/limit window.
    ///
    /// Both values must be at least 1.
    pub fn for_page(page_number: i64, page_size: i64) -> Result<Self> {
        if page_number < 1 {
            return Err(LincdError::validation(format!(
                "page number must be at least 1, got {}",
                page_number
            )));
        }
        if page_size < 1 {
            return Err(LincdError::validation(format!(
                "page size must be at least 1, got {}",
                page_size
            )));
        }
        let skip = (page_number as u64 - 1)
            .checked_mul(page_size as u64)
            .ok_or_else(|| LincdError::validation("page offset overflows"))?;
        Ok(Self {
            skip,
            limit: page_size as u64,
        })
    }

    /// Applies this window to an already sorted sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}
