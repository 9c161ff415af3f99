//! View invalidation.
//!
//! After some writes the rendering layer must drop its cached output for a
//! path. The service only emits the signal; what a subscriber does with it
//! is up to the subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Receives "the cached view at `path` is stale" signals.
///
/// Called synchronously on the request path, so implementations must not block.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, path: &str);
}

/// Event data describing one invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInvalidated {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

impl ViewInvalidated {
    pub fn now(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp: Utc::now(),
        }
    }
}
