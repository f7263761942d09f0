// src/cache/mod.rs
// =============================================================================
// Local cache of finished editorials.
//
// One JSON file per problem under the cache directory. A record carries its
// own TTL, so changing CACHE_TTL_HOURS only affects records written later.
// =============================================================================

mod store;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::editorial::TutorialFormat;
use crate::problem::ProblemIdentifier;

pub use store::EditorialCache;

// A hundred years
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

/// What we keep for one problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub problem: ProblemIdentifier,
    pub tutorial_url: String,
    pub tutorial_format: TutorialFormat,
    /// The complete Markdown document, ready to print
    pub markdown: String,
    pub cached_at: DateTime<Utc>,
    pub ttl_hours: u64,
}

impl CacheRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // Clamp so absurd TTLs stay inside chrono's range
        let ttl = Duration::hours(self.ttl_hours.min(MAX_TTL_HOURS) as i64);
        now - self.cached_at >= ttl
    }
}
