use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

type MillisClock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Assigns process-unique ids (`id-{millis}-{n}`) to articles on ingestion.
///
/// The counter never repeats within a process; the timestamp only makes ids
/// readable. Ids are never used to compare articles.
pub struct ArticleIdGenerator {
    counter: AtomicU64,
    clock: MillisClock,
}

impl ArticleIdGenerator {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(|| Utc::now().timestamp_millis()))
    }

    pub fn with_clock(clock: MillisClock) -> Self {
        Self {
            counter: AtomicU64::new(0),
            clock,
        }
    }

    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("id-{}-{}", (self.clock)(), n)
    }
}

impl Default for ArticleIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArticleIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleIdGenerator")
            .field("counter", &self.counter.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
