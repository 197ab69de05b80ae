//! Memoization of tracker queries.
//!
//! [`QueryCache`] keys stored issue lists by the exact query string. It is an
//! explicit dependency of the aggregator rather than process-wide state: a
//! capacity bound (FIFO by first insertion) and an optional TTL keep memory
//! bounded, and fetch failures are returned to the caller instead of being
//! collapsed into an empty result set.
//!
//! The lock is never held across an await, so two concurrent misses for the
//! same key can both hit upstream; the second insert wins, which is benign
//! because results are idempotent per query text.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{CacheConfig, TrackerConfig};
use crate::errors::FetchError;
use crate::tracker::{Issue, TrackerClient};

struct Entry {
    issues: Arc<Vec<Issue>>,
    fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Keys in first-insertion order, for eviction.
    order: VecDeque<String>,
}

pub struct QueryCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Option<TimeDelta>,
    page_size: u32,
}

impl QueryCache {
    pub fn new(capacity: usize, ttl_secs: Option<u64>, page_size: u32) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity,
            ttl: ttl_secs.map(|s| TimeDelta::seconds(s as i64)),
            page_size,
        }
    }

    pub fn from_config(cache: &CacheConfig, tracker: &TrackerConfig) -> Self {
        Self::new(cache.capacity, cache.ttl_secs, tracker.page_size)
    }

    /// Return the memoized issue list for `jql`, hitting the tracker on a
    /// miss or an expired entry. Failed fetches are not cached.
    pub async fn get_or_fetch(
        &self,
        tracker: &dyn TrackerClient,
        jql: &str,
    ) -> Result<Arc<Vec<Issue>>, FetchError> {
        if let Some(issues) = self.lookup(jql) {
            tracing::debug!(query = jql, "query cache hit");
            return Ok(issues);
        }
        tracing::debug!(query = jql, "query cache miss");
        let issues = Arc::new(tracker.search_issues(jql, self.page_size).await?);
        self.insert(jql, Arc::clone(&issues));
        Ok(issues)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, jql: &str) -> Option<Arc<Vec<Issue>>> {
        let inner = self.lock();
        let entry = inner.entries.get(jql)?;
        if let Some(ttl) = self.ttl {
            if Utc::now().signed_duration_since(entry.fetched_at) >= ttl {
                return None;
            }
        }
        Some(Arc::clone(&entry.issues))
    }

    fn insert(&self, jql: &str, issues: Arc<Vec<Issue>>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.lock();
        let entry = Entry { issues, fetched_at: Utc::now() };
        if inner.entries.insert(jql.to_string(), entry).is_some() {
            // Refreshed in place; insertion order is unchanged.
            return;
        }
        inner.order.push_back(jql.to_string());
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are always internally consistent, so a poisoned lock from
        // a panicking sibling thread is still safe to read.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::models::{Board, IssueType, Project, Sprint};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn story(key: &str) -> Issue {
        Issue {
            key: key.to_string(),
            issue_type: IssueType::Story,
            summary: format!("summary for {key}"),
            status: "Done".to_string(),
            labels: Vec::new(),
            parent_epic_key: None,
            sprint_id: None,
            target_version: None,
        }
    }

    /// Counts upstream calls and returns one canned issue per query.
    struct CountingTracker {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingTracker {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TrackerClient for CountingTracker {
        async fn search_issues(
            &self,
            jql: &str,
            _max_results: u32,
        ) -> Result<Vec<Issue>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Unavailable { status: 502 });
            }
            Ok(vec![story(&format!("K-{}", jql.len()))])
        }

        async fn list_projects(&self) -> Result<Vec<Project>, FetchError> {
            Ok(Vec::new())
        }

        async fn list_boards(&self) -> Result<Vec<Board>, FetchError> {
            Ok(Vec::new())
        }

        async fn list_sprints(&self, _board_id: u64) -> Result<Vec<Sprint>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn identical_query_issues_one_upstream_call() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(16, None, 1000);

        let first = cache.get_or_fetch(&tracker, "project = 'X'").await.unwrap();
        let second = cache.get_or_fetch(&tracker, "project = 'X'").await.unwrap();

        assert_eq!(tracker.call_count(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_queries_are_cached_separately() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(16, None, 1000);

        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "bb").await.unwrap();
        cache.get_or_fetch(&tracker, "a").await.unwrap();

        assert_eq!(tracker.call_count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_returned_and_not_cached() {
        let tracker = CountingTracker::failing();
        let cache = QueryCache::new(16, None, 1000);

        let err = cache.get_or_fetch(&tracker, "a").await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable { status: 502 }));
        assert!(cache.is_empty());

        // A retry goes upstream again rather than memoizing the failure.
        let _ = cache.get_or_fetch(&tracker, "a").await;
        assert_eq!(tracker.call_count(), 2);
    }

    #[tokio::test]
    async fn capacity_bound_evicts_oldest_entry() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(2, None, 1000);

        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "bb").await.unwrap();
        cache.get_or_fetch(&tracker, "ccc").await.unwrap();
        assert_eq!(cache.len(), 2);

        // "a" was evicted; fetching it again goes upstream.
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        assert_eq!(tracker.call_count(), 4);

        // "ccc" survived the eviction round.
        cache.get_or_fetch(&tracker, "ccc").await.unwrap();
        assert_eq!(tracker.call_count(), 5);
    }

    #[tokio::test]
    async fn zero_ttl_refetches_every_time() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(16, Some(0), 1000);

        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        assert_eq!(tracker.call_count(), 2);
    }

    #[tokio::test]
    async fn long_ttl_behaves_like_no_ttl() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(16, Some(3600), 1000);

        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        assert_eq!(tracker.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_capacity_disables_memoization() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(0, None, 1000);

        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        assert_eq!(tracker.call_count(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn refreshing_an_entry_does_not_grow_the_order_queue() {
        let tracker = CountingTracker::new();
        let cache = QueryCache::new(2, Some(0), 1000);

        // With a zero TTL every lookup misses and re-inserts the same key.
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "a").await.unwrap();
        cache.get_or_fetch(&tracker, "bb").await.unwrap();
        assert_eq!(cache.len(), 2);
    }
}
