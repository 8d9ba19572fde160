//! Query cache with prefix invalidation.
//!
//! Values are stored as JSON so one map can hold every query's result type.
//! The map lock is never held across an await: a fetch marks the entry as
//! loading, releases the lock, calls the backend, then re-locks to store the
//! result. Two callers fetching the same stale key may both hit the backend,
//! and an invalidation that lands mid-fetch is overwritten by the fetch
//! result. Both races are accepted.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::{BackendError, QueryKey, RetryPolicy, SyncError};

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Known to the cache but never fetched.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed. Any earlier value is kept.
    Error,
}

/// How a read was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fresh value served from the cache.
    Hit,
    /// Nothing cached; fetched from the backend.
    Miss,
    /// Cached value was invalidated; refetched from the backend.
    Stale,
    /// Query disabled; default returned without touching the cache.
    Disabled,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Stale => write!(f, "STALE"),
            Self::Disabled => write!(f, "DISABLED"),
        }
    }
}

/// Change notifications delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEvent {
    /// The entry was created, before any value was stored.
    Created,
    /// A new value was stored.
    Updated,
    /// The value was marked stale; subscribers should refetch.
    Invalidated,
    /// The entry was dropped from the cache.
    Removed,
}

/// Point-in-time view of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub status: QueryStatus,
    pub stale: bool,
    pub has_data: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub subscribers: usize,
}

struct CacheEntry {
    data: Option<Value>,
    status: QueryStatus,
    stale: bool,
    updated_at: Option<DateTime<Utc>>,
    error: Option<String>,
    events: watch::Sender<QueryEvent>,
}

impl CacheEntry {
    fn new() -> Self {
        let (events, _) = watch::channel(QueryEvent::Created);
        Self {
            data: None,
            status: QueryStatus::Idle,
            stale: false,
            updated_at: None,
            error: None,
            events,
        }
    }

    fn store(&mut self, data: Value) {
        self.data = Some(data);
        self.status = QueryStatus::Success;
        self.stale = false;
        self.updated_at = Some(Utc::now());
        self.error = None;
        self.notify(QueryEvent::Updated);
    }

    fn fail(&mut self, error: String) {
        self.status = QueryStatus::Error;
        self.error = Some(error);
    }

    fn notify(&self, event: QueryEvent) {
        self.events.send_replace(event);
    }

    fn fresh_data(&self) -> Option<&Value> {
        self.data.as_ref().filter(|_| !self.stale)
    }

    fn subscribers(&self) -> usize {
        self.events.receiver_count()
    }
}

/// Receives change notifications for one key.
///
/// The entry is kept alive by [`QueryCache::collect_garbage`] while any
/// subscription to it exists.
pub struct QuerySubscription {
    key: QueryKey,
    events: watch::Receiver<QueryEvent>,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Wait for the next change. `None` once the entry is gone.
    pub async fn next(&mut self) -> Option<QueryEvent> {
        self.events.changed().await.ok()?;
        let event = *self.events.borrow_and_update();
        Some(event)
    }

    /// Whether a change arrived that [`next`](Self::next) has not returned yet.
    pub fn has_pending(&self) -> bool {
        self.events.has_changed().unwrap_or(false)
    }
}

/// Map from query key to cached result.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<BTreeMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<QueryKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `key` from the cache, or run `fetcher` under `retry` and store
    /// the result.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        retry: &RetryPolicy,
        fetcher: F,
    ) -> Result<(T, CacheStatus), SyncError>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let status = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            if let Some(data) = entry.fresh_data() {
                tracing::debug!(key = %key, "query cache hit");
                return Ok((serde_json::from_value(data.clone())?, CacheStatus::Hit));
            }
            entry.status = QueryStatus::Loading;
            if entry.data.is_some() {
                CacheStatus::Stale
            } else {
                CacheStatus::Miss
            }
        };

        tracing::debug!(key = %key, %status, "fetching query");
        let outcome = retry.run(fetcher).await;

        let encoded = outcome
            .map_err(SyncError::from)
            .and_then(|value| Ok((serde_json::to_value(&value)?, value)));

        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
        match encoded {
            Ok((data, value)) => {
                entry.store(data);
                Ok((value, status))
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "query failed");
                entry.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Subscribe to changes of `key`, creating an idle entry if needed.
    pub fn subscribe(&self, key: &QueryKey) -> QuerySubscription {
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
        QuerySubscription {
            key: key.clone(),
            events: entry.events.subscribe(),
        }
    }

    /// Mark every entry under any of `prefixes` stale and notify its
    /// subscribers. Returns how many entries were touched.
    pub fn invalidate(&self, prefixes: &[QueryKey]) -> usize {
        let mut entries = self.lock();
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if prefixes.iter().any(|p| key.starts_with(p)) {
                entry.stale = true;
                entry.notify(QueryEvent::Invalidated);
                count += 1;
            }
        }

        tracing::debug!(
            prefixes = ?prefixes.iter().map(ToString::to_string).collect::<Vec<_>>(),
            count,
            "invalidated queries"
        );
        count
    }

    /// Overwrite the value of `key` directly, as if it had just been fetched.
    pub fn set_data<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), SyncError> {
        let data = serde_json::to_value(value)?;
        let mut entries = self.lock();
        entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new)
            .store(data);
        tracing::debug!(key = %key, "query data set");
        Ok(())
    }

    /// The cached value of `key`, stale or not.
    pub fn get_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, SyncError> {
        let entries = self.lock();
        match entries.get(key).and_then(|e| e.data.as_ref()) {
            Some(data) => Ok(Some(serde_json::from_value(data.clone())?)),
            None => Ok(None),
        }
    }

    /// Drop `key`. Subscribers see [`QueryEvent::Removed`] and then the end
    /// of their stream.
    pub fn remove(&self, key: &QueryKey) -> bool {
        match self.lock().remove(key) {
            Some(entry) => {
                entry.notify(QueryEvent::Removed);
                true
            }
            None => false,
        }
    }

    /// Drop entries nobody subscribes to that hold no fresh value.
    pub fn collect_garbage(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.subscribers() > 0 || entry.fresh_data().is_some());
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "collected unused queries");
        }
        removed
    }

    pub fn state(&self, key: &QueryKey) -> Option<QueryState> {
        self.lock().get(key).map(|entry| QueryState {
            status: entry.status,
            stale: entry.stale,
            has_data: entry.data.is_some(),
            updated_at: entry.updated_at,
            error: entry.error.clone(),
            subscribers: entry.subscribers(),
        })
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharma_commerce::ProductId;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn no_retry() -> RetryPolicy {
        RetryPolicy::none()
    }

    async fn fetch_counting(
        cache: &QueryCache,
        key: &QueryKey,
        calls: &AtomicU32,
    ) -> (u32, CacheStatus) {
        cache
            .fetch(key, &no_retry(), || async {
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        let key = QueryKey::products();

        assert_eq!(fetch_counting(&cache, &key, &calls).await, (1, CacheStatus::Miss));
        assert_eq!(fetch_counting(&cache, &key, &calls).await, (1, CacheStatus::Hit));

        assert_eq!(cache.invalidate(&[QueryKey::products()]), 1);
        assert!(cache.state(&key).unwrap().stale);

        assert_eq!(fetch_counting(&cache, &key, &calls).await, (2, CacheStatus::Stale));
        assert!(!cache.state(&key).unwrap().stale);
    }

    #[tokio::test]
    async fn test_invalidate_by_prefix() {
        let cache = QueryCache::new();
        let a = QueryKey::product(&ProductId::new("a"));
        let b = QueryKey::product(&ProductId::new("b"));
        cache.set_data(&a, &1).unwrap();
        cache.set_data(&b, &2).unwrap();
        cache.set_data(&QueryKey::products(), &vec![1, 2]).unwrap();

        assert_eq!(cache.invalidate(&[QueryKey::any_product()]), 2);
        assert!(cache.state(&a).unwrap().stale);
        assert!(cache.state(&b).unwrap().stale);
        assert!(!cache.state(&QueryKey::products()).unwrap().stale);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache = QueryCache::new();
        let key = QueryKey::categories();
        cache.set_data(&key, &vec!["antibiotics"]).unwrap();
        cache.invalidate(&[key.clone()]);

        let result: Result<(Vec<String>, _), _> = cache
            .fetch(&key, &no_retry(), || async {
                Err(BackendError::Transport("offline".into()))
            })
            .await;

        assert!(matches!(result, Err(SyncError::Backend(BackendError::Transport(_)))));
        let state = cache.state(&key).unwrap();
        assert_eq!(state.status, QueryStatus::Error);
        assert!(state.error.unwrap().contains("offline"));
        assert_eq!(
            cache.get_data::<Vec<String>>(&key).unwrap(),
            Some(vec!["antibiotics".to_string()])
        );
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let cache = QueryCache::new();
        let key = QueryKey::admin_orders();
        let mut sub = cache.subscribe(&key);
        assert_eq!(cache.state(&key).unwrap().status, QueryStatus::Idle);
        assert!(!sub.has_pending());

        cache.set_data(&key, &Vec::<u32>::new()).unwrap();
        assert_eq!(sub.next().await, Some(QueryEvent::Updated));

        cache.invalidate(&[QueryKey::admin_orders()]);
        assert!(sub.has_pending());
        assert_eq!(sub.next().await, Some(QueryEvent::Invalidated));

        assert!(cache.remove(&key));
        assert_eq!(sub.next().await, Some(QueryEvent::Removed));
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn test_set_and_get_data() {
        let cache = QueryCache::new();
        let key = QueryKey::admin_session_active();
        assert_eq!(cache.get_data::<bool>(&key).unwrap(), None);

        cache.set_data(&key, &true).unwrap();
        assert_eq!(cache.get_data::<bool>(&key).unwrap(), Some(true));
        assert_eq!(cache.state(&key).unwrap().status, QueryStatus::Success);
    }

    #[test]
    fn test_get_data_with_wrong_type() {
        let cache = QueryCache::new();
        let key = QueryKey::is_admin();
        cache.set_data(&key, &"yes").unwrap();
        assert!(matches!(cache.get_data::<bool>(&key), Err(SyncError::Cache(_))));
    }

    #[test]
    fn test_collect_garbage() {
        let cache = QueryCache::new();
        let fresh = QueryKey::products();
        let stale = QueryKey::categories();
        let watched = QueryKey::order_history();

        cache.set_data(&fresh, &1).unwrap();
        cache.set_data(&stale, &2).unwrap();
        cache.set_data(&watched, &3).unwrap();
        let _sub = cache.subscribe(&watched);
        cache.invalidate(&[stale.clone(), watched.clone()]);

        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.keys(), vec![watched.clone(), fresh]);
        assert_eq!(cache.state(&watched).unwrap().subscribers, 1);
    }

    #[test]
    fn test_garbage_after_unsubscribe() {
        let cache = QueryCache::new();
        let key = QueryKey::hot_products();
        let sub = cache.subscribe(&key);
        assert_eq!(cache.collect_garbage(), 0);

        drop(sub);
        assert_eq!(cache.collect_garbage(), 1);
        assert!(cache.is_empty());
    }
}
