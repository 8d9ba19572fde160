//! The synchronization client.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::BackendResult;
use crate::{
    AdminSession, AdminSessionEvent, AdminSessionState, Backend, CacheStatus, Connection,
    ConnectionState, QueryCache, QueryKey, RetryPolicy, SyncError,
};

/// The value a query resolved to and how it was served.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: T,
    pub status: CacheStatus,
}

impl<T: Default> QueryResult<T> {
    pub(crate) fn disabled() -> Self {
        Self {
            data: T::default(),
            status: CacheStatus::Disabled,
        }
    }
}

impl<T> QueryResult<T> {
    /// Whether the query was skipped because it is not enabled yet.
    pub fn is_disabled(&self) -> bool {
        self.status == CacheStatus::Disabled
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Cached queries and invalidating mutations over one backend connection.
///
/// Owned by the application root and handed to whatever needs backend data.
/// Queries are implemented in `queries.rs`, mutations in `mutations.rs`.
pub struct SyncClient {
    pub(crate) connection: Connection,
    pub(crate) cache: Arc<QueryCache>,
    pub(crate) session: AdminSession,
    pub(crate) retry: RetryPolicy,
}

impl SyncClient {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            cache: Arc::new(QueryCache::new()),
            session: AdminSession::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Retry policy for queries that allow retries.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_admin_session(mut self, session: AdminSession) -> Self {
        self.session = session;
        self
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn admin_session(&self) -> AdminSessionState {
        self.session.state()
    }

    /// Use `backend` from now on.
    ///
    /// The caller identity may have changed, so every cached query is
    /// invalidated.
    pub fn connect(&self, backend: Arc<dyn Backend>) {
        self.connection.set(ConnectionState::Connected(backend));
        self.cache.invalidate(&[QueryKey::root()]);
    }

    pub fn disconnect(&self) {
        self.connection.set(ConnectionState::Disconnected);
    }

    /// Run a query through the cache, or return the default when disabled.
    pub(crate) async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        retry: &RetryPolicy,
        fetch: F,
    ) -> Result<QueryResult<T>, SyncError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: Fn(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let Some(backend) = self.connection.backend() else {
            tracing::debug!(key = %key, "query disabled: no connection");
            return Ok(QueryResult::disabled());
        };

        let (data, status) = self
            .cache
            .fetch(&key, retry, || fetch(backend.clone()))
            .await?;
        Ok(QueryResult { data, status })
    }

    /// Run a mutation and invalidate `invalidates` once it succeeds.
    pub(crate) async fn mutate<T, F, Fut>(
        &self,
        name: &'static str,
        invalidates: &[QueryKey],
        call: F,
    ) -> Result<T, SyncError>
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let backend = self.connection.require()?;
        match call(backend).await {
            Ok(value) => {
                let count = self.cache.invalidate(invalidates);
                tracing::debug!(mutation = name, invalidated = count, "mutation succeeded");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(mutation = name, error = %e, "mutation failed");
                Err(e.into())
            }
        }
    }

    /// Feed an admin session event through the state machine and write the
    /// resulting flag into the cache.
    pub(crate) fn transition(
        &self,
        event: AdminSessionEvent,
    ) -> Result<AdminSessionState, SyncError> {
        let state = self.session.apply(event);
        self.cache
            .set_data(&QueryKey::admin_session_active(), &state.is_active())?;
        Ok(state)
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("connection", &self.connection)
            .field("admin_session", &self.session.state())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
