//! Data synchronization for the Hitech Pharma storefront.
//!
//! Reads go through a [`QueryCache`] keyed by [`QueryKey`]; writes are
//! mutations that, once the backend accepts them, mark the queries they
//! affect as stale so the next read refetches.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pharma_commerce::prelude::*;
//! use pharma_sync::{CacheStatus, Connection, InMemoryBackend, SyncClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), pharma_sync::SyncError> {
//! let backend = Arc::new(InMemoryBackend::new().with_admin("local-user"));
//! let client = SyncClient::new(Connection::connected(backend));
//!
//! client.add_category(Category::new("antibiotics", "Antibiotics")).await?;
//! let categories = client.categories().await?;
//! assert_eq!(categories.status, CacheStatus::Miss);
//! assert_eq!(categories.data.len(), 1);
//! # Ok(())
//! # }
//! ```

mod backend;
mod cache;
mod client;
mod connection;
mod error;
mod key;
mod memory;
mod mutations;
mod queries;
mod retry;
mod session;

pub use backend::{Backend, BackendResult};
pub use cache::{CacheStatus, QueryCache, QueryEvent, QueryState, QueryStatus, QuerySubscription};
pub use client::{QueryResult, SyncClient};
pub use connection::{Connection, ConnectionState};
pub use error::{BackendError, SyncError};
pub use key::{names, QueryKey};
pub use memory::InMemoryBackend;
pub use mutations::Mutation;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use session::{AdminSession, AdminSessionEvent, AdminSessionState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Backend, BackendError, CacheStatus, Connection, QueryKey, QueryResult, SyncClient,
        SyncError,
    };
}
