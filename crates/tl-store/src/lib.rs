//! Row-store access for the trip logger.
//!
//! The store is a spreadsheet exposed through a small web app: every
//! collection is a tab of positional rows under a header row. This crate
//! provides:
//! - [`RowStore`]: the raw list/append/update/delete seam
//! - [`HttpRowStore`]: the web-app client over reqwest
//! - [`RowCache`]: a fixed-expiry cache of listed rows
//! - [`Repository`]: typed records on top of a store and a cache

mod cache;
mod http;
mod memory;
mod repository;
mod rows;

use std::future::Future;

use thiserror::Error;
use tl_core::{Collection, RowId, ValidationError};

pub use cache::{DEFAULT_CACHE_TTL, RowCache};
pub use http::{DEFAULT_TIMEOUT, HttpRowStore};
pub use memory::MemoryRowStore;
pub use repository::Repository;
pub use rows::map_rows;

/// Row-store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No endpoint URL has been configured.
    #[error("store endpoint not set")]
    NotConfigured,
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Transport failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The store answered with a non-success status.
    #[error("failed to {action} {collection}: HTTP {status}")]
    Status {
        action: &'static str,
        collection: Collection,
        status: u16,
    },
    /// The store reported an error in its response body.
    #[error("store error: {message}")]
    Api { message: String },
    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A row the caller asked for does not exist.
    #[error("no row with id {id} in {collection}")]
    RowNotFound { collection: Collection, id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Raw access to the positional rows of each collection.
///
/// `list` returns the whole tab including its header row; callers map rows
/// with [`map_rows`].
pub trait RowStore {
    fn list(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, StoreError>> + Send;

    fn append(
        &self,
        collection: Collection,
        row: Vec<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update(
        &self,
        collection: Collection,
        id: &RowId,
        row: Vec<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(
        &self,
        collection: Collection,
        id: &RowId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A fresh row identifier.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
