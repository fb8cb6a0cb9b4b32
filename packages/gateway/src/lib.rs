#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Access to the hosted store behind the dashboard.
//!
//! Every aggregate the dashboard shows is precomputed by a view in the
//! store. The [`Gateway`] trait is the only way the rest of the workspace
//! reads those views: [`PostgrestGateway`] talks to the real store over
//! HTTP, [`MemoryGateway`] keeps tables in memory for tests and local
//! runs. [`queries`] wraps the raw row access in typed functions.

pub mod config;
pub mod memory;
pub mod postgrest;
pub mod queries;
pub mod query;
pub mod retry;

use async_trait::async_trait;
use serde_json::Value;

pub use config::GatewayConfig;
pub use memory::MemoryGateway;
pub use postgrest::PostgrestGateway;
pub use query::{Direction, Filter, Operator, RestQuery};

/// Errors that can occur while talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable is unset or empty.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: String,
    },

    /// The store answered with an error status.
    #[error("Store returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// A response did not have the expected shape.
    #[error("Unexpected response from {table}: {message}")]
    Decode {
        /// Table or view that was queried.
        table: String,
        /// Description of what went wrong.
        message: String,
    },

    /// An in-memory table lock was poisoned.
    #[error("Table lock poisoned")]
    Poisoned,
}

/// Row-level access to the store.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Returns every row matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the store cannot be reached or rejects
    /// the query.
    async fn fetch(&self, query: &RestQuery) -> Result<Vec<Value>, GatewayError>;

    /// Returns the first row matching `query`, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::fetch`].
    async fn fetch_one(&self, query: &RestQuery) -> Result<Option<Value>, GatewayError> {
        let rows = self.fetch(&query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Counts the rows matching `query`, ignoring any limit.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::fetch`].
    async fn count(&self, query: &RestQuery) -> Result<u64, GatewayError>;

    /// Merges `patch` into every row matching `query` and returns the
    /// updated rows.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::fetch`].
    async fn update(&self, query: &RestQuery, patch: Value) -> Result<Vec<Value>, GatewayError>;
}
