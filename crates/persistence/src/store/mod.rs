//! Document store abstraction.
//!
//! A [`DocumentStore`] is shared by the whole process and hands out one
//! [`StoreSession`] per request. A session is released when it is dropped,
//! so every request path returns it to the store whether it succeeded or not.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::entities::DocumentEntity;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Document codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Database and collection a document lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Document selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the namespace.
    All,
    /// Documents whose value at `path` equals `value`. Numbers compare numerically.
    Eq { path: Vec<String>, value: Value },
}

impl Filter {
    pub fn eq(path: &[&str], value: impl Into<Value>) -> Self {
        Filter::Eq {
            path: path.iter().map(|s| s.to_string()).collect(),
            value: value.into(),
        }
    }

    /// Evaluates the filter against a document body.
    pub fn matches(&self, body: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { path, value } => path
                .iter()
                .try_fold(body, |node, key| node.get(key.as_str()))
                .is_some_and(|found| json_eq(found, value)),
        }
    }
}

/// Insertion-order sort applied to query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Options for [`StoreSession::find`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: SortOrder,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn newest(limit: i64) -> Self {
        Self {
            sort: SortOrder::NewestFirst,
            limit: Some(limit),
        }
    }

    pub fn first() -> Self {
        Self {
            sort: SortOrder::OldestFirst,
            limit: Some(1),
        }
    }
}

/// Shared handle to a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Acquires a session scoped to one unit of work.
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Per-request handle to the store.
#[async_trait]
pub trait StoreSession: Send {
    async fn insert_one(
        &mut self,
        namespace: &Namespace,
        body: Value,
    ) -> Result<DocumentEntity, StoreError>;

    async fn find(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<DocumentEntity>, StoreError>;

    /// Replaces the body of the earliest inserted matching document.
    ///
    /// Returns `None` when no document matched.
    async fn replace_one(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        body: Value,
    ) -> Result<Option<DocumentEntity>, StoreError>;
}

fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => left == right,
    }
}
