pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::models::{Document, DocumentStatus, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    #[error("document belongs to a different owner")]
    Forbidden,

    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(err))
    }
}

/// Durable record of documents and users.
///
/// `put` is an upsert keyed by document id; the store assigns the timestamp
/// on every write, so successive writes to one id strictly advance it.
/// `get` distinguishes a missing record (`NotFound`) from an existing record
/// owned by someone else (`Forbidden`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(
        &self,
        id: &str,
        name: &str,
        summary: Option<String>,
        status: DocumentStatus,
        owner_id: &str,
    ) -> Result<(), StoreError>;

    async fn get(&self, id: &str, owner_id: &str) -> Result<Document, StoreError>;

    /// All documents for one owner, newest first.
    async fn list(&self, owner_id: &str) -> Result<Vec<Document>, StoreError>;

    /// Hard delete. `NotFound` when the id never existed or was already
    /// removed, so callers can tell a no-op from a real delete.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Idempotent registration keyed by email.
    async fn upsert_user(&self, email: &str) -> Result<User, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
