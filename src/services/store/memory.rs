use super::{DocumentStore, StoreError};
use crate::models::{Document, DocumentStatus, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-process store with the same contract as [`MongoStore`]. Used by the
/// integration tests and selectable as a backend for local development.
///
/// [`MongoStore`]: super::MongoStore
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<String, Document>,
    users: HashMap<String, User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(
        &self,
        id: &str,
        name: &str,
        summary: Option<String>,
        status: DocumentStatus,
        owner_id: &str,
    ) -> Result<(), StoreError> {
        let document = Document::new(id, name, summary, status, owner_id);
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;
        inner.documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn get(&self, id: &str, owner_id: &str) -> Result<Document, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;
        let document = inner.documents.get(id).ok_or(StoreError::NotFound)?;

        if document.owner_id != owner_id {
            return Err(StoreError::Forbidden);
        }

        Ok(document.clone())
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Document>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;

        let mut documents: Vec<Document> = inner
            .documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();

        // Same tie-break as the Mongo backend: timestamp desc, then id desc.
        documents.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(documents)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;
        inner.documents.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn upsert_user(&self, email: &str) -> Result<User, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;
        let user = inner
            .users
            .entry(email.to_string())
            .or_insert_with(|| User::new(email));
        Ok(user.clone())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_is_an_upsert_that_advances_the_timestamp() {
        let store = MemoryStore::new();

        store
            .put("d1", "a.txt", None, DocumentStatus::Pending, "u1")
            .await
            .unwrap();
        let pending = store.get("d1", "u1").await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        store
            .put(
                "d1",
                "a.txt",
                Some("summary".to_string()),
                DocumentStatus::Completed,
                "u1",
            )
            .await
            .unwrap();
        let completed = store.get("d1", "u1").await.unwrap();

        assert_eq!(completed.status, DocumentStatus::Completed);
        assert_eq!(completed.summary.as_deref(), Some("summary"));
        assert!(completed.timestamp > pending.timestamp);
    }

    #[tokio::test]
    async fn get_distinguishes_missing_from_foreign_documents() {
        let store = MemoryStore::new();
        store
            .put("d1", "a.txt", None, DocumentStatus::Pending, "u1")
            .await
            .unwrap();

        assert!(matches!(
            store.get("missing", "u1").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.get("d1", "u2").await,
            Err(StoreError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let store = MemoryStore::new();
        store
            .put("d1", "a.txt", None, DocumentStatus::Pending, "u1")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .put("d2", "b.txt", None, DocumentStatus::Pending, "u1")
            .await
            .unwrap();
        store
            .put("d3", "c.txt", None, DocumentStatus::Pending, "u2")
            .await
            .unwrap();

        let listed = store.list("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "d2");
        assert_eq!(listed[1].id, "d1");
        assert!(listed[0].timestamp > listed[1].timestamp);
    }

    #[tokio::test]
    async fn delete_reports_not_found_for_unknown_ids() {
        let store = MemoryStore::new();
        store
            .put("d1", "a.txt", None, DocumentStatus::Pending, "u1")
            .await
            .unwrap();

        assert!(store.delete("d1").await.is_ok());
        assert!(matches!(store.delete("d1").await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.delete("never-existed").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn user_registration_is_idempotent() {
        let store = MemoryStore::new();

        let first = store.upsert_user("user@example.com").await.unwrap();
        let second = store.upsert_user("user@example.com").await.unwrap();

        assert_eq!(first.email, second.email);
        assert_eq!(first.created_at, second.created_at);
    }
}
