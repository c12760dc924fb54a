use super::{DocumentStore, StoreError};
use crate::models::{Document, DocumentStatus, User};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions, ReplaceOptions, UpdateOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            StoreError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        // History queries filter by owner and sort by recency.
        let owner_history_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "timestamp": -1 })
            .options(
                IndexOptions::builder()
                    .name("owner_history_lookup".to_string())
                    .build(),
            )
            .build();

        self.documents()
            .create_index(owner_history_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create owner_history index on documents collection: {}",
                    e
                );
                StoreError::from(e)
            })?;
        tracing::info!("Created index on documents.(owner_id, timestamp)");

        Ok(())
    }

    fn documents(&self) -> Collection<Document> {
        self.db.collection("documents")
    }

    fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn put(
        &self,
        id: &str,
        name: &str,
        summary: Option<String>,
        status: DocumentStatus,
        owner_id: &str,
    ) -> Result<(), StoreError> {
        let document = Document::new(id, name, summary, status, owner_id);

        self.documents()
            .replace_one(
                doc! { "_id": id },
                &document,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;

        tracing::debug!(document_id = %id, status = ?status, "Document record written");
        Ok(())
    }

    async fn get(&self, id: &str, owner_id: &str) -> Result<Document, StoreError> {
        let document = self
            .documents()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or(StoreError::NotFound)?;

        if document.owner_id != owner_id {
            return Err(StoreError::Forbidden);
        }

        Ok(document)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Document>, StoreError> {
        // Secondary _id sort makes equal-timestamp ordering deterministic.
        let find_options = FindOptions::builder()
            .sort(doc! { "timestamp": -1, "_id": -1 })
            .build();

        let mut cursor = self
            .documents()
            .find(doc! { "owner_id": owner_id }, find_options)
            .await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }

        Ok(documents)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = self.documents().delete_one(doc! { "_id": id }, None).await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::debug!(document_id = %id, "Document record deleted");
        Ok(())
    }

    async fn upsert_user(&self, email: &str) -> Result<User, StoreError> {
        // $setOnInsert keeps the original created_at when the user already
        // exists, and is race-free under concurrent registration.
        self.users()
            .update_one(
                doc! { "_id": email },
                doc! { "$setOnInsert": {
                    "created_at": mongodb::bson::DateTime::from_chrono(Utc::now()),
                } },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;

        let user = self
            .users()
            .find_one(doc! { "_id": email }, None)
            .await?
            .ok_or_else(|| {
                StoreError::Backend(anyhow::anyhow!("user upsert did not persist"))
            })?;

        Ok(user)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
