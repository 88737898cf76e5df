use super::store::{DocumentStore, StoreError};
use crate::models::Document;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client as MongoClient, Collection, Database,
};

/// MongoDB-backed store. Cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            StoreError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(doc! {}, None)
            .await
            .map_err(|e| {
                tracing::error!(collection, "Failed to query documents: {}", e);
                StoreError::from(e)
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!(collection, "Failed to collect documents: {}", e);
            StoreError::from(e)
        })?;

        Ok(documents)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(collection, id = %id, "Failed to find document: {}", e);
                StoreError::from(e)
            })
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection, "Failed to insert document: {}", e);
                StoreError::from(e)
            })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::UnexpectedIdentifier(result.inserted_id))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        changes: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": changes }, None)
            .await
            .map_err(|e| {
                tracing::error!(collection, id = %id, "Failed to update document: {}", e);
                StoreError::from(e)
            })?;

        tracing::debug!(
            collection,
            id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "MongoDB update result"
        );

        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, collection: &str, id: &ObjectId) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(collection, id = %id, "Failed to delete document: {}", e);
                StoreError::from(e)
            })?;

        Ok(result.deleted_count)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.db.list_collection_names(None).await.map_err(|e| {
            tracing::error!("Failed to list collections: {}", e);
            StoreError::from(e)
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
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
