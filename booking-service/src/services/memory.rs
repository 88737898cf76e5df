use super::store::{DocumentStore, StoreError};
use crate::models::document::ID_FIELD;
use crate::models::Document;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store with MongoDB-like semantics, for tests and local runs.
///
/// Collections spring into existence on first insert and keep insertion
/// order. Updates replace top-level fields only; dotted paths are stored as
/// literal keys.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    matches!(document.get(ID_FIELD), Some(Bson::ObjectId(oid)) if oid == id)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();

        let mut stored = Document::new();
        stored.insert(ID_FIELD, id);
        for (key, value) in document {
            if key != ID_FIELD {
                stored.insert(key, value);
            }
        }

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(stored);

        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        changes: Document,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)));

        match target {
            Some(document) => {
                for (key, value) in changes {
                    if key != ID_FIELD {
                        document.insert(key, value);
                    }
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, collection: &str, id: &ObjectId) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match docs.iter().position(|d| has_id(d, id)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.read().await.keys().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
