#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use booking_service::config::{
    BookingConfig, CorsConfig, MongoConfig, ObservabilityConfig,
};
use booking_service::models::Document;
use booking_service::services::{DocumentStore, InMemoryStore, StoreError};
use booking_service::startup::{build_router, AppState};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub fn test_config() -> BookingConfig {
    BookingConfig {
        common: CoreConfig { port: 0 },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("booking_test_{}", uuid::Uuid::new_v4().simple()),
        },
        cors: CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        },
        observability: ObservabilityConfig {
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    /// Router backed by a fresh in-memory store.
    pub fn spawn() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let state = AppState {
            config: test_config(),
            store,
        };
        TestApp {
            router: build_router(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, &body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, &body)).await
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Store whose every operation fails, for exercising the 500 path.
pub struct FailingStore;

fn offline() -> StoreError {
    StoreError::Unavailable("store offline".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, StoreError> {
        Err(offline())
    }

    async fn find_by_id(
        &self,
        _collection: &str,
        _id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        Err(offline())
    }

    async fn insert_one(
        &self,
        _collection: &str,
        _document: Document,
    ) -> Result<ObjectId, StoreError> {
        Err(offline())
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: &ObjectId,
        _changes: Document,
    ) -> Result<u64, StoreError> {
        Err(offline())
    }

    async fn delete_by_id(&self, _collection: &str, _id: &ObjectId) -> Result<u64, StoreError> {
        Err(offline())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Err(offline())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(offline())
    }
}

/// Store that accepts writes but never finds anything afterwards.
#[derive(Default)]
pub struct ForgetfulStore {
    inner: InMemoryStore,
}

#[async_trait]
impl DocumentStore for ForgetfulStore {
    async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _collection: &str,
        _id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StoreError> {
        self.inner.insert_one(collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        changes: Document,
    ) -> Result<u64, StoreError> {
        self.inner.update_by_id(collection, id, changes).await
    }

    async fn delete_by_id(&self, collection: &str, id: &ObjectId) -> Result<u64, StoreError> {
        self.inner.delete_by_id(collection, id).await
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.inner.collection_names().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Request with a raw body and no `Content-Type` unless one is given.
pub fn raw_request(
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
