use crate::models::Document;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson};
use mongodb::error::ErrorKind;
use service_core::error::AppError;
use thiserror::Error;

/// Collection-oriented document storage addressed by ObjectId.
///
/// One handle is created at startup and shared by every request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection, in natural order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document without `_id` and return the generated identifier.
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StoreError>;

    /// Merge `changes` into the matching document field by field.
    /// Returns the number of documents matched (0 or 1).
    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        changes: Document,
    ) -> Result<u64, StoreError>;

    /// Returns the number of documents deleted (0 or 1).
    async fn delete_by_id(&self, collection: &str, id: &ObjectId) -> Result<u64, StoreError>;

    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("Inserted document has a non-ObjectId identifier: {0}")]
    UnexpectedIdentifier(Bson),

    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// Stable name for the failure category, surfaced to callers as `errorType`.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Driver(err) => driver_kind(err.kind.as_ref()),
            StoreError::UnexpectedIdentifier(_) => "UnexpectedIdentifierError",
            StoreError::Unavailable(_) => "StoreUnavailable",
        }
    }

    /// Turn the failure into the 500 response for `action`.
    pub fn during(self, action: impl Into<String>) -> AppError {
        let action = action.into();
        tracing::error!(
            action = %action,
            error = %self,
            error_type = self.kind(),
            "Document store operation failed"
        );
        AppError::StoreFailure {
            action,
            details: self.to_string(),
            error_type: self.kind().to_string(),
        }
    }
}

fn driver_kind(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidArgument { .. } => "InvalidArgumentError",
        ErrorKind::Authentication { .. } => "AuthenticationError",
        ErrorKind::BsonDeserialization(_) => "BsonDeserializationError",
        ErrorKind::BsonSerialization(_) => "BsonSerializationError",
        ErrorKind::BulkWrite(_) => "BulkWriteError",
        ErrorKind::Command(_) => "CommandError",
        ErrorKind::Io(_) => "IoError",
        ErrorKind::ServerSelection { .. } => "ServerSelectionError",
        ErrorKind::Write(_) => "WriteError",
        _ => "MongoError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_maps_to_store_failure() {
        let err = StoreError::Unavailable("store offline".to_string())
            .during("Failed to fetch bookings");

        match err {
            AppError::StoreFailure {
                action,
                details,
                error_type,
            } => {
                assert_eq!(action, "Failed to fetch bookings");
                assert_eq!(details, "store offline");
                assert_eq!(error_type, "StoreUnavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn driver_errors_report_their_kind() {
        let err: mongodb::error::Error = std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )
        .into();

        assert_eq!(StoreError::from(err).kind(), "IoError");
    }
}
