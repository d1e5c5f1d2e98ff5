//! State store interface.
//!
//! Key/value storage with optional etag-based optimistic concurrency and
//! optional transactional writes. Transaction support is advertised through
//! [`StateStore::features`] and consumed via the stronger
//! [`TransactionalStateStore`] trait; the runtime probes the feature at
//! registry-construction time instead of downcasting.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Capabilities a state component may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFeature {
    /// Supports etag-checked writes.
    Etag,
    /// Implements [`TransactionalStateStore`].
    Transactional,
}

#[derive(Debug, Clone, Default)]
pub struct GetRequest {
    pub key: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetResponse {
    pub data: Vec<u8>,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SetRequest {
    pub key: String,
    pub value: Vec<u8>,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub key: String,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// One result of a bulk read; `error` carries a per-key failure without
/// failing the whole batch.
#[derive(Debug, Clone, Default)]
pub struct BulkGetItem {
    pub key: String,
    pub data: Vec<u8>,
    pub etag: Option<String>,
    pub error: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// One operation inside a transactional batch.
#[derive(Debug, Clone)]
pub enum TransactionalOperation {
    Set(SetRequest),
    Delete(DeleteRequest),
}

/// Errors reported by state components.
///
/// The etag variants are the only ones the runtime maps to non-`INTERNAL`
/// status codes, so components should take care to raise them precisely.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("etag mismatch for key '{key}': {reason}")]
    EtagMismatch { key: String, reason: String },
    #[error("invalid etag: {reason}")]
    EtagInvalid { reason: String },
    #[error("state store error: {0}")]
    Internal(String),
}

/// A pluggable key/value backend.
#[async_trait]
pub trait StateStore: Send + Sync {
    fn features(&self) -> Vec<StateFeature>;

    /// `Ok(None)` means the key does not exist; this is not an error.
    async fn get(&self, req: GetRequest) -> Result<Option<GetResponse>, StateError>;

    async fn bulk_get(&self, reqs: Vec<GetRequest>) -> Result<Vec<BulkGetItem>, StateError> {
        let mut items = Vec::with_capacity(reqs.len());
        for req in reqs {
            let key = req.key.clone();
            match self.get(req).await {
                Ok(Some(resp)) => items.push(BulkGetItem {
                    key,
                    data: resp.data,
                    etag: resp.etag,
                    error: None,
                    metadata: resp.metadata,
                }),
                Ok(None) => items.push(BulkGetItem {
                    key,
                    ..Default::default()
                }),
                Err(err) => items.push(BulkGetItem {
                    key,
                    error: Some(err.to_string()),
                    ..Default::default()
                }),
            }
        }
        Ok(items)
    }

    async fn set(&self, req: SetRequest) -> Result<(), StateError>;

    async fn bulk_set(&self, reqs: Vec<SetRequest>) -> Result<(), StateError> {
        for req in reqs {
            self.set(req).await?;
        }
        Ok(())
    }

    async fn delete(&self, req: DeleteRequest) -> Result<(), StateError>;

    async fn bulk_delete(&self, reqs: Vec<DeleteRequest>) -> Result<(), StateError> {
        for req in reqs {
            self.delete(req).await?;
        }
        Ok(())
    }
}

/// State stores that can apply a batch of writes atomically.
#[async_trait]
pub trait TransactionalStateStore: StateStore {
    /// Apply every operation or none of them.
    async fn multi(&self, operations: Vec<TransactionalOperation>) -> Result<(), StateError>;
}
