//! Distributed lock interface.
//!
//! Resource ids reaching components are already namespaced by the runtime,
//! so a component never sees raw application-supplied ids.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct TryLockRequest {
    pub resource_id: String,
    pub lock_owner: String,
    /// Lease duration in seconds; the runtime guarantees this is positive.
    pub expire: i32,
}

/// Outcome of a lock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLockStatus {
    LockAcquired,
    LockBelongToOthers,
    InternalError,
}

#[derive(Debug, Clone)]
pub struct TryLockResponse {
    pub success: bool,
    pub status: TryLockStatus,
}

#[derive(Debug, Clone, Default)]
pub struct UnlockRequest {
    pub resource_id: String,
    pub lock_owner: String,
}

/// Outcome of an unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStatus {
    Success,
    LockUnexist,
    LockBelongToOthers,
    InternalError,
}

#[derive(Debug, Clone)]
pub struct UnlockResponse {
    pub status: UnlockStatus,
}

/// Errors reported by lock components.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock store error: {0}")]
    Internal(String),
}

/// A pluggable distributed-lock backend.
#[async_trait]
pub trait LockStore: Send + Sync {
    async fn try_lock(&self, req: TryLockRequest) -> Result<TryLockResponse, LockError>;

    async fn unlock(&self, req: UnlockRequest) -> Result<UnlockResponse, LockError>;
}
