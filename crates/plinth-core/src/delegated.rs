//! Delegated operations.
//!
//! Service invocation, binding invocation, and secret retrieval are served
//! by an adjacent runtime speaking a sister protocol. The dispatch core
//! forwards these requests verbatim through this trait and converts the
//! responses field by field; it never implements them itself.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct InvokeServiceRequest {
    /// Callee application id.
    pub id: String,
    pub method: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct InvokeServiceResponse {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct InvokeBindingRequest {
    pub name: String,
    pub operation: String,
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvokeBindingResponse {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetSecretRequest {
    pub store_name: String,
    pub key: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetSecretResponse {
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetBulkSecretRequest {
    pub store_name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetBulkSecretResponse {
    pub data: HashMap<String, HashMap<String, String>>,
}

/// Errors surfaced by the delegated runtime.
#[derive(Debug, Error)]
pub enum DelegatedError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("delegated call failed: {0}")]
    Internal(String),
}

/// The adjacent runtime the core forwards delegated operations to.
#[async_trait]
pub trait DelegatedRuntime: Send + Sync {
    async fn invoke_service(
        &self,
        req: InvokeServiceRequest,
    ) -> Result<InvokeServiceResponse, DelegatedError>;

    async fn invoke_binding(
        &self,
        req: InvokeBindingRequest,
    ) -> Result<InvokeBindingResponse, DelegatedError>;

    async fn get_secret(&self, req: GetSecretRequest) -> Result<GetSecretResponse, DelegatedError>;

    async fn get_bulk_secret(
        &self,
        req: GetBulkSecretRequest,
    ) -> Result<GetBulkSecretResponse, DelegatedError>;
}
