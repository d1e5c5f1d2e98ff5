//! Hello interface, the smallest capability: a named greeting service used
//! to smoke-test a deployment end to end.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct HelloRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct HelloResponse {
    pub greeting: String,
}

#[derive(Debug, Error)]
pub enum HelloError {
    #[error("hello service error: {0}")]
    Internal(String),
}

#[async_trait]
pub trait Hello: Send + Sync {
    async fn hello(&self, req: HelloRequest) -> Result<HelloResponse, HelloError>;
}
