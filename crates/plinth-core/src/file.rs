//! File object interface.
//!
//! Components expose byte-oriented readers; the runtime bridges them to and
//! from the chunked wire streams. Downloads hand back a [`FileReader`] the
//! runtime drains into pooled buffers; uploads receive a reader synthesized
//! from the client's chunk stream, so components never see framing.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Byte stream handed between the runtime and file components.
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

#[derive(Debug, Clone, Default)]
pub struct GetFileRequest {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub struct PutFileRequest {
    pub name: String,
    pub metadata: HashMap<String, String>,
    pub data: FileReader,
}

impl std::fmt::Debug for PutFileRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PutFileRequest")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub directory: String,
    pub page_size: i32,
    pub marker: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    pub name: String,
    pub size: i64,
    pub last_modified: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListResponse {
    pub files: Vec<FileInfo>,
    pub marker: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DelRequest {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct StatRequest {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct StatResponse {
    pub size: i64,
    pub last_modified: String,
    pub metadata: HashMap<String, Vec<String>>,
}

/// Errors reported by file components.
///
/// `NotFound` is the one kind the runtime maps to a dedicated status code;
/// everything else surfaces as an internal failure.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("file store error: {0}")]
    Internal(String),
}

/// A pluggable file/object backend.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn get(&self, req: GetFileRequest) -> Result<FileReader, FileError>;

    /// Consume `req.data` to completion and persist it under `req.name`.
    async fn put(&self, req: PutFileRequest) -> Result<(), FileError>;

    async fn list(&self, req: ListRequest) -> Result<ListResponse, FileError>;

    async fn del(&self, req: DelRequest) -> Result<(), FileError>;

    async fn stat(&self, req: StatRequest) -> Result<StatResponse, FileError>;
}
