//! In-memory file store.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use plinth_core::file::{
    DelRequest, FileError, FileInfo, FileReader, FileStore, GetFileRequest, ListRequest,
    ListResponse, PutFileRequest, StatRequest, StatResponse,
};

/// File backend storing objects in a map of byte vectors.
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, data: Vec<u8>) {
        self.files.lock().unwrap().insert(name.into(), data);
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn get(&self, req: GetFileRequest) -> Result<FileReader, FileError> {
        let data = self
            .files
            .lock()
            .unwrap()
            .get(&req.name)
            .cloned()
            .ok_or_else(|| FileError::NotFound(req.name.clone()))?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn put(&self, mut req: PutFileRequest) -> Result<(), FileError> {
        let mut data = Vec::new();
        req.data
            .read_to_end(&mut data)
            .await
            .map_err(|err| FileError::Internal(err.to_string()))?;
        self.files.lock().unwrap().insert(req.name, data);
        Ok(())
    }

    async fn list(&self, req: ListRequest) -> Result<ListResponse, FileError> {
        let files = self.files.lock().unwrap();
        let mut infos: Vec<FileInfo> = files
            .iter()
            .filter(|(name, _)| req.directory.is_empty() || name.starts_with(&req.directory))
            .map(|(name, data)| FileInfo {
                name: name.clone(),
                size: data.len() as i64,
                ..Default::default()
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ListResponse {
            files: infos,
            marker: String::new(),
            truncated: false,
        })
    }

    async fn del(&self, req: DelRequest) -> Result<(), FileError> {
        self.files
            .lock()
            .unwrap()
            .remove(&req.name)
            .map(|_| ())
            .ok_or(FileError::NotFound(req.name))
    }

    async fn stat(&self, req: StatRequest) -> Result<StatResponse, FileError> {
        let files = self.files.lock().unwrap();
        let data = files
            .get(&req.name)
            .ok_or_else(|| FileError::NotFound(req.name.clone()))?;
        Ok(StatResponse {
            size: data.len() as i64,
            ..Default::default()
        })
    }
}
