//! In-memory state store with etag checking and transactions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use plinth_core::state::{
    DeleteRequest, GetRequest, GetResponse, SetRequest, StateError, StateFeature, StateStore,
    TransactionalOperation, TransactionalStateStore,
};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    version: u64,
}

/// Key/value backend with monotonically versioned etags.
///
/// A write carrying an etag fails with `EtagMismatch` unless it matches the
/// stored version, and with `EtagInvalid` when it is not a number.
pub struct InMemoryStateStore {
    entries: Mutex<HashMap<String, Entry>>,
    transactional: bool,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            transactional: true,
        }
    }

    /// A store that does not advertise transaction support.
    pub fn without_transactions() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            transactional: false,
        }
    }

    /// Raw keys currently stored, for namespacing assertions.
    pub fn raw_keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    fn check_etag(entry: Option<&Entry>, etag: &Option<String>, key: &str) -> Result<(), StateError> {
        let Some(etag) = etag else { return Ok(()) };
        let expected: u64 = etag.parse().map_err(|_| StateError::EtagInvalid {
            reason: format!("etag '{etag}' is not a version number"),
        })?;
        match entry {
            Some(entry) if entry.version == expected => Ok(()),
            _ => Err(StateError::EtagMismatch {
                key: key.to_string(),
                reason: format!("expected version {expected}"),
            }),
        }
    }

    fn apply_set(entries: &mut HashMap<String, Entry>, req: SetRequest) -> Result<(), StateError> {
        Self::check_etag(entries.get(&req.key), &req.etag, &req.key)?;
        let version = entries.get(&req.key).map(|e| e.version + 1).unwrap_or(1);
        entries.insert(
            req.key,
            Entry {
                value: req.value,
                version,
            },
        );
        Ok(())
    }

    fn apply_delete(
        entries: &mut HashMap<String, Entry>,
        req: DeleteRequest,
    ) -> Result<(), StateError> {
        Self::check_etag(entries.get(&req.key), &req.etag, &req.key)?;
        entries.remove(&req.key);
        Ok(())
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    fn features(&self) -> Vec<StateFeature> {
        if self.transactional {
            vec![StateFeature::Etag, StateFeature::Transactional]
        } else {
            vec![StateFeature::Etag]
        }
    }

    async fn get(&self, req: GetRequest) -> Result<Option<GetResponse>, StateError> {
        Ok(self.entries.lock().unwrap().get(&req.key).map(|entry| {
            GetResponse {
                data: entry.value.clone(),
                etag: Some(entry.version.to_string()),
                metadata: HashMap::new(),
            }
        }))
    }

    async fn set(&self, req: SetRequest) -> Result<(), StateError> {
        let mut entries = self.entries.lock().unwrap();
        Self::apply_set(&mut entries, req)
    }

    async fn delete(&self, req: DeleteRequest) -> Result<(), StateError> {
        let mut entries = self.entries.lock().unwrap();
        Self::apply_delete(&mut entries, req)
    }
}

#[async_trait]
impl TransactionalStateStore for InMemoryStateStore {
    async fn multi(&self, operations: Vec<TransactionalOperation>) -> Result<(), StateError> {
        let mut entries = self.entries.lock().unwrap();
        // Stage on a copy so a failing step leaves the store untouched.
        let mut staged = entries.clone();
        for op in operations {
            match op {
                TransactionalOperation::Set(req) => Self::apply_set(&mut staged, req)?,
                TransactionalOperation::Delete(req) => Self::apply_delete(&mut staged, req)?,
            }
        }
        *entries = staged;
        Ok(())
    }
}
