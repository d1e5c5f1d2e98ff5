//! In-memory lock store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use plinth_core::lock::{
    LockError, LockStore, TryLockRequest, TryLockResponse, TryLockStatus, UnlockRequest,
    UnlockResponse, UnlockStatus,
};

/// Lock backend mapping resource ids to their owners.
///
/// Leases never expire on their own; tests control the lifecycle. The
/// resource ids it sees are the runtime-namespaced ones, exposed through
/// [`InMemoryLockStore::held_resources`] for namespacing assertions.
pub struct InMemoryLockStore {
    owners: Mutex<HashMap<String, String>>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self {
            owners: Mutex::new(HashMap::new()),
        }
    }

    pub fn held_resources(&self) -> Vec<String> {
        self.owners.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for InMemoryLockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn try_lock(&self, req: TryLockRequest) -> Result<TryLockResponse, LockError> {
        let mut owners = self.owners.lock().unwrap();
        match owners.get(&req.resource_id) {
            Some(owner) if *owner == req.lock_owner => Ok(TryLockResponse {
                success: true,
                status: TryLockStatus::LockAcquired,
            }),
            Some(_) => Ok(TryLockResponse {
                success: false,
                status: TryLockStatus::LockBelongToOthers,
            }),
            None => {
                owners.insert(req.resource_id, req.lock_owner);
                Ok(TryLockResponse {
                    success: true,
                    status: TryLockStatus::LockAcquired,
                })
            }
        }
    }

    async fn unlock(&self, req: UnlockRequest) -> Result<UnlockResponse, LockError> {
        let mut owners = self.owners.lock().unwrap();
        let status = match owners.get(&req.resource_id) {
            None => UnlockStatus::LockUnexist,
            Some(owner) if *owner != req.lock_owner => UnlockStatus::LockBelongToOthers,
            Some(_) => {
                owners.remove(&req.resource_id);
                UnlockStatus::Success
            }
        };
        Ok(UnlockResponse { status })
    }
}
