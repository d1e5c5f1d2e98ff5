//! Distributed lock operations.
//!
//! Validation runs before the store lookup so malformed requests carry
//! their own stable messages, and resource ids are namespaced per
//! (store, application) before delegation.

use tracing::error;

use plinth_core::lock::{self, TryLockStatus, UnlockStatus};

use crate::error::ApiError;
use crate::keys;

use super::types::{
    TryLockRequest, TryLockResponse, TryLockStatusDto, UnlockRequest, UnlockResponse,
    UnlockStatusDto,
};
use super::RuntimeApi;

impl RuntimeApi {
    pub async fn try_lock(&self, req: TryLockRequest) -> Result<TryLockResponse, ApiError> {
        self.lock_stores.ensure_configured()?;
        if req.resource_id.is_empty() {
            return Err(ApiError::EmptyField {
                field: "resource id",
                store: req.store_name,
            });
        }
        if req.lock_owner.is_empty() {
            return Err(ApiError::EmptyField {
                field: "lock owner",
                store: req.store_name,
            });
        }
        if req.expire <= 0 {
            return Err(ApiError::InvalidExpire {
                store: req.store_name,
            });
        }
        let store = self.lock_stores.lookup(&req.store_name)?;
        let resource_id =
            keys::lock_resource_key(&req.store_name, &self.app_id, &req.resource_id)?;
        let resp = store
            .try_lock(lock::TryLockRequest {
                resource_id,
                lock_owner: req.lock_owner,
                expire: req.expire,
            })
            .await
            .map_err(|err| {
                error!(error = %err, store = %req.store_name, "try lock failed");
                ApiError::component("try lock", err)
            })?;
        Ok(TryLockResponse {
            success: resp.success,
            status: match resp.status {
                TryLockStatus::LockAcquired => TryLockStatusDto::LockAcquired,
                TryLockStatus::LockBelongToOthers => TryLockStatusDto::LockBelongToOthers,
                TryLockStatus::InternalError => TryLockStatusDto::InternalError,
            },
        })
    }

    pub async fn unlock(&self, req: UnlockRequest) -> Result<UnlockResponse, ApiError> {
        self.lock_stores.ensure_configured()?;
        if req.resource_id.is_empty() {
            return Err(ApiError::EmptyField {
                field: "resource id",
                store: req.store_name,
            });
        }
        if req.lock_owner.is_empty() {
            return Err(ApiError::EmptyField {
                field: "lock owner",
                store: req.store_name,
            });
        }
        let store = self.lock_stores.lookup(&req.store_name)?;
        let resource_id =
            keys::lock_resource_key(&req.store_name, &self.app_id, &req.resource_id)?;
        let resp = store
            .unlock(lock::UnlockRequest {
                resource_id,
                lock_owner: req.lock_owner,
            })
            .await
            .map_err(|err| {
                error!(error = %err, store = %req.store_name, "unlock failed");
                ApiError::component("unlock", err)
            })?;
        Ok(UnlockResponse {
            status: match resp.status {
                UnlockStatus::Success => UnlockStatusDto::Success,
                UnlockStatus::LockUnexist => UnlockStatusDto::LockUnexist,
                UnlockStatus::LockBelongToOthers => UnlockStatusDto::LockBelongToOthers,
                UnlockStatus::InternalError => UnlockStatusDto::InternalError,
            },
        })
    }
}
