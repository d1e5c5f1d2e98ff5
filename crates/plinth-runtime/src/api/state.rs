//! State operations.
//!
//! Keys are namespaced with the application id both ways, so components
//! see `appId||key` and callers see their own keys back. Etag conflicts
//! keep their kind through the taxonomy: mismatches abort, malformed etags
//! are invalid arguments, everything else is internal.

use plinth_core::state::{self, TransactionalOperation};

use crate::error::ApiError;
use crate::keys;

use super::types::{
    BulkStateItem, DeleteBulkStateRequest, DeleteStateRequest, ExecuteStateTransactionRequest,
    GetBulkStateRequest, GetBulkStateResponse, GetStateRequest, GetStateResponse,
    SaveStateRequest, StateItem,
};
use super::RuntimeApi;

/// Transaction step kind for writes.
const OPERATION_UPSERT: &str = "upsert";
/// Transaction step kind for deletes.
const OPERATION_DELETE: &str = "delete";

impl RuntimeApi {
    pub async fn get_state(&self, req: GetStateRequest) -> Result<GetStateResponse, ApiError> {
        let store = self.state_stores.get(&req.store_name)?;
        if req.key.is_empty() {
            return Err(ApiError::EmptyField {
                field: "key",
                store: req.store_name,
            });
        }
        let resp = store
            .get(state::GetRequest {
                key: keys::state_key(&self.app_id, &req.key)?,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::from_state("get state", err))?;
        // A missing key is an empty response, not an error.
        Ok(match resp {
            Some(resp) => GetStateResponse {
                data: resp.data,
                etag: resp.etag.unwrap_or_default(),
                metadata: resp.metadata,
            },
            None => GetStateResponse::default(),
        })
    }

    pub async fn get_bulk_state(
        &self,
        req: GetBulkStateRequest,
    ) -> Result<GetBulkStateResponse, ApiError> {
        let store = self.state_stores.get(&req.store_name)?;
        let mut requests = Vec::with_capacity(req.keys.len());
        for key in &req.keys {
            requests.push(state::GetRequest {
                key: keys::state_key(&self.app_id, key)?,
                metadata: req.metadata.clone(),
            });
        }
        let items = store
            .bulk_get(requests)
            .await
            .map_err(|err| ApiError::from_state("get bulk state", err))?;
        Ok(GetBulkStateResponse {
            items: items
                .into_iter()
                .map(|item| BulkStateItem {
                    key: keys::original_state_key(&item.key),
                    data: item.data,
                    etag: item.etag.unwrap_or_default(),
                    error: item.error.unwrap_or_default(),
                    metadata: item.metadata,
                })
                .collect(),
        })
    }

    pub async fn save_state(&self, req: SaveStateRequest) -> Result<(), ApiError> {
        let store = self.state_stores.get(&req.store_name)?;
        let mut requests = Vec::with_capacity(req.states.len());
        for item in req.states {
            requests.push(self.set_request(&req.store_name, item)?);
        }
        store
            .bulk_set(requests)
            .await
            .map_err(|err| ApiError::from_state("save state", err))
    }

    pub async fn delete_state(&self, req: DeleteStateRequest) -> Result<(), ApiError> {
        let store = self.state_stores.get(&req.store_name)?;
        if req.key.is_empty() {
            return Err(ApiError::EmptyField {
                field: "key",
                store: req.store_name,
            });
        }
        store
            .delete(state::DeleteRequest {
                key: keys::state_key(&self.app_id, &req.key)?,
                etag: req.etag,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::from_state("delete state", err))
    }

    pub async fn delete_bulk_state(&self, req: DeleteBulkStateRequest) -> Result<(), ApiError> {
        let store = self.state_stores.get(&req.store_name)?;
        let mut requests = Vec::with_capacity(req.states.len());
        for item in req.states {
            if item.key.is_empty() {
                return Err(ApiError::EmptyField {
                    field: "key",
                    store: req.store_name,
                });
            }
            requests.push(state::DeleteRequest {
                key: keys::state_key(&self.app_id, &item.key)?,
                etag: item.etag,
                metadata: item.metadata,
            });
        }
        store
            .bulk_delete(requests)
            .await
            .map_err(|err| ApiError::from_state("delete bulk state", err))
    }

    pub async fn execute_state_transaction(
        &self,
        req: ExecuteStateTransactionRequest,
    ) -> Result<(), ApiError> {
        let store = self.transactional_state_stores.get(&req.store_name)?;
        let mut operations = Vec::with_capacity(req.operations.len());
        for op in req.operations {
            match op.operation_type.as_str() {
                OPERATION_UPSERT => {
                    operations.push(TransactionalOperation::Set(
                        self.set_request(&req.store_name, op.request)?,
                    ));
                }
                OPERATION_DELETE => {
                    if op.request.key.is_empty() {
                        return Err(ApiError::EmptyField {
                            field: "key",
                            store: req.store_name,
                        });
                    }
                    operations.push(TransactionalOperation::Delete(state::DeleteRequest {
                        key: keys::state_key(&self.app_id, &op.request.key)?,
                        etag: op.request.etag,
                        metadata: op.request.metadata,
                    }));
                }
                other => {
                    return Err(ApiError::UnsupportedOperationType {
                        operation_type: other.to_string(),
                    })
                }
            }
        }
        store
            .multi(operations)
            .await
            .map_err(|err| ApiError::from_state("execute state transaction", err))
    }

    fn set_request(&self, store_name: &str, item: StateItem) -> Result<state::SetRequest, ApiError> {
        if item.key.is_empty() {
            return Err(ApiError::EmptyField {
                field: "key",
                store: store_name.to_string(),
            });
        }
        Ok(state::SetRequest {
            key: keys::state_key(&self.app_id, &item.key)?,
            value: item.value,
            etag: item.etag,
            metadata: item.metadata,
        })
    }
}
