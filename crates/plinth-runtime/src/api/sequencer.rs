//! Monotonic id generation.
//!
//! STRONG requests always reach the backend. WEAK requests are served from
//! the per-key range cache and fall back to per-call delegation when the
//! component cannot allocate batches.

use std::sync::Arc;

use tracing::error;

use plinth_core::sequencer::{self, AutoIncrement, Sequencer};

use crate::error::ApiError;
use crate::keys;

use super::types::{AutoIncrementDto, GetNextIdRequest, GetNextIdResponse};
use super::RuntimeApi;

impl RuntimeApi {
    pub async fn get_next_id(&self, req: GetNextIdRequest) -> Result<GetNextIdResponse, ApiError> {
        self.sequencers.ensure_configured()?;
        if req.key.is_empty() {
            return Err(ApiError::EmptyField {
                field: "key",
                store: req.store_name,
            });
        }
        let store = self.sequencers.lookup(&req.store_name)?;
        let component_req = sequencer::GetNextIdRequest {
            key: keys::sequencer_key(&req.store_name, &self.app_id, &req.key)?,
            increment: match req.options.map(|o| o.increment).unwrap_or_default() {
                AutoIncrementDto::Weak => AutoIncrement::Weak,
                AutoIncrementDto::Strong => AutoIncrement::Strong,
            },
            metadata: req.metadata,
        };
        let next_id = match component_req.increment {
            AutoIncrement::Weak => self.next_id_with_weak_increment(&store, &component_req).await,
            AutoIncrement::Strong => self.next_id_from_component(&store, component_req).await,
        }
        .map_err(|err| {
            error!(error = %err, store = %req.store_name, "get next id failed");
            err
        })?;
        Ok(GetNextIdResponse { next_id })
    }

    /// Serve from the range cache; degrade silently to per-call delegation
    /// when the component does not support batch allocation.
    async fn next_id_with_weak_increment(
        &self,
        store: &Arc<dyn Sequencer>,
        req: &sequencer::GetNextIdRequest,
    ) -> Result<i64, ApiError> {
        match self
            .sequencer_cache
            .next_id(store, req)
            .await
            .map_err(|err| ApiError::component("get next id", err))?
        {
            Some(id) => Ok(id),
            None => self.next_id_from_component(store, req.clone()).await,
        }
    }

    async fn next_id_from_component(
        &self,
        store: &Arc<dyn Sequencer>,
        req: sequencer::GetNextIdRequest,
    ) -> Result<i64, ApiError> {
        let resp = store
            .get_next_id(req)
            .await
            .map_err(|err| ApiError::component("get next id", err))?;
        Ok(resp.next_id)
    }
}
