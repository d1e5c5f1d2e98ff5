//! Delegated operations: service invocation, bindings, secrets.
//!
//! These forward verbatim to the injected [`DelegatedRuntime`] and convert
//! requests and responses field by field. The core adds nothing beyond the
//! error-kind translation.

use plinth_core::delegated::{self, DelegatedError};

use crate::error::ApiError;

use super::types::{
    GetBulkSecretRequest, GetBulkSecretResponse, GetSecretRequest, GetSecretResponse,
    InvokeBindingRequest, InvokeBindingResponse, InvokeServiceRequest, InvokeServiceResponse,
};
use super::RuntimeApi;

fn wrap(operation: &'static str, err: DelegatedError) -> ApiError {
    match err {
        DelegatedError::NotFound(reason) => ApiError::NotFound { operation, reason },
        DelegatedError::InvalidRequest(reason) => ApiError::InvalidArgument { reason },
        DelegatedError::Internal(reason) => ApiError::Component { operation, reason },
    }
}

impl RuntimeApi {
    pub async fn invoke_service(
        &self,
        req: InvokeServiceRequest,
    ) -> Result<InvokeServiceResponse, ApiError> {
        let resp = self
            .delegated()?
            .invoke_service(delegated::InvokeServiceRequest {
                id: req.id,
                method: req.method,
                data: req.data,
                content_type: req.content_type,
            })
            .await
            .map_err(|err| wrap("invoke service", err))?;
        Ok(InvokeServiceResponse {
            data: resp.data,
            content_type: resp.content_type,
        })
    }

    pub async fn invoke_binding(
        &self,
        req: InvokeBindingRequest,
    ) -> Result<InvokeBindingResponse, ApiError> {
        let resp = self
            .delegated()?
            .invoke_binding(delegated::InvokeBindingRequest {
                name: req.name,
                operation: req.operation,
                data: req.data,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| wrap("invoke binding", err))?;
        Ok(InvokeBindingResponse {
            data: resp.data,
            metadata: resp.metadata,
        })
    }

    pub async fn get_secret(&self, req: GetSecretRequest) -> Result<GetSecretResponse, ApiError> {
        let resp = self
            .delegated()?
            .get_secret(delegated::GetSecretRequest {
                store_name: req.store_name,
                key: req.key,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| wrap("get secret", err))?;
        Ok(GetSecretResponse { data: resp.data })
    }

    pub async fn get_bulk_secret(
        &self,
        req: GetBulkSecretRequest,
    ) -> Result<GetBulkSecretResponse, ApiError> {
        let resp = self
            .delegated()?
            .get_bulk_secret(delegated::GetBulkSecretRequest {
                store_name: req.store_name,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| wrap("get bulk secret", err))?;
        Ok(GetBulkSecretResponse { data: resp.data })
    }
}
