//! Recording delegated-runtime stub.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use plinth_core::delegated::{
    DelegatedError, DelegatedRuntime, GetBulkSecretRequest, GetBulkSecretResponse,
    GetSecretRequest, GetSecretResponse, InvokeBindingRequest, InvokeBindingResponse,
    InvokeServiceRequest, InvokeServiceResponse,
};

/// Delegated runtime answering from canned secrets and echoing invocations.
pub struct MockDelegatedRuntime {
    secrets: HashMap<String, String>,
    invocations: Mutex<Vec<InvokeServiceRequest>>,
    bindings: Mutex<Vec<InvokeBindingRequest>>,
}

impl MockDelegatedRuntime {
    pub fn new() -> Self {
        Self {
            secrets: HashMap::new(),
            invocations: Mutex::new(Vec::new()),
            bindings: Mutex::new(Vec::new()),
        }
    }

    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }

    pub fn invocations(&self) -> Vec<InvokeServiceRequest> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn bindings(&self) -> Vec<InvokeBindingRequest> {
        self.bindings.lock().unwrap().clone()
    }
}

impl Default for MockDelegatedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DelegatedRuntime for MockDelegatedRuntime {
    async fn invoke_service(
        &self,
        req: InvokeServiceRequest,
    ) -> Result<InvokeServiceResponse, DelegatedError> {
        let resp = InvokeServiceResponse {
            data: req.data.clone(),
            content_type: req.content_type.clone(),
        };
        self.invocations.lock().unwrap().push(req);
        Ok(resp)
    }

    async fn invoke_binding(
        &self,
        req: InvokeBindingRequest,
    ) -> Result<InvokeBindingResponse, DelegatedError> {
        let resp = InvokeBindingResponse {
            data: req.data.clone(),
            metadata: req.metadata.clone(),
        };
        self.bindings.lock().unwrap().push(req);
        Ok(resp)
    }

    async fn get_secret(&self, req: GetSecretRequest) -> Result<GetSecretResponse, DelegatedError> {
        match self.secrets.get(&req.key) {
            Some(value) => Ok(GetSecretResponse {
                data: HashMap::from([(req.key, value.clone())]),
            }),
            None => Err(DelegatedError::NotFound(req.key)),
        }
    }

    async fn get_bulk_secret(
        &self,
        _req: GetBulkSecretRequest,
    ) -> Result<GetBulkSecretResponse, DelegatedError> {
        let data = self
            .secrets
            .iter()
            .map(|(key, value)| {
                (
                    key.clone(),
                    HashMap::from([(key.clone(), value.clone())]),
                )
            })
            .collect();
        Ok(GetBulkSecretResponse { data })
    }
}
