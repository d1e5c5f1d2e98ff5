//! Unary operation handlers.
//!
//! Each handler is a thin shim: decode the wire request, call the runtime
//! core, encode the result. Operations whose success carries no payload
//! answer `204 No Content`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use plinth_runtime::types::{
    DelFileRequest, DeleteBulkStateRequest, DeleteConfigurationRequest, DeleteStateRequest,
    ExecuteStateTransactionRequest, GetBulkSecretRequest, GetBulkSecretResponse,
    GetBulkStateRequest, GetBulkStateResponse, GetConfigurationRequest, GetConfigurationResponse,
    GetFileMetaRequest, GetFileMetaResponse, GetNextIdRequest, GetNextIdResponse,
    GetSecretRequest, GetSecretResponse, GetStateRequest, GetStateResponse,
    InvokeBindingRequest, InvokeBindingResponse, InvokeServiceRequest, InvokeServiceResponse,
    ListFileRequest, ListFileResponse, PublishEventRequest, SaveConfigurationRequest,
    SaveStateRequest, SayHelloRequest, SayHelloResponse, TryLockRequest, TryLockResponse,
    UnlockRequest, UnlockResponse,
};
use plinth_runtime::RuntimeApi;

use crate::error::HttpError;

pub async fn say_hello(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<SayHelloRequest>,
) -> Result<Json<SayHelloResponse>, HttpError> {
    Ok(Json(api.say_hello(req).await?))
}

pub async fn invoke_service(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<InvokeServiceRequest>,
) -> Result<Json<InvokeServiceResponse>, HttpError> {
    Ok(Json(api.invoke_service(req).await?))
}

// --------------------------------------------------------- configuration

pub async fn get_configuration(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetConfigurationRequest>,
) -> Result<Json<GetConfigurationResponse>, HttpError> {
    Ok(Json(api.get_configuration(req).await?))
}

pub async fn save_configuration(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<SaveConfigurationRequest>,
) -> Result<StatusCode, HttpError> {
    api.save_configuration(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_configuration(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<DeleteConfigurationRequest>,
) -> Result<StatusCode, HttpError> {
    api.delete_configuration(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------- pubsub

pub async fn publish_event(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<PublishEventRequest>,
) -> Result<StatusCode, HttpError> {
    api.publish_event(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------- state

pub async fn get_state(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetStateRequest>,
) -> Result<Json<GetStateResponse>, HttpError> {
    Ok(Json(api.get_state(req).await?))
}

pub async fn get_bulk_state(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetBulkStateRequest>,
) -> Result<Json<GetBulkStateResponse>, HttpError> {
    Ok(Json(api.get_bulk_state(req).await?))
}

pub async fn save_state(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<SaveStateRequest>,
) -> Result<StatusCode, HttpError> {
    api.save_state(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_state(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<DeleteStateRequest>,
) -> Result<StatusCode, HttpError> {
    api.delete_state(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_bulk_state(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<DeleteBulkStateRequest>,
) -> Result<StatusCode, HttpError> {
    api.delete_bulk_state(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn execute_state_transaction(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<ExecuteStateTransactionRequest>,
) -> Result<StatusCode, HttpError> {
    api.execute_state_transaction(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ------------------------------------------------------------------ file

pub async fn list_file(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<ListFileRequest>,
) -> Result<Json<ListFileResponse>, HttpError> {
    Ok(Json(api.list_file(req).await?))
}

pub async fn del_file(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<DelFileRequest>,
) -> Result<StatusCode, HttpError> {
    api.del_file(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_file_meta(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetFileMetaRequest>,
) -> Result<Json<GetFileMetaResponse>, HttpError> {
    Ok(Json(api.get_file_meta(req).await?))
}

// ------------------------------------------------------------------ lock

pub async fn try_lock(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<TryLockRequest>,
) -> Result<Json<TryLockResponse>, HttpError> {
    Ok(Json(api.try_lock(req).await?))
}

pub async fn unlock(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, HttpError> {
    Ok(Json(api.unlock(req).await?))
}

// ------------------------------------------------------------- sequencer

pub async fn get_next_id(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetNextIdRequest>,
) -> Result<Json<GetNextIdResponse>, HttpError> {
    Ok(Json(api.get_next_id(req).await?))
}

// ------------------------------------------------------------- delegated

pub async fn invoke_binding(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<InvokeBindingRequest>,
) -> Result<Json<InvokeBindingResponse>, HttpError> {
    Ok(Json(api.invoke_binding(req).await?))
}

pub async fn get_secret(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetSecretRequest>,
) -> Result<Json<GetSecretResponse>, HttpError> {
    Ok(Json(api.get_secret(req).await?))
}

pub async fn get_bulk_secret(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetBulkSecretRequest>,
) -> Result<Json<GetBulkSecretResponse>, HttpError> {
    Ok(Json(api.get_bulk_secret(req).await?))
}
