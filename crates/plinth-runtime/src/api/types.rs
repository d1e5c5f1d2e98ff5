//! Wire-level request and response types.
//!
//! These are the shapes the transport layer carries; the dispatch core
//! converts them to and from component types field by field. Requests
//! deserialize leniently (absent fields default) so partial messages fail
//! in validation with a stable error rather than at decode time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use plinth_core::configuration::ConfigurationItem;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SayHelloRequest {
    pub service_name: String,
    pub name: String,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SayHelloResponse {
    pub hello: String,
    pub data: Option<String>,
}

// ---------------------------------------------------------------- config

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigurationItemDto {
    pub key: String,
    pub content: String,
    pub group: String,
    pub label: String,
    pub tags: HashMap<String, String>,
    pub metadata: HashMap<String, String>,
}

impl From<ConfigurationItem> for ConfigurationItemDto {
    fn from(item: ConfigurationItem) -> Self {
        Self {
            key: item.key,
            content: item.content,
            group: item.group,
            label: item.label,
            tags: item.tags,
            metadata: item.metadata,
        }
    }
}

impl From<ConfigurationItemDto> for ConfigurationItem {
    fn from(dto: ConfigurationItemDto) -> Self {
        Self {
            key: dto.key,
            content: dto.content,
            group: dto.group,
            label: dto.label,
            tags: dto.tags,
            metadata: dto.metadata,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetConfigurationRequest {
    pub store_name: String,
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetConfigurationResponse {
    pub items: Vec<ConfigurationItemDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveConfigurationRequest {
    pub store_name: String,
    pub app_id: String,
    pub items: Vec<ConfigurationItemDto>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteConfigurationRequest {
    pub store_name: String,
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscribeConfigurationRequest {
    pub store_name: String,
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscribeConfigurationResponse {
    pub store_name: String,
    pub app_id: String,
    pub items: Vec<ConfigurationItemDto>,
}

// ---------------------------------------------------------------- pubsub

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublishEventRequest {
    pub pubsub_name: String,
    pub topic: String,
    pub data: Vec<u8>,
    pub data_content_type: String,
    pub metadata: HashMap<String, String>,
}

// ----------------------------------------------------------------- state

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateItem {
    pub key: String,
    pub value: Vec<u8>,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetStateRequest {
    pub store_name: String,
    pub key: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetStateResponse {
    pub data: Vec<u8>,
    pub etag: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetBulkStateRequest {
    pub store_name: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkStateItem {
    pub key: String,
    pub data: Vec<u8>,
    pub etag: String,
    pub error: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetBulkStateResponse {
    pub items: Vec<BulkStateItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveStateRequest {
    pub store_name: String,
    pub states: Vec<StateItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteStateRequest {
    pub store_name: String,
    pub key: String,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteBulkStateRequest {
    pub store_name: String,
    pub states: Vec<StateItem>,
}

/// One step of a state transaction; `operation_type` is `upsert` or
/// `delete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateTransactionItem {
    pub operation_type: String,
    pub request: StateItem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecuteStateTransactionRequest {
    pub store_name: String,
    pub operations: Vec<StateTransactionItem>,
    pub metadata: HashMap<String, String>,
}

// ------------------------------------------------------------------ file

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRequest {
    pub store_name: String,
    pub name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetFileRequest {
    pub store_name: String,
    pub name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFileRequest {
    pub request: Option<FileRequest>,
    pub page_size: i32,
    pub marker: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileInfoDto {
    pub file_name: String,
    pub size: i64,
    pub last_modified: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFileResponse {
    pub files: Vec<FileInfoDto>,
    pub marker: String,
    pub is_truncated: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelFileRequest {
    pub request: Option<FileRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetFileMetaRequest {
    pub request: Option<FileRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetFileMetaResponse {
    pub size: i64,
    pub last_modified: String,
    pub metadata: HashMap<String, Vec<String>>,
}

// ------------------------------------------------------------------ lock

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TryLockRequest {
    pub store_name: String,
    pub resource_id: String,
    pub lock_owner: String,
    pub expire: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TryLockStatusDto {
    LockAcquired,
    LockBelongToOthers,
    #[default]
    InternalError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TryLockResponse {
    pub success: bool,
    pub status: TryLockStatusDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnlockRequest {
    pub store_name: String,
    pub resource_id: String,
    pub lock_owner: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnlockStatusDto {
    Success,
    LockUnexist,
    LockBelongToOthers,
    #[default]
    InternalError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnlockResponse {
    pub status: UnlockStatusDto,
}

// ------------------------------------------------------------- sequencer

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoIncrementDto {
    #[default]
    Weak,
    Strong,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencerOptionsDto {
    pub increment: AutoIncrementDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetNextIdRequest {
    pub store_name: String,
    pub key: String,
    pub options: Option<SequencerOptionsDto>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetNextIdResponse {
    pub next_id: i64,
}

// ------------------------------------------------------------- delegated

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvokeServiceRequest {
    pub id: String,
    pub method: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvokeServiceResponse {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvokeBindingRequest {
    pub name: String,
    pub operation: String,
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvokeBindingResponse {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetSecretRequest {
    pub store_name: String,
    pub key: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetSecretResponse {
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetBulkSecretRequest {
    pub store_name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetBulkSecretResponse {
    pub data: HashMap<String, HashMap<String, String>>,
}
