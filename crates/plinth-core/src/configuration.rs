//! Configuration store interface.
//!
//! A configuration store holds items addressed by (group, label, key) per
//! application. Besides plain CRUD it supports long-lived subscriptions:
//! the runtime hands the component a shared channel sender and receives a
//! per-subscription handle it can use to stop exactly that subscription.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// A single configuration entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationItem {
    pub key: String,
    pub content: String,
    pub group: String,
    pub label: String,
    pub tags: HashMap<String, String>,
    pub metadata: HashMap<String, String>,
}

/// Read request against one (group, label) slice of the store.
#[derive(Debug, Clone, Default)]
pub struct GetRequest {
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// Write request carrying fully-normalized items.
#[derive(Debug, Clone, Default)]
pub struct SetRequest {
    pub app_id: String,
    pub store_name: String,
    pub items: Vec<ConfigurationItem>,
}

/// Delete request; same addressing as [`GetRequest`].
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// Subscription request; same addressing as [`GetRequest`].
#[derive(Debug, Clone, Default)]
pub struct SubscribeRequest {
    pub app_id: String,
    pub group: String,
    pub label: String,
    pub keys: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// One batch of changed items pushed by a component.
#[derive(Debug, Clone)]
pub struct ConfigurationChange {
    pub store_name: String,
    pub items: Vec<ConfigurationItem>,
}

/// Opaque handle identifying one subscription within one component.
///
/// Handles are scoped to the component that issued them; the runtime uses
/// them to tear down only the subscriptions a session actually opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Errors reported by configuration components.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),
    #[error("configuration store error: {0}")]
    Internal(String),
}

/// A pluggable configuration backend.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Fetch items; an empty `keys` list means the whole (group, label) slice.
    async fn get(&self, req: GetRequest) -> Result<Vec<ConfigurationItem>, ConfigurationError>;

    async fn set(&self, req: SetRequest) -> Result<(), ConfigurationError>;

    async fn delete(&self, req: DeleteRequest) -> Result<(), ConfigurationError>;

    /// Start pushing changes matching `req` into `changes`.
    ///
    /// The sender is shared by every subscription of one session; the
    /// component must tag each [`ConfigurationChange`] with its store name.
    async fn subscribe(
        &self,
        req: SubscribeRequest,
        changes: mpsc::Sender<ConfigurationChange>,
    ) -> Result<SubscriptionId, ConfigurationError>;

    /// Stop one subscription previously returned by [`Self::subscribe`].
    ///
    /// Stopping an unknown or already-stopped handle is a no-op.
    async fn stop_subscribe(&self, id: SubscriptionId);

    /// Group used when a request leaves the field blank.
    fn default_group(&self) -> &str;

    /// Label used when a request leaves the field blank.
    fn default_label(&self) -> &str;
}
