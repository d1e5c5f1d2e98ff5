//! Publish/subscribe interface.
//!
//! Components receive fully-enveloped payloads; the runtime owns the
//! CloudEvents wrapping and consults [`PubSub::features`] to decide how the
//! envelope is post-processed before publishing.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Capabilities a pub/sub component may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PubSubFeature {
    /// The broker honours per-message TTL natively; when absent the runtime
    /// stamps the expiration into the envelope instead.
    MessageTtl,
    /// Topic subscriptions may carry wildcards.
    SubscribeWildcards,
}

#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub pubsub_name: String,
    pub topic: String,
    /// Serialized CloudEvents envelope.
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

/// Errors reported by pub/sub components.
#[derive(Debug, Error)]
pub enum PubSubError {
    #[error("publish failed: {0}")]
    PublishFailed(String),
    #[error("pub/sub error: {0}")]
    Internal(String),
}

/// A pluggable message-broker backend.
#[async_trait]
pub trait PubSub: Send + Sync {
    fn features(&self) -> Vec<PubSubFeature>;

    async fn publish(&self, req: PublishRequest) -> Result<(), PubSubError>;
}
