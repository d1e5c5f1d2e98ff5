//! Recording pub/sub component.

use std::sync::Mutex;

use async_trait::async_trait;

use plinth_core::pubsub::{PubSub, PubSubError, PubSubFeature, PublishRequest};

/// Pub/sub backend that records every publish instead of delivering it.
pub struct RecordingPubSub {
    features: Vec<PubSubFeature>,
    published: Mutex<Vec<PublishRequest>>,
}

impl RecordingPubSub {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn with_features(features: Vec<PubSubFeature>) -> Self {
        Self {
            features,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<PublishRequest> {
        self.published.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

impl Default for RecordingPubSub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PubSub for RecordingPubSub {
    fn features(&self) -> Vec<PubSubFeature> {
        self.features.clone()
    }

    async fn publish(&self, req: PublishRequest) -> Result<(), PubSubError> {
        self.published.lock().unwrap().push(req);
        Ok(())
    }
}
