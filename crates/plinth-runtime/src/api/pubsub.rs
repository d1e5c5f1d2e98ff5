//! Event publishing.
//!
//! Payloads are wrapped in a CloudEvents envelope (or reused if they
//! already are one), feature-adjusted for the target broker, serialized
//! compactly, and handed to the component. The lookup deliberately skips
//! the registry precondition check: an unknown or unconfigured pub/sub
//! name is always `INVALID_ARGUMENT` naming the store.

use tracing::error;

use plinth_core::pubsub::PublishRequest;

use crate::envelope;
use crate::error::ApiError;

use super::types::PublishEventRequest;
use super::RuntimeApi;

impl RuntimeApi {
    pub async fn publish_event(&self, req: PublishEventRequest) -> Result<(), ApiError> {
        let result = self.do_publish_event(req).await;
        if let Err(err) = &result {
            error!(error = %err, "publish event failed");
        }
        result
    }

    async fn do_publish_event(&self, req: PublishEventRequest) -> Result<(), ApiError> {
        if req.pubsub_name.is_empty() {
            return Err(ApiError::EmptyField {
                field: "pubsub name",
                store: req.pubsub_name,
            });
        }
        if req.topic.is_empty() {
            return Err(ApiError::EmptyField {
                field: "topic",
                store: req.pubsub_name,
            });
        }
        let component = self.pubsubs.lookup(&req.pubsub_name)?;

        // An absent payload publishes as a valid zero-length CloudEvent.
        let mut envelope = if envelope::is_cloud_events_content_type(&req.data_content_type) {
            envelope::from_cloud_event(&req.data, &req.topic, &req.pubsub_name).map_err(|err| {
                ApiError::Serialization {
                    reason: format!("cloud event decode: {err}"),
                }
            })?
        } else {
            envelope::new_envelope(
                &req.topic,
                &req.pubsub_name,
                &req.data_content_type,
                &req.data,
            )
        };

        let features = component.features();
        envelope::apply_features(&mut envelope, &features, &req.metadata);

        let data = serde_json::to_vec(&envelope).map_err(|err| ApiError::Serialization {
            reason: format!("cloud event encode: {err}"),
        })?;

        component
            .publish(PublishRequest {
                pubsub_name: req.pubsub_name,
                topic: req.topic,
                data,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::component("publish event", err))
    }
}
