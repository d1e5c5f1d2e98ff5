//! CloudEvents envelope machinery for publish.
//!
//! Payloads that are not already CloudEvents are wrapped in a fresh
//! envelope; payloads that are pass through with only `topic` and
//! `pubsubname` filled in. Feature-directed post-processing then adjusts
//! the envelope for what the broker cannot do natively.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use plinth_core::pubsub::PubSubFeature;

/// Media type prefix identifying an already-enveloped payload.
pub const CLOUD_EVENTS_MEDIA_TYPE: &str = "application/cloudevents";

/// CloudEvents spec version stamped on fresh envelopes.
pub const SPEC_VERSION: &str = "1.0";

/// Default `source` attribute for runtime-generated envelopes.
pub const DEFAULT_SOURCE: &str = "plinth";

/// Default `type` attribute for runtime-generated envelopes.
pub const DEFAULT_TYPE: &str = "io.plinth.event.sent";

/// Publish metadata key carrying a per-message TTL in seconds.
const METADATA_TTL_KEY: &str = "ttlInSeconds";

/// Whether the content type declares the payload to be a CloudEvent.
pub fn is_cloud_events_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with(CLOUD_EVENTS_MEDIA_TYPE)
}

/// Build a fresh envelope around an arbitrary payload.
///
/// JSON payloads are embedded structurally under `data`; valid UTF-8 goes
/// in as a string; anything else lands base64-free as a byte array under
/// `data`, matching how the rest of the envelope is JSON-encoded.
pub fn new_envelope(
    topic: &str,
    pubsub_name: &str,
    content_type: &str,
    data: &[u8],
) -> Map<String, Value> {
    let mut envelope = Map::new();
    envelope.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    envelope.insert("source".into(), Value::String(DEFAULT_SOURCE.into()));
    envelope.insert("type".into(), Value::String(DEFAULT_TYPE.into()));
    envelope.insert("specversion".into(), Value::String(SPEC_VERSION.into()));
    envelope.insert("topic".into(), Value::String(topic.into()));
    envelope.insert("pubsubname".into(), Value::String(pubsub_name.into()));
    envelope.insert(
        "datacontenttype".into(),
        Value::String(content_type.into()),
    );
    envelope.insert("data".into(), encode_data(content_type, data));
    envelope
}

/// Reuse an existing CloudEvent as the envelope.
///
/// All attributes pass through unchanged; `topic` and `pubsubname` are
/// filled in, and missing `id`/`specversion` are defaulted so the envelope
/// on the wire is always complete.
pub fn from_cloud_event(
    data: &[u8],
    topic: &str,
    pubsub_name: &str,
) -> Result<Map<String, Value>, serde_json::Error> {
    let mut envelope: Map<String, Value> = serde_json::from_slice(data)?;
    envelope.insert("topic".into(), Value::String(topic.into()));
    envelope.insert("pubsubname".into(), Value::String(pubsub_name.into()));
    envelope
        .entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    envelope
        .entry("specversion")
        .or_insert_with(|| Value::String(SPEC_VERSION.into()));
    Ok(envelope)
}

/// Apply component features to the envelope.
///
/// A TTL requested through metadata is stamped into the envelope as an
/// absolute `expiration` timestamp when the broker does not honour TTLs
/// itself.
pub fn apply_features(
    envelope: &mut Map<String, Value>,
    features: &[PubSubFeature],
    metadata: &HashMap<String, String>,
) {
    if features.contains(&PubSubFeature::MessageTtl) {
        return;
    }
    if let Some(ttl) = metadata
        .get(METADATA_TTL_KEY)
        .and_then(|v| v.parse::<i64>().ok())
    {
        let expiration = Utc::now() + Duration::seconds(ttl);
        envelope.insert("expiration".into(), Value::String(expiration.to_rfc3339()));
    }
}

fn encode_data(content_type: &str, data: &[u8]) -> Value {
    if content_type.contains("json") {
        if let Ok(value) = serde_json::from_slice::<Value>(data) {
            return value;
        }
    }
    match std::str::from_utf8(data) {
        Ok(text) => Value::String(text.to_string()),
        Err(_) => Value::Array(data.iter().map(|b| Value::from(*b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_envelope_has_every_required_attribute() {
        let envelope = new_envelope("orders", "nats", "text/plain", b"hello");
        for attr in ["id", "source", "type", "specversion", "topic", "pubsubname"] {
            let value = envelope.get(attr).and_then(Value::as_str).unwrap();
            assert!(!value.is_empty(), "{attr} is empty");
        }
        assert_eq!(envelope["topic"], "orders");
        assert_eq!(envelope["pubsubname"], "nats");
        assert_eq!(envelope["specversion"], SPEC_VERSION);
        assert_eq!(envelope["data"], "hello");
    }

    #[test]
    fn fresh_envelope_ids_are_unique() {
        let a = new_envelope("t", "p", "text/plain", b"x");
        let b = new_envelope("t", "p", "text/plain", b"x");
        assert_ne!(a["id"], b["id"]);
    }

    #[test]
    fn json_payloads_embed_structurally() {
        let envelope = new_envelope("t", "p", "application/json", br#"{"n":1}"#);
        assert_eq!(envelope["data"]["n"], 1);
    }

    #[test]
    fn existing_cloud_event_passes_through() {
        let payload = br#"{"id":"42","specversion":"1.0","source":"app","data":"x"}"#;
        let envelope = from_cloud_event(payload, "orders", "nats").unwrap();
        assert_eq!(envelope["id"], "42");
        assert_eq!(envelope["source"], "app");
        assert_eq!(envelope["topic"], "orders");
        assert_eq!(envelope["pubsubname"], "nats");
    }

    #[test]
    fn passthrough_fills_missing_id_and_specversion() {
        let envelope = from_cloud_event(br#"{"source":"app"}"#, "t", "p").unwrap();
        assert!(!envelope["id"].as_str().unwrap().is_empty());
        assert_eq!(envelope["specversion"], SPEC_VERSION);
    }

    #[test]
    fn malformed_cloud_event_is_a_parse_error() {
        assert!(from_cloud_event(b"not json", "t", "p").is_err());
    }

    #[test]
    fn ttl_is_stamped_when_the_broker_lacks_the_feature() {
        let mut envelope = new_envelope("t", "p", "text/plain", b"x");
        let metadata = HashMap::from([(METADATA_TTL_KEY.to_string(), "60".to_string())]);
        apply_features(&mut envelope, &[], &metadata);
        assert!(envelope.contains_key("expiration"));
    }

    #[test]
    fn ttl_is_left_to_brokers_that_support_it() {
        let mut envelope = new_envelope("t", "p", "text/plain", b"x");
        let metadata = HashMap::from([(METADATA_TTL_KEY.to_string(), "60".to_string())]);
        apply_features(&mut envelope, &[PubSubFeature::MessageTtl], &metadata);
        assert!(!envelope.contains_key("expiration"));
    }

    #[test]
    fn cloud_events_content_type_detection() {
        assert!(is_cloud_events_content_type("application/cloudevents+json"));
        assert!(is_cloud_events_content_type(
            "Application/CloudEvents+json; charset=utf-8"
        ));
        assert!(!is_cloud_events_content_type("application/json"));
    }
}
