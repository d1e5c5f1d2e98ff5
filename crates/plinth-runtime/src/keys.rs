//! Key namespacing.
//!
//! Before a key reaches a backend it is joined with the store name and the
//! application id, so two applications sharing one backend can never
//! collide. Inputs containing a separator are rejected rather than escaped.

use crate::error::ApiError;

/// Separator for lock and sequencer keys.
pub const KEY_SEPARATOR: &str = "|||";

/// Separator for state keys.
pub const STATE_KEY_SEPARATOR: &str = "||";

fn reject_separator(key: &str, separator: &'static str) -> Result<(), ApiError> {
    if key.contains(separator) {
        return Err(ApiError::ReservedSeparator {
            key: key.to_string(),
            separator,
        });
    }
    Ok(())
}

/// Namespace a lock resource id as `lock|||<store>|||<appId>|||<resourceId>`.
pub fn lock_resource_key(
    store_name: &str,
    app_id: &str,
    resource_id: &str,
) -> Result<String, ApiError> {
    reject_separator(resource_id, KEY_SEPARATOR)?;
    Ok(format!(
        "lock{sep}{store_name}{sep}{app_id}{sep}{resource_id}",
        sep = KEY_SEPARATOR
    ))
}

/// Namespace a sequencer key as `sequencer|||<store>|||<appId>|||<key>`.
pub fn sequencer_key(store_name: &str, app_id: &str, key: &str) -> Result<String, ApiError> {
    reject_separator(key, KEY_SEPARATOR)?;
    Ok(format!(
        "sequencer{sep}{store_name}{sep}{app_id}{sep}{key}",
        sep = KEY_SEPARATOR
    ))
}

/// Namespace a state key as `<appId>||<key>`.
pub fn state_key(app_id: &str, key: &str) -> Result<String, ApiError> {
    reject_separator(key, STATE_KEY_SEPARATOR)?;
    Ok(format!("{app_id}{STATE_KEY_SEPARATOR}{key}"))
}

/// Undo [`state_key`] on a key coming back from a component.
pub fn original_state_key(namespaced: &str) -> String {
    match namespaced.split_once(STATE_KEY_SEPARATOR) {
        Some((_, key)) => key.to_string(),
        None => namespaced.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_carries_store_app_and_resource() {
        let key = lock_resource_key("L", "A", "r1").unwrap();
        assert_eq!(key, "lock|||L|||A|||r1");
    }

    #[test]
    fn sequencer_key_carries_store_app_and_key() {
        let key = sequencer_key("etcd", "order-svc", "invoice").unwrap();
        assert_eq!(key, "sequencer|||etcd|||order-svc|||invoice");
    }

    #[test]
    fn separator_in_input_is_rejected() {
        assert!(lock_resource_key("L", "A", "a|||b").is_err());
        assert!(sequencer_key("s", "a", "x|||y").is_err());
        assert!(state_key("a", "x||y").is_err());
    }

    #[test]
    fn state_key_round_trips() {
        let namespaced = state_key("order-svc", "cart").unwrap();
        assert_eq!(namespaced, "order-svc||cart");
        assert_eq!(original_state_key(&namespaced), "cart");
    }

    #[test]
    fn original_state_key_passes_unnamespaced_keys_through() {
        assert_eq!(original_state_key("plain"), "plain");
    }
}
