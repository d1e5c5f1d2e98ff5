//! Mock configuration store with push-able changes and stop recording.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use plinth_core::configuration::{
    ConfigurationChange, ConfigurationError, ConfigurationItem, ConfigurationStore, DeleteRequest,
    GetRequest, SetRequest, SubscribeRequest, SubscriptionId,
};

/// In-memory configuration backend.
///
/// Items are stored by (group, label, key). Tests drive subscriptions by
/// calling [`MockConfigurationStore::push_change`], which fans the change
/// out to every live subscription, and can assert on the handles passed to
/// `stop_subscribe`.
pub struct MockConfigurationStore {
    store_name: String,
    items: Mutex<HashMap<(String, String, String), ConfigurationItem>>,
    subscriptions: Mutex<HashMap<SubscriptionId, mpsc::Sender<ConfigurationChange>>>,
    next_subscription: AtomicU64,
    stopped: Mutex<Vec<SubscriptionId>>,
    /// Requests seen by `get`/`set`/`delete`, for normalization assertions.
    requests: Mutex<Vec<(String, String)>>,
}

impl MockConfigurationStore {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            items: Mutex::new(HashMap::new()),
            subscriptions: Mutex::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
            stopped: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Push a change to every live subscription.
    pub async fn push_change(&self, items: Vec<ConfigurationItem>) {
        let senders: Vec<_> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for sender in senders {
            let _ = sender
                .send(ConfigurationChange {
                    store_name: self.store_name.clone(),
                    items: items.clone(),
                })
                .await;
        }
    }

    /// Handles that have been stopped, in stop order.
    pub fn stopped_subscriptions(&self) -> Vec<SubscriptionId> {
        self.stopped.lock().unwrap().clone()
    }

    /// Number of currently live subscriptions.
    pub fn live_subscriptions(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// (group, label) pairs observed across all requests.
    pub fn observed_scopes(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    fn record_scope(&self, group: &str, label: &str) {
        self.requests
            .lock()
            .unwrap()
            .push((group.to_string(), label.to_string()));
    }
}

#[async_trait]
impl ConfigurationStore for MockConfigurationStore {
    async fn get(&self, req: GetRequest) -> Result<Vec<ConfigurationItem>, ConfigurationError> {
        self.record_scope(&req.group, &req.label);
        let items = self.items.lock().unwrap();
        if req.keys.is_empty() {
            return Ok(items
                .iter()
                .filter(|((group, label, _), _)| *group == req.group && *label == req.label)
                .map(|(_, item)| item.clone())
                .collect());
        }
        Ok(req
            .keys
            .iter()
            .filter_map(|key| {
                items
                    .get(&(req.group.clone(), req.label.clone(), key.clone()))
                    .cloned()
            })
            .collect())
    }

    async fn set(&self, req: SetRequest) -> Result<(), ConfigurationError> {
        let mut items = self.items.lock().unwrap();
        for item in req.items {
            self.record_scope(&item.group, &item.label);
            items.insert(
                (item.group.clone(), item.label.clone(), item.key.clone()),
                item,
            );
        }
        Ok(())
    }

    async fn delete(&self, req: DeleteRequest) -> Result<(), ConfigurationError> {
        self.record_scope(&req.group, &req.label);
        let mut items = self.items.lock().unwrap();
        for key in &req.keys {
            items.remove(&(req.group.clone(), req.label.clone(), key.clone()));
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        req: SubscribeRequest,
        changes: mpsc::Sender<ConfigurationChange>,
    ) -> Result<SubscriptionId, ConfigurationError> {
        self.record_scope(&req.group, &req.label);
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.subscriptions.lock().unwrap().insert(id, changes);
        Ok(id)
    }

    async fn stop_subscribe(&self, id: SubscriptionId) {
        self.subscriptions.lock().unwrap().remove(&id);
        self.stopped.lock().unwrap().push(id);
    }

    fn default_group(&self) -> &str {
        "default"
    }

    fn default_label(&self) -> &str {
        "default"
    }
}
