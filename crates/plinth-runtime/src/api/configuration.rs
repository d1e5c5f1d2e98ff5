//! Configuration operations and the subscription engine.
//!
//! The unary operations are plain dispatch. Subscriptions are a duplex
//! session: one reader task turns incoming subscribe requests into
//! component subscriptions sharing a single response channel, and one
//! writer task forwards everything arriving on that channel back to the
//! client. Teardown is strictly ordered: the reader stops every
//! subscription this session opened, then signals the writer, then exits;
//! the session returns once both tasks are done, with the reader's error.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

use plinth_core::configuration::{
    self as config, ConfigurationChange, ConfigurationStore, SubscriptionId,
};

use crate::error::ApiError;

use super::types::{
    ConfigurationItemDto, DeleteConfigurationRequest, GetConfigurationRequest,
    GetConfigurationResponse, SaveConfigurationRequest, SubscribeConfigurationRequest,
    SubscribeConfigurationResponse,
};
use super::{default_if_blank, RuntimeApi};

/// Changes buffered between components and the writer task.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Client-to-runtime half of a subscription session.
#[async_trait]
pub trait SubscriptionReceiver: Send + 'static {
    /// The next subscribe request; `Ok(None)` is a clean client close.
    async fn recv(&mut self) -> Result<Option<SubscribeConfigurationRequest>, ApiError>;
}

/// Runtime-to-client half of a subscription session.
#[async_trait]
pub trait SubscriptionSender: Send + 'static {
    async fn send(&mut self, resp: SubscribeConfigurationResponse) -> Result<(), ApiError>;
}

type SessionSubscriptions = Arc<Mutex<Vec<(Arc<dyn ConfigurationStore>, SubscriptionId)>>>;

impl RuntimeApi {
    pub async fn get_configuration(
        &self,
        req: GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse, ApiError> {
        let store = self.config_stores.get(&req.store_name)?;
        let items = store
            .get(config::GetRequest {
                app_id: req.app_id,
                group: default_if_blank(req.group, store.default_group()),
                label: default_if_blank(req.label, store.default_label()),
                keys: req.keys,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::component("get configuration", err))?;
        Ok(GetConfigurationResponse {
            items: items.into_iter().map(ConfigurationItemDto::from).collect(),
        })
    }

    pub async fn save_configuration(
        &self,
        req: SaveConfigurationRequest,
    ) -> Result<(), ApiError> {
        let store = self.config_stores.get(&req.store_name)?;
        let items = req
            .items
            .into_iter()
            .map(|item| {
                let mut item = config::ConfigurationItem::from(item);
                item.group = default_if_blank(item.group, store.default_group());
                item.label = default_if_blank(item.label, store.default_label());
                item
            })
            .collect();
        store
            .set(config::SetRequest {
                app_id: req.app_id,
                store_name: req.store_name,
                items,
            })
            .await
            .map_err(|err| ApiError::component("save configuration", err))
    }

    pub async fn delete_configuration(
        &self,
        req: DeleteConfigurationRequest,
    ) -> Result<(), ApiError> {
        let store = self.config_stores.get(&req.store_name)?;
        store
            .delete(config::DeleteRequest {
                app_id: req.app_id,
                group: default_if_blank(req.group, store.default_group()),
                label: default_if_blank(req.label, store.default_label()),
                keys: req.keys,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::component("delete configuration", err))
    }

    /// Run one subscription session until the client closes or a stream
    /// error occurs.
    ///
    /// Guarantees on return: every component subscription opened by this
    /// session has been stopped exactly once, both tasks have finished,
    /// and the result is the reader's terminal state (`Ok` for a clean
    /// client close).
    pub async fn subscribe_configuration<R, W>(
        self: Arc<Self>,
        receiver: R,
        sender: W,
    ) -> Result<(), ApiError>
    where
        R: SubscriptionReceiver,
        W: SubscriptionSender,
    {
        let (change_tx, change_rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let (exit_tx, exit_rx) = oneshot::channel();
        let subscriptions: SessionSubscriptions = Arc::new(Mutex::new(Vec::new()));

        let reader = tokio::spawn(read_subscriptions(
            Arc::clone(&self),
            receiver,
            change_tx,
            Arc::clone(&subscriptions),
            exit_tx,
        ));
        let writer = tokio::spawn(write_changes(self.app_id.clone(), sender, change_rx, exit_rx));

        let (read_result, write_result) = tokio::join!(reader, writer);
        if let Err(err) = write_result {
            error!(error = %err, "subscription writer task panicked");
        }
        match read_result {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "subscription reader task panicked");
                Err(ApiError::Stream {
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Reader task: consume subscribe requests until the stream ends, then
/// tear the session down.
async fn read_subscriptions<R>(
    api: Arc<RuntimeApi>,
    mut receiver: R,
    change_tx: mpsc::Sender<ConfigurationChange>,
    subscriptions: SessionSubscriptions,
    exit_tx: oneshot::Sender<()>,
) -> Result<(), ApiError>
where
    R: SubscriptionReceiver,
{
    let result = loop {
        let req = match receiver.recv().await {
            Ok(Some(req)) => req,
            // Clean close from the client.
            Ok(None) => break Ok(()),
            Err(err) => {
                error!(error = %err, "subscription stream receive failed");
                break Err(err);
            }
        };
        let store = match api.config_stores.get(&req.store_name) {
            Ok(store) => store,
            Err(err) => {
                error!(error = %err, "subscription names an unusable store");
                break Err(err);
            }
        };
        let subscribe_req = config::SubscribeRequest {
            app_id: req.app_id,
            group: default_if_blank(req.group, store.default_group()),
            label: default_if_blank(req.label, store.default_label()),
            keys: req.keys,
            metadata: req.metadata,
        };
        match store.subscribe(subscribe_req, change_tx.clone()).await {
            Ok(id) => {
                subscriptions
                    .lock()
                    .expect("subscription list lock poisoned")
                    .push((store, id));
            }
            Err(err) => {
                let err = ApiError::component("subscribe configuration", err);
                error!(error = %err, "component subscribe failed");
                break Err(err);
            }
        }
    };

    // Stop only what this session opened, before letting the writer go.
    let opened: Vec<_> = subscriptions
        .lock()
        .expect("subscription list lock poisoned")
        .drain(..)
        .collect();
    for (store, id) in opened {
        store.stop_subscribe(id).await;
    }
    let _ = exit_tx.send(());
    result
}

/// Writer task: forward component changes until the channel closes or the
/// reader signals exit.
async fn write_changes<W>(
    app_id: String,
    mut sender: W,
    mut change_rx: mpsc::Receiver<ConfigurationChange>,
    mut exit_rx: oneshot::Receiver<()>,
) where
    W: SubscriptionSender,
{
    loop {
        tokio::select! {
            change = change_rx.recv() => {
                let Some(change) = change else { break };
                let resp = SubscribeConfigurationResponse {
                    store_name: change.store_name,
                    app_id: app_id.clone(),
                    items: change
                        .items
                        .into_iter()
                        .map(ConfigurationItemDto::from)
                        .collect(),
                };
                if let Err(err) = sender.send(resp).await {
                    warn!(error = %err, "subscription stream send failed");
                    break;
                }
            }
            _ = &mut exit_rx => break,
        }
    }
}
