//! Configuration subscription over WebSocket.
//!
//! The socket is the bidi stream: the client sends JSON subscribe requests,
//! the runtime pushes JSON change notifications. The socket halves are
//! adapted onto the runtime's session traits so the engine itself never
//! sees the transport.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use plinth_runtime::types::{SubscribeConfigurationRequest, SubscribeConfigurationResponse};
use plinth_runtime::{ApiError, RuntimeApi, SubscriptionReceiver, SubscriptionSender};

pub async fn subscribe_configuration(
    ws: WebSocketUpgrade,
    State(api): State<Arc<RuntimeApi>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_subscription(socket, api))
}

async fn handle_subscription(socket: WebSocket, api: Arc<RuntimeApi>) {
    let (sink, stream) = socket.split();
    match api
        .subscribe_configuration(WsReceiver(stream), WsSender(sink))
        .await
    {
        Ok(()) => debug!("subscription session closed cleanly"),
        Err(err) => warn!(error = %err, "subscription session failed"),
    }
}

struct WsReceiver(SplitStream<WebSocket>);

#[async_trait]
impl SubscriptionReceiver for WsReceiver {
    async fn recv(&mut self) -> Result<Option<SubscribeConfigurationRequest>, ApiError> {
        loop {
            match self.0.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str())
                        .map(Some)
                        .map_err(|err| ApiError::Serialization {
                            reason: format!("subscribe request decode: {err}"),
                        });
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Control frames are handled by the protocol layer.
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    return Err(ApiError::Stream {
                        reason: err.to_string(),
                    })
                }
            }
        }
    }
}

struct WsSender(SplitSink<WebSocket, Message>);

#[async_trait]
impl SubscriptionSender for WsSender {
    async fn send(&mut self, resp: SubscribeConfigurationResponse) -> Result<(), ApiError> {
        let text = serde_json::to_string(&resp).map_err(|err| ApiError::Serialization {
            reason: format!("notification encode: {err}"),
        })?;
        self.0
            .send(Message::Text(text.into()))
            .await
            .map_err(|err| ApiError::Stream {
                reason: err.to_string(),
            })
    }
}
