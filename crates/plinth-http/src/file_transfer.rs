//! Streaming file transfer handlers.
//!
//! Downloads answer with a chunked response body fed by the runtime's
//! pooled read loop. Uploads stream the request body through the runtime's
//! frame reader into the component; file identity and metadata ride in the
//! query string and `x-plinth-meta-*` headers since the body is pure data.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use plinth_runtime::types::GetFileRequest;
use plinth_runtime::{ApiError, FileChunkSink, PutFileFrame, RuntimeApi};

use crate::error::HttpError;

/// Header prefix whose suffix becomes a file metadata key.
const METADATA_HEADER_PREFIX: &str = "x-plinth-meta-";

/// Chunks in flight between the read loop and the response body.
const DOWNLOAD_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutFileQuery {
    pub store_name: String,
    pub name: String,
}

struct ChannelSink(mpsc::Sender<Result<Bytes, io::Error>>);

#[async_trait::async_trait]
impl FileChunkSink for ChannelSink {
    async fn send(&mut self, chunk: Bytes) -> Result<(), ApiError> {
        self.0
            .send(Ok(chunk))
            .await
            .map_err(|_| ApiError::Stream {
                reason: "download response closed by client".into(),
            })
    }
}

/// `GetFile`: stream the named file back as the response body.
pub async fn get_file(
    State(api): State<Arc<RuntimeApi>>,
    Json(req): Json<GetFileRequest>,
) -> Response {
    let (tx, rx) = mpsc::channel(DOWNLOAD_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut sink = ChannelSink(tx.clone());
        if let Err(err) = api.get_file(req, &mut sink).await {
            warn!(error = %err, "file download failed");
            let _ = tx.send(Err(io::Error::other(err.to_string()))).await;
        }
    });
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}

/// `PutFile`: feed the request body to the component as one upload session.
pub async fn put_file(
    State(api): State<Arc<RuntimeApi>>,
    Query(query): Query<PutFileQuery>,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, HttpError> {
    let first = PutFileFrame {
        store_name: query.store_name,
        name: query.name,
        metadata: metadata_from_headers(&headers),
        data: Bytes::new(),
    };
    let data_frames = body.into_data_stream().map(|chunk| match chunk {
        Ok(data) => Ok(PutFileFrame {
            data,
            ..Default::default()
        }),
        Err(err) => Err(ApiError::Stream {
            reason: err.to_string(),
        }),
    });
    let frames = Box::pin(futures::stream::once(async move { Ok(first) }).chain(data_frames));
    api.put_file(frames).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn metadata_from_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let key = name.as_str().strip_prefix(METADATA_HEADER_PREFIX)?;
            let value = value.to_str().ok()?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn metadata_headers_are_collected_by_suffix() {
        let mut headers = HeaderMap::new();
        headers.insert("x-plinth-meta-owner", HeaderValue::from_static("alice"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        let metadata = metadata_from_headers(&headers);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["owner"], "alice");
    }
}
