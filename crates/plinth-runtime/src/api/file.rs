//! File transfer operations.
//!
//! Downloads drain the component's byte reader into a pooled buffer and
//! emit each filled slice as one chunk. Uploads run the other way: the
//! first frame fixes the store, file name, and metadata for the session,
//! and a [`FrameReader`] synthesizes the byte stream components expect
//! from the remaining frames, pulled lazily so nothing is buffered whole.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tracing::warn;

use plinth_core::file;

use crate::error::ApiError;

use super::types::{
    DelFileRequest, FileInfoDto, GetFileMetaRequest, GetFileMetaResponse, GetFileRequest,
    ListFileRequest, ListFileResponse,
};
use super::RuntimeApi;

/// One frame of a chunked upload. Only the first frame's `store_name`,
/// `name`, and `metadata` are honoured; later frames carry data only.
#[derive(Debug, Clone, Default)]
pub struct PutFileFrame {
    pub store_name: String,
    pub name: String,
    pub metadata: std::collections::HashMap<String, String>,
    pub data: Bytes,
}

/// Where download chunks go; implemented by the transport layer.
#[async_trait]
pub trait FileChunkSink: Send {
    async fn send(&mut self, chunk: Bytes) -> Result<(), ApiError>;
}

impl RuntimeApi {
    /// Stream the named file to `sink` in pooled-buffer-sized chunks.
    pub async fn get_file<S>(&self, req: GetFileRequest, sink: &mut S) -> Result<(), ApiError>
    where
        S: FileChunkSink,
    {
        let store = self.file_stores.get(&req.store_name)?;
        let mut reader = store
            .get(file::GetFileRequest {
                name: req.name,
                metadata: req.metadata,
            })
            .await
            .map_err(|err| ApiError::from_file("get file", err))?;

        let mut buffer = self.buffers.lease();
        loop {
            let n = reader.read(&mut buffer).await.map_err(|err| {
                warn!(error = %err, "file read failed mid-stream");
                ApiError::component("get file", err)
            })?;
            if n == 0 {
                return Ok(());
            }
            sink.send(Bytes::copy_from_slice(&buffer[..n])).await?;
        }
    }

    /// Consume a chunked upload and hand the component a byte reader.
    ///
    /// A stream that ends before its first frame is a clean no-op, matching
    /// a client that opens and immediately closes the upload.
    pub async fn put_file<St>(&self, mut frames: St) -> Result<(), ApiError>
    where
        St: Stream<Item = Result<PutFileFrame, ApiError>> + Send + Unpin + 'static,
    {
        let first = match frames.next().await {
            None => return Ok(()),
            Some(frame) => frame?,
        };
        let store = self.file_stores.get(&first.store_name)?;
        let reader = FrameReader::new(first.data, frames.map(|frame| frame.map(|f| f.data)));
        store
            .put(file::PutFileRequest {
                name: first.name,
                metadata: first.metadata,
                data: Box::new(reader),
            })
            .await
            .map_err(|err| ApiError::from_file("put file", err))
    }

    pub async fn list_file(&self, req: ListFileRequest) -> Result<ListFileResponse, ApiError> {
        let inner = req.request.ok_or(ApiError::MissingRequest)?;
        let store = self.file_stores.get(&inner.store_name)?;
        let resp = store
            .list(file::ListRequest {
                directory: inner.name,
                page_size: req.page_size,
                marker: req.marker,
                metadata: inner.metadata,
            })
            .await
            .map_err(|err| ApiError::component("list file", err))?;
        Ok(ListFileResponse {
            files: resp
                .files
                .into_iter()
                .map(|info| FileInfoDto {
                    file_name: info.name,
                    size: info.size,
                    last_modified: info.last_modified,
                    metadata: info.metadata,
                })
                .collect(),
            marker: resp.marker,
            is_truncated: resp.truncated,
        })
    }

    pub async fn del_file(&self, req: DelFileRequest) -> Result<(), ApiError> {
        let inner = req.request.ok_or(ApiError::MissingRequest)?;
        let store = self.file_stores.get(&inner.store_name)?;
        store
            .del(file::DelRequest {
                name: inner.name,
                metadata: inner.metadata,
            })
            .await
            .map_err(|err| ApiError::from_file("delete file", err))
    }

    pub async fn get_file_meta(
        &self,
        req: GetFileMetaRequest,
    ) -> Result<GetFileMetaResponse, ApiError> {
        let inner = req.request.ok_or(ApiError::MissingRequest)?;
        let store = self.file_stores.get(&inner.store_name)?;
        let resp = store
            .stat(file::StatRequest {
                name: inner.name,
                metadata: inner.metadata,
            })
            .await
            .map_err(|err| ApiError::from_file("get file meta", err))?;
        Ok(GetFileMetaResponse {
            size: resp.size,
            last_modified: resp.last_modified,
            metadata: resp.metadata,
        })
    }
}

/// Byte reader synthesized from a stream of upload frames.
///
/// Reads are served from the leftover of the current frame first; the next
/// frame is pulled from the stream only when that runs out. Stream
/// exhaustion is end-of-file; a stream error surfaces as an I/O error on
/// the reader.
pub struct FrameReader<St> {
    leftover: Bytes,
    frames: Pin<Box<St>>,
}

impl<St> FrameReader<St>
where
    St: Stream<Item = Result<Bytes, ApiError>> + Send,
{
    pub fn new(leftover: Bytes, frames: St) -> Self {
        Self {
            leftover,
            frames: Box::pin(frames),
        }
    }
}

impl<St> AsyncRead for FrameReader<St>
where
    St: Stream<Item = Result<Bytes, ApiError>> + Send,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            if !this.leftover.is_empty() {
                let n = this.leftover.len().min(buf.remaining());
                buf.put_slice(&this.leftover.split_to(n));
                return Poll::Ready(Ok(()));
            }
            match ready!(this.frames.as_mut().poll_next(cx)) {
                // End of stream: return with nothing filled, which is EOF.
                None => return Poll::Ready(Ok(())),
                Some(Ok(data)) => this.leftover = data,
                Some(Err(err)) => {
                    return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, err.to_string())))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all<St>(mut reader: FrameReader<St>) -> Vec<u8>
    where
        St: Stream<Item = Result<Bytes, ApiError>> + Send + Unpin,
    {
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn frame_reader_concatenates_leftover_and_frames() {
        let frames = futures::stream::iter(vec![
            Ok(Bytes::from_static(b" world")),
            Ok(Bytes::from_static(b"!")),
        ]);
        let reader = FrameReader::new(Bytes::from_static(b"hello"), frames);
        assert_eq!(read_all(reader).await, b"hello world!");
    }

    #[tokio::test]
    async fn frame_reader_handles_empty_first_frame() {
        let frames = futures::stream::iter(vec![Ok(Bytes::from_static(b"data"))]);
        let reader = FrameReader::new(Bytes::new(), frames);
        assert_eq!(read_all(reader).await, b"data");
    }

    #[tokio::test]
    async fn frame_reader_serves_small_reads_across_frame_boundaries() {
        let frames = futures::stream::iter(vec![Ok(Bytes::from_static(b"cdef"))]);
        let mut reader = FrameReader::new(Bytes::from_static(b"ab"), frames);
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"abc");
        reader.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"def");
    }

    #[tokio::test]
    async fn frame_reader_surfaces_stream_errors_as_io_errors() {
        let frames = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(ApiError::Stream {
                reason: "reset".into(),
            }),
        ]);
        let mut reader = FrameReader::new(Bytes::new(), frames);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).await.unwrap_err();
        assert!(err.to_string().contains("reset"));
    }
}
