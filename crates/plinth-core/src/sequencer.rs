//! Sequencer interface: monotonic id generation per key.
//!
//! Components must return strictly increasing ids per key. Batch allocation
//! through [`Sequencer::get_segment`] is optional; the default
//! implementation reports no support, which makes the runtime fall back to
//! per-call delegation in WEAK mode.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Monotonicity regime requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoIncrement {
    /// Ids may be served from a per-process cached range.
    #[default]
    Weak,
    /// Every id comes from the backend.
    Strong,
}

#[derive(Debug, Clone, Default)]
pub struct GetNextIdRequest {
    pub key: String,
    pub increment: AutoIncrement,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetNextIdResponse {
    pub next_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct GetSegmentRequest {
    pub key: String,
    /// Number of ids requested.
    pub size: u32,
    pub metadata: HashMap<String, String>,
}

/// A pre-allocated id range `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSegment {
    pub from: i64,
    pub to: i64,
}

/// Errors reported by sequencer components.
#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("sequencer error: {0}")]
    Internal(String),
}

/// A pluggable monotonic-id backend.
#[async_trait]
pub trait Sequencer: Send + Sync {
    async fn get_next_id(&self, req: GetNextIdRequest) -> Result<GetNextIdResponse, SequencerError>;

    /// Reserve a batch of ids. `Ok(None)` means batch allocation is not
    /// supported by this component.
    async fn get_segment(
        &self,
        _req: GetSegmentRequest,
    ) -> Result<Option<IdSegment>, SequencerError> {
        Ok(None)
    }
}
