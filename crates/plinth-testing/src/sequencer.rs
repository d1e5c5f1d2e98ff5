//! Counting sequencer with optional batch allocation.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;

use plinth_core::sequencer::{
    GetNextIdRequest, GetNextIdResponse, GetSegmentRequest, IdSegment, Sequencer, SequencerError,
};

/// Sequencer backend counting up from 1 across all keys.
///
/// With segments enabled it hands out ranges of the requested size;
/// without, `get_segment` reports no support so the runtime degrades to
/// per-call delegation. Call counters expose how often each path ran.
pub struct SegmentSequencer {
    next: AtomicI64,
    supports_segments: bool,
    segment_calls: AtomicUsize,
    next_id_calls: AtomicUsize,
}

impl SegmentSequencer {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
            supports_segments: true,
            segment_calls: AtomicUsize::new(0),
            next_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_segments() -> Self {
        Self {
            next: AtomicI64::new(1),
            supports_segments: false,
            segment_calls: AtomicUsize::new(0),
            next_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn segment_calls(&self) -> usize {
        self.segment_calls.load(Ordering::SeqCst)
    }

    pub fn next_id_calls(&self) -> usize {
        self.next_id_calls.load(Ordering::SeqCst)
    }
}

impl Default for SegmentSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sequencer for SegmentSequencer {
    async fn get_next_id(&self, _req: GetNextIdRequest) -> Result<GetNextIdResponse, SequencerError> {
        self.next_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GetNextIdResponse {
            next_id: self.next.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn get_segment(
        &self,
        req: GetSegmentRequest,
    ) -> Result<Option<IdSegment>, SequencerError> {
        if !self.supports_segments {
            return Ok(None);
        }
        self.segment_calls.fetch_add(1, Ordering::SeqCst);
        let from = self.next.fetch_add(req.size as i64, Ordering::SeqCst);
        Ok(Some(IdSegment {
            from,
            to: from + req.size as i64,
        }))
    }
}
