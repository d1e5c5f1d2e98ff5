//! WEAK-mode range cache for sequencers.
//!
//! Each (namespaced) key owns a pre-allocated id range served without
//! touching the backend. When a range runs dry the entry asks the
//! component for a fresh segment under its own mutex, so concurrent
//! requests on one key serialize while different keys proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use plinth_core::sequencer::{
    GetNextIdRequest, GetSegmentRequest, Sequencer, SequencerError,
};

/// Ids fetched from the backend per segment.
pub const SEGMENT_SIZE: u32 = 100;

#[derive(Debug, Default)]
struct Range {
    /// Next id to hand out; the range is exhausted when `next == end`.
    next: i64,
    end: i64,
}

/// Per-key id ranges, keyed by the fully-namespaced sequencer key.
pub struct SequencerCache {
    entries: DashMap<String, Arc<Mutex<Range>>>,
}

impl SequencerCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Take the next cached id for `req.key`, refilling from the component
    /// when the range is exhausted.
    ///
    /// Returns `Ok(None)` when the component does not support batch
    /// allocation; the caller then degrades to per-call delegation.
    pub async fn next_id(
        &self,
        store: &Arc<dyn Sequencer>,
        req: &GetNextIdRequest,
    ) -> Result<Option<i64>, SequencerError> {
        let entry = self
            .entries
            .entry(req.key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Range::default())))
            .clone();
        let mut range = entry.lock().await;
        if range.next >= range.end {
            let segment = store
                .get_segment(GetSegmentRequest {
                    key: req.key.clone(),
                    size: SEGMENT_SIZE,
                    metadata: req.metadata.clone(),
                })
                .await?;
            match segment {
                Some(segment) => {
                    range.next = segment.from;
                    range.end = segment.to;
                }
                None => return Ok(None),
            }
        }
        let id = range.next;
        range.next += 1;
        Ok(Some(id))
    }

    /// Drop every cached range; used on store teardown.
    pub fn clear(&self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn cached_keys(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SequencerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plinth_core::sequencer::{GetNextIdResponse, IdSegment};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct CountingSequencer {
        next: AtomicI64,
        segment_calls: AtomicUsize,
        supports_segments: bool,
    }

    impl CountingSequencer {
        fn new(supports_segments: bool) -> Self {
            Self {
                next: AtomicI64::new(1),
                segment_calls: AtomicUsize::new(0),
                supports_segments,
            }
        }
    }

    #[async_trait]
    impl Sequencer for CountingSequencer {
        async fn get_next_id(
            &self,
            _req: GetNextIdRequest,
        ) -> Result<GetNextIdResponse, SequencerError> {
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

    fn request(key: &str) -> GetNextIdRequest {
        GetNextIdRequest {
            key: key.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn serves_a_full_segment_before_refilling() {
        let cache = SequencerCache::new();
        let counting = Arc::new(CountingSequencer::new(true));
        let store: Arc<dyn Sequencer> = counting.clone();

        for expected in 1..=250i64 {
            let id = cache.next_id(&store, &request("k")).await.unwrap().unwrap();
            assert_eq!(id, expected);
        }
        // 250 ids at 100 per segment means exactly three backend calls.
        assert_eq!(counting.segment_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unsupported_segments_degrade_to_none() {
        let cache = SequencerCache::new();
        let store: Arc<dyn Sequencer> = Arc::new(CountingSequencer::new(false));
        assert!(cache.next_id(&store, &request("k")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn distinct_keys_use_distinct_ranges() {
        let cache = SequencerCache::new();
        let store: Arc<dyn Sequencer> = Arc::new(CountingSequencer::new(true));
        let a = cache.next_id(&store, &request("a")).await.unwrap().unwrap();
        let b = cache.next_id(&store, &request("b")).await.unwrap().unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.cached_keys(), 2);
    }

    #[tokio::test]
    async fn concurrent_requests_on_one_key_never_repeat_ids() {
        let cache = Arc::new(SequencerCache::new());
        let store: Arc<dyn Sequencer> = Arc::new(CountingSequencer::new(true));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for _ in 0..50 {
                    ids.push(cache.next_id(&store, &request("k")).await.unwrap().unwrap());
                }
                ids
            }));
        }
        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count, "duplicate ids were issued");
    }
}
