//! # Plinth Runtime
//!
//! The dispatch and mediation core of the Plinth sidecar: request
//! validation and routing onto named components, the configuration
//! subscription engine, CloudEvents envelope machinery, chunked file
//! transfer bridging, the WEAK-mode sequencer range cache, and lock/state
//! key namespacing.
//!
//! The core is transport-agnostic. `plinth-http` puts a wire surface in
//! front of [`RuntimeApi`]; tests drive it directly.

pub mod api;
pub mod buffer_pool;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod registry;
pub mod sequencer_cache;

pub use api::configuration::{SubscriptionReceiver, SubscriptionSender};
pub use api::file::{FileChunkSink, FrameReader, PutFileFrame};
pub use api::{types, RuntimeApi, RuntimeApiBuilder};
pub use buffer_pool::{BufferPool, MIN_BUFFER_SIZE};
pub use error::{ApiError, Capability, ErrorCode};
pub use sequencer_cache::{SequencerCache, SEGMENT_SIZE};
