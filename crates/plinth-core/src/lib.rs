//! # Plinth Core
//!
//! Abstract component interfaces for the Plinth distributed-capabilities
//! runtime. Each capability (configuration, state, pub/sub, file, lock,
//! sequencer, hello) is expressed as an async trait plus the request and
//! response types its components exchange with the dispatch core.
//!
//! Components are adapters over concrete infrastructure. This crate does no
//! I/O of its own; it only defines the seams the runtime consumes them
//! through.

pub mod configuration;
pub mod delegated;
pub mod file;
pub mod hello;
pub mod lock;
pub mod pubsub;
pub mod sequencer;
pub mod state;

pub use configuration::{
    ConfigurationChange, ConfigurationError, ConfigurationItem, ConfigurationStore,
    SubscriptionId,
};
pub use delegated::{DelegatedError, DelegatedRuntime};
pub use file::{FileError, FileReader, FileStore};
pub use hello::{Hello, HelloError};
pub use lock::{LockError, LockStore, TryLockStatus, UnlockStatus};
pub use pubsub::{PubSub, PubSubError, PubSubFeature};
pub use sequencer::{AutoIncrement, IdSegment, Sequencer, SequencerError};
pub use state::{StateError, StateFeature, StateStore, TransactionalStateStore};
