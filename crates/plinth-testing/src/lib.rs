//! # Plinth Testing
//!
//! In-memory component implementations with call recording, so runtime and
//! wire tests run against predictable backends without external
//! infrastructure. Every mock implements the corresponding `plinth-core`
//! trait and exposes assertions on what it observed.

mod configuration;
mod delegated;
mod file;
mod hello;
mod lock;
mod pubsub;
mod sequencer;
mod state;

pub use configuration::MockConfigurationStore;
pub use delegated::MockDelegatedRuntime;
pub use file::InMemoryFileStore;
pub use hello::GreetingHello;
pub use lock::InMemoryLockStore;
pub use pubsub::RecordingPubSub;
pub use sequencer::SegmentSequencer;
pub use state::InMemoryStateStore;
