//! The dispatch core.
//!
//! [`RuntimeApi`] owns one registry per capability plus the handle to the
//! delegated runtime. Registries are populated through the builder and
//! never mutated afterwards, so request dispatch reads them without locks.
//!
//! Every operation follows the same shape: precondition check on the
//! registry, lookup by store name, field validation, normalization
//! (defaults and key namespacing), delegation to the component, and
//! field-by-field response conversion. Failures map onto the stable
//! taxonomy in [`crate::error`].

pub mod configuration;
pub mod delegated;
pub mod file;
pub mod lock;
pub mod pubsub;
pub mod sequencer;
pub mod state;
pub mod types;

use std::sync::Arc;

use plinth_core::configuration::ConfigurationStore;
use plinth_core::delegated::DelegatedRuntime;
use plinth_core::file::FileStore;
use plinth_core::hello::{Hello, HelloRequest};
use plinth_core::lock::LockStore;
use plinth_core::pubsub::PubSub;
use plinth_core::sequencer::Sequencer;
use plinth_core::state::{StateFeature, StateStore, TransactionalStateStore};

use crate::buffer_pool::BufferPool;
use crate::error::{ApiError, Capability};
use crate::registry::Registry;
use crate::sequencer_cache::SequencerCache;

use self::types::{SayHelloRequest, SayHelloResponse};

/// The runtime core: application id, component registries, and the
/// delegated-operations handle.
pub struct RuntimeApi {
    app_id: String,
    hellos: Registry<dyn Hello>,
    config_stores: Registry<dyn ConfigurationStore>,
    state_stores: Registry<dyn StateStore>,
    transactional_state_stores: Registry<dyn TransactionalStateStore>,
    pubsubs: Registry<dyn PubSub>,
    file_stores: Registry<dyn FileStore>,
    lock_stores: Registry<dyn LockStore>,
    sequencers: Registry<dyn Sequencer>,
    sequencer_cache: SequencerCache,
    buffers: BufferPool,
    delegated: Option<Arc<dyn DelegatedRuntime>>,
}

impl RuntimeApi {
    pub fn builder(app_id: impl Into<String>) -> RuntimeApiBuilder {
        RuntimeApiBuilder::new(app_id)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Greet through the named hello component, echoing the request data.
    pub async fn say_hello(&self, req: SayHelloRequest) -> Result<SayHelloResponse, ApiError> {
        let service = self.hellos.get(&req.service_name)?;
        let resp = service
            .hello(HelloRequest { name: req.name })
            .await
            .map_err(|err| ApiError::component("say hello", err))?;
        Ok(SayHelloResponse {
            hello: resp.greeting,
            data: req.data,
        })
    }

    fn delegated(&self) -> Result<&Arc<dyn DelegatedRuntime>, ApiError> {
        self.delegated.as_ref().ok_or(ApiError::NotConfigured {
            capability: Capability::Delegated,
        })
    }
}

/// Builder collecting components before the runtime starts serving.
///
/// Transactional state support is probed here, at construction time:
/// [`RuntimeApiBuilder::with_transactional_state_store`] registers the
/// component in the plain state registry always and in the transactional
/// registry only when its feature set advertises
/// [`StateFeature::Transactional`].
pub struct RuntimeApiBuilder {
    app_id: String,
    hellos: Registry<dyn Hello>,
    config_stores: Registry<dyn ConfigurationStore>,
    state_stores: Registry<dyn StateStore>,
    transactional_state_stores: Registry<dyn TransactionalStateStore>,
    pubsubs: Registry<dyn PubSub>,
    file_stores: Registry<dyn FileStore>,
    lock_stores: Registry<dyn LockStore>,
    sequencers: Registry<dyn Sequencer>,
    delegated: Option<Arc<dyn DelegatedRuntime>>,
}

impl RuntimeApiBuilder {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            hellos: Registry::new(Capability::Hello),
            config_stores: Registry::new(Capability::Configuration),
            state_stores: Registry::new(Capability::State),
            transactional_state_stores: Registry::new(Capability::TransactionalState),
            pubsubs: Registry::new(Capability::PubSub),
            file_stores: Registry::new(Capability::File),
            lock_stores: Registry::new(Capability::Lock),
            sequencers: Registry::new(Capability::Sequencer),
            delegated: None,
        }
    }

    pub fn with_hello(mut self, name: impl Into<String>, service: Arc<dyn Hello>) -> Self {
        self.hellos.insert(name, service);
        self
    }

    pub fn with_config_store(
        mut self,
        name: impl Into<String>,
        store: Arc<dyn ConfigurationStore>,
    ) -> Self {
        self.config_stores.insert(name, store);
        self
    }

    pub fn with_state_store(mut self, name: impl Into<String>, store: Arc<dyn StateStore>) -> Self {
        self.state_stores.insert(name, store);
        self
    }

    /// Register a state store that may also support transactions.
    pub fn with_transactional_state_store<S>(mut self, name: impl Into<String>, store: Arc<S>) -> Self
    where
        S: TransactionalStateStore + 'static,
    {
        let name = name.into();
        if store.features().contains(&StateFeature::Transactional) {
            self.transactional_state_stores.insert(name.clone(), store.clone());
        }
        self.state_stores.insert(name, store);
        self
    }

    pub fn with_pubsub(mut self, name: impl Into<String>, pubsub: Arc<dyn PubSub>) -> Self {
        self.pubsubs.insert(name, pubsub);
        self
    }

    pub fn with_file_store(mut self, name: impl Into<String>, store: Arc<dyn FileStore>) -> Self {
        self.file_stores.insert(name, store);
        self
    }

    pub fn with_lock_store(mut self, name: impl Into<String>, store: Arc<dyn LockStore>) -> Self {
        self.lock_stores.insert(name, store);
        self
    }

    pub fn with_sequencer(mut self, name: impl Into<String>, store: Arc<dyn Sequencer>) -> Self {
        self.sequencers.insert(name, store);
        self
    }

    pub fn with_delegated(mut self, delegated: Arc<dyn DelegatedRuntime>) -> Self {
        self.delegated = Some(delegated);
        self
    }

    pub fn build(self) -> RuntimeApi {
        RuntimeApi {
            app_id: self.app_id,
            hellos: self.hellos,
            config_stores: self.config_stores,
            state_stores: self.state_stores,
            transactional_state_stores: self.transactional_state_stores,
            pubsubs: self.pubsubs,
            file_stores: self.file_stores,
            lock_stores: self.lock_stores,
            sequencers: self.sequencers,
            sequencer_cache: SequencerCache::new(),
            buffers: BufferPool::new(),
            delegated: self.delegated,
        }
    }
}

/// Blank-after-trim strings take the component-supplied default.
fn default_if_blank(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}
