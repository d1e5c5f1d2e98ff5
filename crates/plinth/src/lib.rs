//! # Plinth
//!
//! A distributed-capabilities runtime that runs alongside an application as
//! a sidecar. The application talks to one unified API; Plinth dispatches
//! each request to a pluggable backend component selected by the store name
//! in the request, so application code never binds to a concrete database,
//! broker, or filesystem.
//!
//! Capabilities: configuration (with live subscription), state storage,
//! publish/subscribe, distributed locks, distributed sequencers, file
//! object I/O, plus service invocation, bindings, and secrets delegated to
//! an adjacent runtime.
//!
//! ## Assembling a runtime
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plinth::{HttpServerConfig, RuntimeApi};
//!
//! # async fn run(state_store: Arc<dyn plinth::core::StateStore>) -> std::io::Result<()> {
//! let api = Arc::new(
//!     RuntimeApi::builder("my-app")
//!         .with_state_store("redis", state_store)
//!         .build(),
//! );
//! plinth::serve(api, HttpServerConfig::default()).await
//! # }
//! ```

pub use plinth_core as core;
pub use plinth_http::{router, serve, HttpServerConfig};
pub use plinth_runtime::{
    types, ApiError, Capability, ErrorCode, RuntimeApi, RuntimeApiBuilder,
};
