//! # Plinth HTTP
//!
//! The wire surface of the Plinth runtime: every capability operation as a
//! route, unary ops over JSON, file transfer over streamed bodies, and
//! configuration subscription over WebSocket. Error taxonomy codes map to
//! stable HTTP statuses with the machine-readable code in the body.

pub mod error;
pub mod file_transfer;
pub mod handlers;
pub mod router;
pub mod server;
pub mod ws;

pub use error::{status_for, ErrorBody, HttpError};
pub use router::router;
pub use server::{serve, HttpServerConfig};
