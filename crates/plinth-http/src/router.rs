//! Route table for the wire API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use plinth_runtime::RuntimeApi;

use crate::{file_transfer, handlers, ws};

/// Build the full wire surface over one runtime core.
pub fn router(api: Arc<RuntimeApi>) -> Router {
    Router::new()
        .route("/v1/hello", post(handlers::say_hello))
        .route("/v1/invoke", post(handlers::invoke_service))
        .route("/v1/configuration/get", post(handlers::get_configuration))
        .route("/v1/configuration/save", post(handlers::save_configuration))
        .route(
            "/v1/configuration/delete",
            post(handlers::delete_configuration),
        )
        .route("/v1/configuration/subscribe", get(ws::subscribe_configuration))
        .route("/v1/publish", post(handlers::publish_event))
        .route("/v1/state/get", post(handlers::get_state))
        .route("/v1/state/bulk-get", post(handlers::get_bulk_state))
        .route("/v1/state/save", post(handlers::save_state))
        .route("/v1/state/delete", post(handlers::delete_state))
        .route("/v1/state/bulk-delete", post(handlers::delete_bulk_state))
        .route(
            "/v1/state/transaction",
            post(handlers::execute_state_transaction),
        )
        .route("/v1/file/get", post(file_transfer::get_file))
        .route("/v1/file/put", post(file_transfer::put_file))
        .route("/v1/file/list", post(handlers::list_file))
        .route("/v1/file/delete", post(handlers::del_file))
        .route("/v1/file/meta", post(handlers::get_file_meta))
        .route("/v1/lock/try-lock", post(handlers::try_lock))
        .route("/v1/lock/unlock", post(handlers::unlock))
        .route("/v1/sequencer/next-id", post(handlers::get_next_id))
        .route("/v1/binding/invoke", post(handlers::invoke_binding))
        .route("/v1/secret/get", post(handlers::get_secret))
        .route("/v1/secret/bulk-get", post(handlers::get_bulk_secret))
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}
