//! Wire-level tests driving the router with in-memory components.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use plinth_http::router;
use plinth_runtime::RuntimeApi;
use plinth_testing::{InMemoryFileStore, InMemoryLockStore, InMemoryStateStore, RecordingPubSub};

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn state_round_trip_over_the_wire() {
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_state_store("s", Arc::new(InMemoryStateStore::new()))
            .build(),
    );
    let app = router(api);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/v1/state/save",
            json!({"storeName": "s", "states": [{"key": "k", "value": [1]}]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/v1/state/get",
            json!({"storeName": "s", "key": "k"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["data"], json!([1]));
}

#[tokio::test]
async fn unknown_pubsub_is_a_bad_request_naming_the_store() {
    let api = Arc::new(RuntimeApi::builder("app").build());
    let resp = router(api)
        .oneshot(json_request(
            "/v1/publish",
            json!({"pubsubName": "p", "topic": "t", "data": [120]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert!(body["message"].as_str().unwrap().contains("p"));
}

#[tokio::test]
async fn publish_reaches_the_component() {
    let pubsub = Arc::new(RecordingPubSub::new());
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_pubsub("p", pubsub.clone())
            .build(),
    );
    let resp = router(api)
        .oneshot(json_request(
            "/v1/publish",
            json!({"pubsubName": "p", "topic": "t", "data": [120], "dataContentType": "text/plain"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(pubsub.publish_count(), 1);
}

#[tokio::test]
async fn non_positive_expire_is_rejected() {
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_lock_store("L", Arc::new(InMemoryLockStore::new()))
            .build(),
    );
    let resp = router(api)
        .oneshot(json_request(
            "/v1/lock/try-lock",
            json!({"storeName": "L", "resourceId": "r", "lockOwner": "o", "expire": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_lock_stores_fail_the_precondition() {
    let api = Arc::new(RuntimeApi::builder("app").build());
    let resp = router(api)
        .oneshot(json_request(
            "/v1/lock/try-lock",
            json!({"storeName": "L", "resourceId": "r", "lockOwner": "o", "expire": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["code"], "FAILED_PRECONDITION");
}

#[tokio::test]
async fn file_round_trip_over_streamed_bodies() {
    let store = Arc::new(InMemoryFileStore::new());
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_file_store("fs", store.clone())
            .build(),
    );
    let app = router(api);

    let payload = b"streamed file contents".to_vec();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/file/put?storeName=fs&name=doc.txt")
                .header("x-plinth-meta-owner", "alice")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.contents("doc.txt").unwrap(), payload);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/v1/file/get",
            json!({"storeName": "fs", "name": "doc.txt"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn missing_file_meta_is_not_found() {
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_file_store("fs", Arc::new(InMemoryFileStore::new()))
            .build(),
    );
    let resp = router(api)
        .oneshot(json_request(
            "/v1/file/meta",
            json!({"request": {"storeName": "fs", "name": "ghost.txt"}}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn etag_conflicts_surface_as_conflict() {
    let api = Arc::new(
        RuntimeApi::builder("app")
            .with_state_store("s", Arc::new(InMemoryStateStore::new()))
            .build(),
    );
    let app = router(api);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/v1/state/save",
            json!({"storeName": "s", "states": [{"key": "k", "value": [1]}]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/v1/state/save",
            json!({"storeName": "s", "states": [{"key": "k", "value": [2], "etag": "41"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp.into_body()).await;
    assert_eq!(body["code"], "ABORTED");
}
