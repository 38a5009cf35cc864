#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use roomhub::config::{ConflictPolicy, RoomhubConfig};
use roomhub::Roomhub;

/// Router over a fresh module instance.
pub async fn router_with(cfg: RoomhubConfig) -> Router {
    let module = Roomhub::default();
    module.init(cfg).await.expect("init roomhub");
    module
        .register_rest(Router::new())
        .expect("register routes")
}

/// Empty store, conflicts rejected.
pub async fn empty_router() -> Router {
    router_with(RoomhubConfig {
        seed_demo_data: false,
        ..Default::default()
    })
    .await
}

pub async fn seeded_router() -> Router {
    router_with(RoomhubConfig::default()).await
}

pub async fn warn_router() -> Router {
    router_with(RoomhubConfig {
        seed_demo_data: false,
        conflict_policy: ConflictPolicy::Warn,
        ..Default::default()
    })
    .await
}

/// Send one request and decode the JSON answer (`Null` for empty bodies).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
