//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calc_cache::{
    api::create_router,
    cache::{CacheBackend, MemoryCache},
    error::{CacheError, Result},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn memory_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new(
        Duration::from_secs(60),
        Duration::from_secs(1),
    ))
}

fn create_test_app() -> Router {
    create_router(AppState::new(memory_cache()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

/// Backend standing in for an unreachable Redis server.
struct DownCache;

#[async_trait]
impl CacheBackend for DownCache {
    async fn get(&self, _key: &str) -> Option<i64> {
        None
    }
    async fn set_with_ttl(&self, _key: &str, _value: i64) {}
    async fn incr_counter(&self) {}
    async fn counter(&self) -> u64 {
        0
    }
    async fn size(&self) -> usize {
        0
    }
    async fn flush(&self) {}
    async fn ping(&self) -> Result<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }
    async fn close(&self) {}
}

// == Validation Tests ==

#[tokio::test]
async fn test_missing_operands() {
    let app = create_test_app();

    for path in ["/add", "/subtract", "/multiply", "/divide"] {
        let (status, body) = get(&app, path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"err": "x is not provided"}));

        let (status, body) = get(&app, &format!("{}?x=1", path)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"err": "y is not provided"}));
    }
}

#[tokio::test]
async fn test_non_integer_operands() {
    let app = create_test_app();

    for uri in ["/add?x=a&y=1", "/multiply?x=1&y=2.5", "/subtract?x=1&y=%20"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body, json!({"err": "Unsupported data type. Integer only"}));
    }
}

#[tokio::test]
async fn test_repeated_operands_use_first_value() {
    let app = create_test_app();

    let (status, body) = get(&app, "/add?x=1&x=2&y=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"action": "add", "x": 1, "y": 3, "answer": 4, "cached": false})
    );

    let (status, body) = get(&app, "/subtract?x=1&y=3&y=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], -2);

    let (status, body) = get(&app, "/divide?x=4&y=0&y=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"err": "Divide by zero"}));
}

#[tokio::test]
async fn test_divide_by_zero() {
    let cache = memory_cache();
    let app = create_router(AppState::new(cache.clone()));

    let (status, body) = get(&app, "/divide?x=4&y=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"err": "Divide by zero"}));
    assert_eq!(cache.size().await, 0);
}

// == Calculation Tests ==

#[tokio::test]
async fn test_add_commutative_cache() {
    let app = create_test_app();

    let (status, body) = get(&app, "/add?x=1&y=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"action": "add", "x": 1, "y": 3, "answer": 4, "cached": false})
    );

    let (_, body) = get(&app, "/add?x=1&y=3").await;
    assert_eq!(body["cached"], true);

    let (_, body) = get(&app, "/add?x=3&y=1").await;
    assert_eq!(
        body,
        json!({"action": "add", "x": 3, "y": 1, "answer": 4, "cached": true})
    );
}

#[tokio::test]
async fn test_subtract_keeps_order() {
    let app = create_test_app();

    let (_, body) = get(&app, "/subtract?x=1&y=3").await;
    assert_eq!(
        body,
        json!({"action": "subtract", "x": 1, "y": 3, "answer": -2, "cached": false})
    );

    let (_, body) = get(&app, "/subtract?x=3&y=1").await;
    assert_eq!(
        body,
        json!({"action": "subtract", "x": 3, "y": 1, "answer": 2, "cached": false})
    );
}

#[tokio::test]
async fn test_multiply_commutative_cache() {
    let app = create_test_app();

    let (_, body) = get(&app, "/multiply?x=-2&y=7").await;
    assert_eq!(body["answer"], -14);
    assert_eq!(body["cached"], false);

    let (_, body) = get(&app, "/multiply?x=7&y=-2").await;
    assert_eq!(body["answer"], -14);
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn test_divide_truncates() {
    let app = create_test_app();

    let (_, body) = get(&app, "/divide?x=1&y=3").await;
    assert_eq!(body["answer"], 0);

    let (_, body) = get(&app, "/divide?x=4&y=3").await;
    assert_eq!(body["answer"], 1);

    let (_, body) = get(&app, "/divide?x=-7&y=2").await;
    assert_eq!(body["answer"], -3);

    let (_, body) = get(&app, "/divide?x=3&y=4").await;
    assert_eq!(body["answer"], 0);
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn test_unreachable_cache_still_answers() {
    let app = create_router(AppState::new(Arc::new(DownCache)));

    for _ in 0..2 {
        let (status, body) = get(&app, "/add?x=2&y=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], 4);
        assert_eq!(body["cached"], false);
    }
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    get(&app, "/add?x=1&y=3").await;
    get(&app, "/add?x=3&y=1").await;
    get(&app, "/subtract?x=3&y=1").await;

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"], "OK");
    assert_eq!(body["hit"], 1);
    assert_eq!(body["size"], 2);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_endpoint_with_failing_cache() {
    let app = create_router(AppState::new(Arc::new(DownCache)));

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"], "Connection error: connection refused");
    assert!(body.get("hit").is_none());
    assert!(body.get("size").is_none());
}

#[tokio::test]
async fn test_method_not_allowed() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
