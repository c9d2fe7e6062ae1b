//! End-to-end tests over a real TCP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use calc_cache::{api::create_router, AppState, Backend, CacheBackend, Config};
use serde_json::Value;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    cache: Arc<dyn CacheBackend>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let backend = Backend::from_config(&Config::default()).await.unwrap();
        let cache: Arc<dyn CacheBackend> = Arc::new(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(AppState::new(cache.clone()));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            cache,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) {
        self.handle.abort();
        self.cache.close().await;
    }
}

#[tokio::test]
async fn test_calculations_over_http() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let first: Value = client
        .get(server.url("/multiply?x=6&y=7"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["answer"], 42);
    assert_eq!(first["cached"], false);

    let second: Value = client
        .get(server.url("/multiply?x=7&y=6"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["answer"], 42);
    assert_eq!(second["cached"], true);

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["cache"], "OK");
    assert_eq!(health["hit"], 1);
    assert_eq!(health["size"], 1);

    server.stop().await;
}

#[tokio::test]
async fn test_validation_over_http() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/divide?x=4&y=0")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["err"], "Divide by zero");

    server.stop().await;
}

#[tokio::test]
async fn test_flush_resets_health_stats() {
    let server = TestServer::start().await;

    reqwest::get(server.url("/add?x=1&y=1")).await.unwrap();
    reqwest::get(server.url("/add?x=1&y=1")).await.unwrap();
    server.cache.flush().await;

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["hit"], 0);
    assert_eq!(health["size"], 0);

    server.stop().await;
}
