use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use docket_db::Db;
use docket_files::{LocalStore, UploadPolicy};
use docket_service::LocalService;

/// Build a test router with in-memory SQLite, a temp-dir file store, and the
/// default upload policy.
pub fn test_router() -> Router {
    let db = Db::open_in_memory().unwrap();
    let store = Arc::new(LocalStore::new(tempfile::tempdir().unwrap().keep()));
    crate::routes::build_router(LocalService::new(db), store, UploadPolicy::default())
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
