//! Live content store against local stand-in pinning service and gateways.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chainmuse_core::{AdapterMode, ContentRef};
use chainmuse_error::{ContentError, ContentErrorKind};
use chainmuse_interface::{ContentStore, RetrievalEndpoint};
use chainmuse_storage::{ContentConfig, IpfsContentStore, fetch_with_fallback};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn failing_gateway() -> Router {
    Router::new().route(
        "/ipfs/:cid",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    )
}

fn slow_gateway() -> Router {
    Router::new().route(
        "/ipfs/:cid",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "too late"
        }),
    )
}

fn working_gateway() -> Router {
    Router::new().route(
        "/ipfs/:cid",
        get(|Path(cid): Path<String>| async move { format!("{{\"content\":\"body of {}\"}}", cid) }),
    )
}

fn config(pinning_url: String, gateways: Vec<String>) -> ContentConfig {
    ContentConfig {
        pinning_url,
        jwt: Some("jwt-token".to_string()),
        gateways,
        timeout_secs: 1,
    }
}

#[tokio::test]
async fn test_fetch_falls_through_to_next_gateway() {
    let failing = serve(failing_gateway()).await;
    let slow = serve(slow_gateway()).await;
    let working = serve(working_gateway()).await;

    let store = IpfsContentStore::from_config(&config(
        "http://127.0.0.1:9/unused".to_string(),
        vec![
            format!("{}/ipfs", failing),
            format!("{}/ipfs", slow),
            format!("{}/ipfs/", working),
        ],
    ))
    .expect("store");

    let blob = store
        .fetch(&ContentRef::new("QmStory1"))
        .await
        .expect("third gateway serves content");
    assert_eq!(blob, br#"{"content":"body of QmStory1"}"#);
    assert_eq!(store.mode(), AdapterMode::Live);
}

#[tokio::test]
async fn test_fetch_fails_after_all_gateways() {
    let first = serve(failing_gateway()).await;
    let second = serve(failing_gateway()).await;

    let store = IpfsContentStore::from_config(&config(
        "http://127.0.0.1:9/unused".to_string(),
        vec![format!("{}/ipfs", first), format!("{}/ipfs", second)],
    ))
    .expect("store");

    let err = store
        .fetch(&ContentRef::new("QmGone"))
        .await
        .expect_err("no gateway has it");
    assert_eq!(
        err.kind,
        ContentErrorKind::ContentUnavailable {
            content_ref: "QmGone".to_string(),
            attempts: 2,
        }
    );
}

#[derive(Clone, Default)]
struct Captured {
    auth: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<String>>,
}

#[tokio::test]
async fn test_store_pins_blob_and_returns_hash() {
    let captured = Captured::default();
    let router = Router::new()
        .route(
            "/pinning/pinFileToIPFS",
            post(
                |State(c): State<Captured>, headers: HeaderMap, body: String| async move {
                    *c.auth.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *c.body.lock().unwrap() = body;
                    Json(json!({
                        "IpfsHash": "QmPinned",
                        "PinSize": 42,
                        "Timestamp": "2024-01-01T00:00:00Z"
                    }))
                },
            ),
        )
        .with_state(captured.clone());
    let base = serve(router).await;

    let store = IpfsContentStore::from_config(&config(
        format!("{}/pinning/pinFileToIPFS", base),
        vec![],
    ))
    .expect("store");

    let content_ref = store
        .store(br#"{"name":"Title","content":"Text"}"#)
        .await
        .expect("pinned");

    assert_eq!(content_ref, ContentRef::new("QmPinned"));
    assert_eq!(
        captured.auth.lock().unwrap().as_deref(),
        Some("Bearer jwt-token")
    );
    let body = captured.body.lock().unwrap().clone();
    assert!(body.contains("story-node.json"));
    assert!(body.contains(r#"{"name":"Title","content":"Text"}"#));
}

#[tokio::test]
async fn test_store_failure_never_fabricates_reference() {
    let router = Router::new().route(
        "/pin",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let base = serve(router).await;

    let store = IpfsContentStore::from_config(&config(format!("{}/pin", base), vec![]))
        .expect("store");

    let err = store.store(b"{}").await.expect_err("pinning is down");
    assert!(matches!(err.kind, ContentErrorKind::StoreUnavailable(_)));
}

#[test]
fn test_missing_jwt_is_rejected() {
    let err = IpfsContentStore::from_config(&ContentConfig::default()).expect_err("no jwt");
    assert!(matches!(err.kind, ContentErrorKind::StoreUnavailable(_)));
}

/// Endpoint stub that records how often it was asked.
struct CountingEndpoint {
    name: String,
    calls: AtomicUsize,
    result: Option<&'static [u8]>,
}

impl CountingEndpoint {
    fn new(name: &str, result: Option<&'static [u8]>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
            result,
        })
    }
}

#[async_trait]
impl RetrievalEndpoint for CountingEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, _content_ref: &ContentRef) -> Result<Vec<u8>, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.map(<[u8]>::to_vec).ok_or_else(|| {
            ContentError::new(ContentErrorKind::Endpoint {
                endpoint: self.name.clone(),
                message: "unavailable".to_string(),
            })
        })
    }
}

#[tokio::test]
async fn test_each_endpoint_tried_once_in_order() {
    let first = CountingEndpoint::new("first", None);
    let second = CountingEndpoint::new("second", Some(b"payload"));
    let third = CountingEndpoint::new("third", Some(b"other"));
    let endpoints: Vec<Arc<dyn RetrievalEndpoint>> =
        vec![first.clone(), second.clone(), third.clone()];

    let blob = fetch_with_fallback(&endpoints, &ContentRef::new("Qm1"))
        .await
        .expect("second endpoint answers");

    assert_eq!(blob, b"payload");
    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    assert_eq!(third.calls.load(Ordering::SeqCst), 0);
}
