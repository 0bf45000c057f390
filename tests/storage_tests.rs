use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use net_warden::error::AppError;
use net_warden::storage::{HttpObjectStore, ObjectStore};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type ObjectMap = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// 空きポートにテスト用サーバーを立てて、そのアドレスを返す。
async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("local addr: {e}"));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            panic!("serve: {e}");
        }
    });
    addr
}

/// パス形式 /{bucket}/{key} で読み書きできるインメモリのオブジェクト置き場
fn object_router(map: ObjectMap) -> Router {
    Router::new()
        .route("/:bucket/:key", get(get_object).put(put_object))
        .with_state(map)
}

async fn get_object(
    State(map): State<ObjectMap>,
    Path((bucket, key)): Path<(String, String)>,
) -> Response {
    let map = map.lock().unwrap_or_else(|e| panic!("lock: {e}"));
    match map.get(&format!("{bucket}/{key}")) {
        Some(bytes) => bytes.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_object(
    State(map): State<ObjectMap>,
    Path((bucket, key)): Path<(String, String)>,
    body: Bytes,
) -> StatusCode {
    let mut map = map.lock().unwrap_or_else(|e| panic!("lock: {e}"));
    map.insert(format!("{bucket}/{key}"), body.to_vec());
    StatusCode::OK
}

/// 常に500を返し、受けたリクエスト数を数えるハンドラ
async fn failing_handler(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn failing_router(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/:bucket/:key", any(failing_handler))
        .with_state(hits)
}

fn test_store(addr: SocketAddr, retry_attempts: u32, max_backoff_secs: u64) -> HttpObjectStore {
    HttpObjectStore::new(format!("http://{addr}"), 5, retry_attempts, max_backoff_secs)
        .unwrap_or_else(|e| panic!("client: {e}"))
}

#[tokio::test(flavor = "multi_thread")]
async fn get_absent_object_is_none() {
    let map: ObjectMap = Arc::new(Mutex::new(HashMap::new()));
    let addr = spawn_server(object_router(map)).await;
    let store = test_store(addr, 1, 0);

    // 404はエラーではなく「オブジェクト不在」
    let found = store
        .get("blocklists", "missing.json")
        .await
        .unwrap_or_else(|e| panic!("get: {e}"));
    assert!(found.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn put_then_get_round_trips_through_server() {
    let map: ObjectMap = Arc::new(Mutex::new(HashMap::new()));
    let addr = spawn_server(object_router(map.clone())).await;
    let store = test_store(addr, 2, 0);

    let body = br#"{"203.0.113.5/32": 7}"#.to_vec();
    store
        .put("blocklists", "list.json", body.clone())
        .await
        .unwrap_or_else(|e| panic!("put: {e}"));

    // {endpoint}/{bucket}/{key} のパス形式で格納される
    {
        let map = map.lock().unwrap_or_else(|e| panic!("lock: {e}"));
        assert_eq!(map.get("blocklists/list.json"), Some(&body));
    }

    let found = store
        .get("blocklists", "list.json")
        .await
        .unwrap_or_else(|e| panic!("get: {e}"));
    assert_eq!(found, Some(body));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_gives_up_after_bounded_attempts() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = spawn_server(failing_router(hits.clone())).await;
    let store = test_store(addr, 2, 0);

    let result = store.get("blocklists", "list.json").await;
    match result {
        Err(AppError::StoreUnavailable(msg)) => assert!(msg.contains("2 attempts")),
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
    // 試行はretry_attempts回で打ち止め
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn put_failure_maps_to_persistence_without_trailing_backoff() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = spawn_server(failing_router(hits.clone())).await;
    // バックオフ上限が大きくても、最終試行の後に待ってはいけない
    let store = test_store(addr, 1, 8);

    let started = Instant::now();
    let result = store.put("blocklists", "list.json", b"{}".to_vec()).await;
    let elapsed = started.elapsed();

    match result {
        Err(AppError::Persistence(msg)) => assert!(msg.contains("1 attempts")),
        other => panic!("expected Persistence, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(elapsed < Duration::from_millis(900), "took {elapsed:?}");
}
