use crate::error::AppError;
use crate::list;
use crate::store::BlocklistStore;
use crate::trim::trim;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// リクエストボディの上限 (64 KiB)
const MAX_BODY_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    include_timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct OperationResult {
    result: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            other => {
                error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// ルーターを構築する。/blocklistの3メソッド以外は、パス違いも
/// メソッド違いも同じ404ボディで応答する。
pub fn build_router(store: Arc<BlocklistStore>) -> Router {
    Router::new()
        .route(
            "/blocklist",
            get(get_blocklist)
                .post(post_blocklist)
                .delete(delete_blocklist)
                .fallback(no_match),
        )
        .fallback(no_match)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(store)
}

/// GET /blocklist?include_timestamp={true|false}
/// include_timestampは大文字小文字を区別せず、省略時はfalse。
async fn get_blocklist(
    State(store): State<Arc<BlocklistStore>>,
    Query(params): Query<ListParams>,
) -> Response {
    let include_timestamp = params
        .include_timestamp
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    info!(include_timestamp, "GET /blocklist");

    let snapshot = store.load().await;
    let body = list::render(&snapshot, include_timestamp);
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

/// POST /blocklist — JSON配列の候補を追加し、上限まで切り詰めて保存する。
async fn post_blocklist(
    State(store): State<Arc<BlocklistStore>>,
    body: Bytes,
) -> Result<Json<OperationResult>, AppError> {
    let candidates = parse_candidates(&body)?;
    info!(count = candidates.len(), "POST /blocklist");

    let mut snapshot = store.load().await;
    let report = store.add(&mut snapshot, &candidates, Utc::now().timestamp());
    let snapshot = trim(snapshot, store.max_entries());
    store.save(&snapshot).await?;

    Ok(Json(OperationResult {
        result: report.render(),
    }))
}

/// DELETE /blocklist — JSON配列の候補を取り除いて保存する。
async fn delete_blocklist(
    State(store): State<Arc<BlocklistStore>>,
    body: Bytes,
) -> Result<Json<OperationResult>, AppError> {
    let candidates = parse_candidates(&body)?;
    info!(count = candidates.len(), "DELETE /blocklist");

    let mut snapshot = store.load().await;
    let report = store.delete(&mut snapshot, &candidates);
    store.save(&snapshot).await?;

    Ok(Json(OperationResult {
        result: report.render(),
    }))
}

/// ボディはIP/CIDR文字列のJSON配列のみ受け付ける。
fn parse_candidates(body: &[u8]) -> Result<Vec<String>, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        AppError::InvalidInput(format!("request body must be a JSON array of strings: {e}"))
    })
}

async fn no_match(method: Method, uri: Uri) -> Response {
    warn!("no matching handler for {} {}", uri.path(), method);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "No matching paths or methods".to_string(),
        }),
    )
        .into_response()
}

/// HTTPサーバーを起動し、Ctrl-Cを受けるまで処理を続ける。
pub async fn run_http_server(store: Arc<BlocklistStore>, addr: SocketAddr) -> Result<(), AppError> {
    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("blocklist HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install Ctrl-C handler: {e}");
    }
}
