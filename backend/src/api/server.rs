//! HTTP Server for the pay-gap API.
//!
//! Uploads are analyzed in memory and never stored.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                               |
//! |--------|----------------|-------------------------------------------|
//! | GET    | `/health`      | Health check                              |
//! | POST   | `/api/analyze` | Upload CSV, get JSON analytics            |
//! | POST   | `/api/export`  | Upload CSV, download the analytics CSV    |
//! | GET    | `/api/logs`    | SSE stream for real-time pipeline logs    |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, AnalyzeResponse};
use crate::analytics::{analyze_bytes, AnalysisOptions, AnalyticsReport};
use crate::error::{ServerError, ServerResult};
use crate::export::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE};

type ApiError = (StatusCode, Json<Value>);

/// Build the router with the given analysis options
pub fn router(options: AnalysisOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_upload))
        .route("/api/export", post(export_upload))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(options))
}

/// Start the HTTP server
pub async fn start_server(port: u16, options: AnalysisOptions) -> ServerResult<()> {
    let app = router(options);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Pay-gap server running on http://localhost:{}", port);
    println!("   POST /api/analyze - Upload CSV, JSON analytics");
    println!("   POST /api/export  - Upload CSV, analytics CSV download");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "paygap",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /api/analyze",
            "export": "POST /api/export",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Analyze endpoint
async fn analyze_upload(
    State(options): State<Arc<AnalysisOptions>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let (file_name, report) = analyze_multipart(multipart, &options).await?;
    Ok(Json(AnalyzeResponse::from_report(report, file_name)))
}

/// Export endpoint, answers with a CSV attachment
async fn export_upload(
    State(options): State<Arc<AnalysisOptions>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (_, report) = analyze_multipart(multipart, &options).await?;

    let csv = report.to_csv().map_err(|e| {
        log_error(format!("Export failed: {}", e));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })?;

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_MIME_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

async fn analyze_multipart(
    multipart: Multipart,
    options: &AnalysisOptions,
) -> Result<(Option<String>, AnalyticsReport), ApiError> {
    let (file_name, bytes) = read_upload(multipart).await.map_err(|e| {
        log_error(e.to_string());
        (StatusCode::BAD_REQUEST, Json(error_response(&e.to_string())))
    })?;

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    Ok((file_name, analyze_bytes(&bytes, options)))
}

/// Pull the `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> ServerResult<(Option<String>, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            return Ok((file_name, bytes.to_vec()));
        }
    }

    Err(ServerError::BadRequest("No file provided".to_string()))
}
