// crates/score-gate-server/src/server.rs
// ============================================================================
// Module: Gate Server
// Description: axum HTTP server for `/api/execute` and `/health`.
// Purpose: Enforce transport limits and route bodies through the gate.
// Dependencies: score-gate-config, score-gate-engines, axum, http-body-util, tokio
// ============================================================================

//! ## Overview
//! The server reads request bodies as raw bytes so that the intake gate, not
//! the framework, classifies malformed payloads. Bodies above
//! `server.max_body_bytes` are refused with 413 before the gate runs. Engine
//! calls are synchronous and run under `block_in_place` on multi-thread
//! runtimes. The endpoint has no authentication; binding beyond loopback
//! prints a warning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_LENGTH;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use bytes::Bytes;
use http_body_util::LengthLimitError;
use score_gate_config::EngineType;
use score_gate_config::ScoreGateConfig;
use score_gate_config::ServerAuditConfig;
use score_gate_core::SharedScoringEngine;
use score_gate_engines::build_engine;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::audit::AuditSink;
use crate::audit::ExecuteAuditEvent;
use crate::audit::ExecuteAuditEventParams;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::service::ExecuteReply;
use crate::service::ExecuteService;
use crate::telemetry::ExecuteMetricEvent;
use crate::telemetry::GateMetrics;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message returned when a body exceeds the transport limit.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";
/// Execute route.
const EXECUTE_PATH: &str = "/api/execute";
/// Execute route with the trailing slash existing clients use.
const EXECUTE_PATH_SLASH: &str = "/api/execute/";
/// Liveness route.
const HEALTH_PATH: &str = "/health";
/// Envelope sent if the reply envelope cannot be serialized.
const FALLBACK_BODY: &[u8] = br#"{"output":null,"error":{"message":"Internal server issue"}}"#;

// ============================================================================
// SECTION: Gate Server
// ============================================================================

/// Score Gate HTTP server instance.
pub struct GateServer {
    /// Validated configuration.
    config: ScoreGateConfig,
    /// Execute request handler.
    service: ExecuteService,
    /// Audit sink for request events.
    audit: Arc<dyn AuditSink>,
    /// Metrics sink for request events.
    metrics: Arc<dyn GateMetrics>,
}

impl GateServer {
    /// Builds a server and its configured engine.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration or initialization fails.
    pub fn from_config(mut config: ScoreGateConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let engine =
            build_engine(&config.engine).map_err(|err| ServerError::Init(err.to_string()))?;
        Self::with_engine(config, engine)
    }

    /// Builds a server around an existing engine, ignoring `[engine]`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration or audit setup fails.
    pub fn with_engine(
        mut config: ScoreGateConfig,
        engine: SharedScoringEngine,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config.server.audit)?;
        emit_startup_warnings(&config);
        Ok(Self {
            config,
            service: ExecuteService::new(engine),
            audit,
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn GateMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the execute service used by the router.
    #[must_use]
    pub const fn service(&self) -> &ExecuteService {
        &self.service
    }

    /// Builds the axum router.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            service: self.service.clone(),
            max_body_bytes: self.config.server.max_body_bytes,
            audit: Arc::clone(&self.audit),
            metrics: Arc::clone(&self.metrics),
        });
        Router::new()
            .route(EXECUTE_PATH, post(handle_execute))
            .route(EXECUTE_PATH_SLASH, post(handle_execute))
            .route(HEALTH_PATH, get(handle_health))
            .with_state(state)
    }

    /// Binds the configured address and serves until the server fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_listener(listener).await
    }

    /// Serves on an already-bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when serving fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Shared server state for HTTP handlers.
struct ServerState {
    /// Execute request handler.
    service: ExecuteService,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Audit sink for request events.
    audit: Arc<dyn AuditSink>,
    /// Metrics sink for request events.
    metrics: Arc<dyn GateMetrics>,
}

/// Body read failures.
enum BodyReadError {
    /// Body exceeded the limit; carries the declared length when known.
    TooLarge(Option<usize>),
    /// Body stream failed before completion.
    Failed,
}

/// Handles `POST /api/execute`.
async fn handle_execute(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let started = Instant::now();
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let declared = declared_length(request.headers());
    let (reply, request_bytes) =
        match read_body_limited(request.into_body(), declared, state.max_body_bytes).await {
            Ok(bytes) => (execute_with_blocking(&state.service, &bytes), bytes.len()),
            Err(BodyReadError::TooLarge(declared)) => (
                ExecuteReply::payload_too_large(PAYLOAD_TOO_LARGE_MESSAGE),
                declared.unwrap_or(state.max_body_bytes),
            ),
            Err(BodyReadError::Failed) => (
                ExecuteReply::internal_fault("body_read_failed", "request body could not be read"),
                0,
            ),
        };
    let (status, payload) = match serde_json::to_vec(&reply.envelope) {
        Ok(payload) => (reply.status, Bytes::from(payload)),
        Err(_) => (500, Bytes::from_static(FALLBACK_BODY)),
    };
    record_request(&state, &reply, RequestStats {
        peer_ip,
        status,
        request_bytes,
        response_bytes: payload.len(),
        latency: started.elapsed(),
    });
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, HeaderValue::from_static("application/json"))], payload)
        .into_response()
}

/// Handles `GET /health`.
async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Parses the `Content-Length` header when present and well-formed.
fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok())
}

/// Buffers the request body, refusing anything above `max_bytes`.
async fn read_body_limited(
    body: Body,
    declared: Option<usize>,
    max_bytes: usize,
) -> Result<Bytes, BodyReadError> {
    if let Some(len) = declared
        && len > max_bytes
    {
        return Err(BodyReadError::TooLarge(Some(len)));
    }
    axum::body::to_bytes(body, max_bytes)
        .await
        .map_err(|err| classify_read_error(err, declared))
}

/// Separates limit overruns from broken body streams.
fn classify_read_error(err: axum::Error, declared: Option<usize>) -> BodyReadError {
    if err.into_inner().is::<LengthLimitError>() {
        BodyReadError::TooLarge(declared)
    } else {
        BodyReadError::Failed
    }
}

/// Runs the service, shifting to a blocking context when available.
fn execute_with_blocking(service: &ExecuteService, body: &[u8]) -> ExecuteReply {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| service.execute(body))
        }
        _ => service.execute(body),
    }
}

/// Per-request measurements for audit and metrics.
struct RequestStats {
    /// Peer IP address if known.
    peer_ip: Option<String>,
    /// HTTP status sent.
    status: u16,
    /// Request body size in bytes.
    request_bytes: usize,
    /// Response body size in bytes.
    response_bytes: usize,
    /// Handling latency.
    latency: Duration,
}

/// Emits the audit and metrics events for one request.
fn record_request(state: &ServerState, reply: &ExecuteReply, stats: RequestStats) {
    let event = ExecuteMetricEvent {
        outcome: reply.outcome.label(),
        status: stats.status,
        error_kind: reply.outcome.error_kind(),
        request_bytes: stats.request_bytes,
        response_bytes: stats.response_bytes,
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, stats.latency);
    state.audit.record(&ExecuteAuditEvent::new(ExecuteAuditEventParams {
        peer_ip: stats.peer_ip,
        engine: state.service.engine_name(),
        outcome: reply.outcome.label(),
        status: stats.status,
        error_kind: reply.outcome.error_kind(),
        request_bytes: stats.request_bytes,
        response_bytes: stats.response_bytes,
        latency_ms: stats.latency.as_millis(),
        detail: reply.outcome.detail().map(str::to_string),
    }));
}

// ============================================================================
// SECTION: Setup Helpers
// ============================================================================

/// Builds the configured audit sink.
fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path.trim()))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Warns about deployments that expose input beyond the local host.
fn emit_startup_warnings(config: &ScoreGateConfig) {
    if let Ok(addr) = config.server.bind_addr()
        && !addr.ip().is_loopback()
    {
        let _ = writeln!(
            std::io::stderr(),
            "score-gate: WARNING: listening on non-loopback address {addr}; /api/execute has no \
             authentication"
        );
    }
    if config.engine.engine_type == EngineType::Http && config.engine.allow_http {
        let _ = writeln!(
            std::io::stderr(),
            "score-gate: WARNING: engine.allow_http is set; input is forwarded over cleartext http"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
