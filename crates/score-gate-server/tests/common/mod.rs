// crates/score-gate-server/tests/common/mod.rs
// ============================================================================
// Module: Server Test Helpers
// Description: Engines, sinks, and a loopback harness for server tests.
// ============================================================================

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only helpers.")]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use score_gate_config::ScoreGateConfig;
use score_gate_core::EngineError;
use score_gate_core::ExecuteOutput;
use score_gate_core::ScoringEngine;
use score_gate_core::SharedScoringEngine;
use score_gate_server::AuditSink;
use score_gate_server::EXECUTE_LATENCY_BUCKETS_MS;
use score_gate_server::ExecuteAuditEvent;
use score_gate_server::ExecuteMetricEvent;
use score_gate_server::GateMetrics;
use score_gate_server::GateServer;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Engines
// ============================================================================

/// Engine that always fails, counting calls.
#[derive(Default)]
pub struct FailingEngine {
    /// Number of score calls observed.
    pub calls: AtomicUsize,
}

impl ScoringEngine for FailingEngine {
    fn score(&self, _input: &str) -> Result<ExecuteOutput, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::Failed("model backend exploded at /srv/model.bin".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Engine that records inputs and returns a fixed output.
pub struct RecordingEngine {
    /// Inputs received, in order.
    pub inputs: Mutex<Vec<String>>,
    /// Output returned for every call.
    pub output: Value,
}

impl RecordingEngine {
    /// Creates an engine returning `output`.
    pub fn new(output: Value) -> Self {
        Self {
            inputs: Mutex::new(Vec::new()),
            output,
        }
    }

    /// Returns the recorded inputs.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl ScoringEngine for RecordingEngine {
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError> {
        self.inputs.lock().unwrap().push(input.to_string());
        ExecuteOutput::from_value(self.output.clone())
            .map_err(|err| EngineError::InvalidOutput(err.to_string()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Wraps a shared engine handle for the service.
pub fn shared<E: ScoringEngine + 'static>(engine: &Arc<E>) -> SharedScoringEngine {
    SharedScoringEngine::new(Arc::clone(engine) as Arc<dyn ScoringEngine>)
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events.
    pub events: Mutex<Vec<ExecuteAuditEvent>>,
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &ExecuteAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Metrics sink that keeps request events in memory.
#[derive(Default)]
pub struct MemoryMetrics {
    /// Recorded request events.
    pub requests: Mutex<Vec<ExecuteMetricEvent>>,
    /// Latency observations as `(outcome label, bucket upper bound in ms)`.
    pub latencies: Mutex<Vec<(&'static str, u64)>>,
}

impl GateMetrics for MemoryMetrics {
    fn record_request(&self, event: ExecuteMetricEvent) {
        self.requests.lock().unwrap().push(event);
    }

    fn record_latency(&self, event: ExecuteMetricEvent, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        let bucket = EXECUTE_LATENCY_BUCKETS_MS
            .iter()
            .copied()
            .find(|bound| millis <= *bound)
            .unwrap_or(u64::MAX);
        self.latencies.lock().unwrap().push((event.outcome.as_str(), bucket));
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Default config with audit disabled.
pub fn quiet_config() -> ScoreGateConfig {
    let mut config = ScoreGateConfig::default();
    config.server.audit.enabled = false;
    config
}

/// Running server bound to an ephemeral loopback port.
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:PORT`.
    pub base_url: String,
    /// Server task handle.
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Returns the execute URL with the trailing slash.
    pub fn execute_url(&self) -> String {
        format!("{}/api/execute/", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns the server on `127.0.0.1:0`.
pub async fn spawn(server: GateServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = server.serve_listener(listener).await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        handle,
    }
}

/// Posts raw bytes and returns status plus parsed JSON body.
pub async fn post_raw(url: &str, body: Option<Vec<u8>>) -> (u16, Value) {
    let client = reqwest::Client::new();
    let mut request = client.post(url).header("content-type", "application/json");
    if let Some(body) = body {
        request = request.body(body);
    }
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}
