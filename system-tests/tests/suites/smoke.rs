// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: Liveness, routing, limits, and audit checks on a spawned gate.
// Purpose: Catch wiring regressions between config, server, and engine.
// Dependencies: score-gate-config, score-gate-server, reqwest, tempfile, helpers
// ============================================================================

//! ## Overview
//! These tests always spawn their own gate on loopback, since they depend on
//! server configuration the harness controls.

use std::error::Error;

use helpers::fixtures::check_score_shape;
use helpers::fixtures::load_echo_cases;
use helpers::harness::allocate_bind_addr;
use helpers::harness::base_gate_config;
use helpers::harness::spawn_gate_server;
use score_gate_config::EngineType;
use score_gate_server::PAYLOAD_TOO_LARGE_MESSAGE;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

use crate::helpers;

/// Issues a GET and decodes the JSON body.
async fn get_json(url: &str) -> Result<(u16, Value), Box<dyn Error>> {
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status().as_u16();
    let body = serde_json::from_slice(&response.bytes().await?)?;
    Ok((status, body))
}

/// Issues a POST with a JSON body and decodes the JSON reply.
async fn post_json(url: &str, payload: &Value) -> Result<(u16, Value), Box<dyn Error>> {
    let response = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(serde_json::to_vec(payload)?)
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = serde_json::from_slice(&response.bytes().await?)?;
    Ok((status, body))
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() -> Result<(), Box<dyn Error>> {
    let gate = spawn_gate_server(base_gate_config(allocate_bind_addr()?)).await?;
    let url = gate.health_url().ok_or("spawned gate has a health url")?;
    let (status, body) = get_json(&url).await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn both_execute_paths_are_served() -> Result<(), Box<dyn Error>> {
    let gate = spawn_gate_server(base_gate_config(allocate_bind_addr()?)).await?;
    let base = gate.base_url().ok_or("spawned gate has a base url")?.to_string();
    for path in ["/api/execute", "/api/execute/"] {
        let (status, body) = post_json(&format!("{base}{path}"), &json!({"input": "hi"})).await?;
        assert_eq!(status, 200, "{path}: {body}");
        check_score_shape(&body["output"])?;
    }
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_get_their_own_scores() -> Result<(), Box<dyn Error>> {
    let gate = spawn_gate_server(base_gate_config(allocate_bind_addr()?)).await?;
    let client = gate.client()?;
    let mut tasks = Vec::new();
    for len in 1..=16_usize {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let input = "x".repeat(len);
            client.execute_input(&input).await.map(|response| (len, response))
        }));
    }
    for task in tasks {
        let (len, response) = task.await??;
        assert_eq!(response.status, 200);
        let output = response.output().ok_or("missing output")?;
        assert_eq!(output["points"]["characters"], json!(len));
    }
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn echo_engine_fixture_cases_return_scalars() -> Result<(), Box<dyn Error>> {
    let mut config = base_gate_config(allocate_bind_addr()?);
    config.engine.engine_type = EngineType::Echo;
    let gate = spawn_gate_server(config).await?;
    let client = gate.client()?;
    let mut failures = Vec::new();
    for case in load_echo_cases()? {
        let response = client.execute_raw(case.request.body_bytes()?).await?;
        if let Err(err) = case.check(&response) {
            failures.push(err);
        }
    }
    gate.shutdown().await;
    if failures.is_empty() { Ok(()) } else { Err(failures.join("\n").into()) }
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_body_is_refused_before_the_gate() -> Result<(), Box<dyn Error>> {
    let mut config = base_gate_config(allocate_bind_addr()?);
    config.server.max_body_bytes = 1024;
    let gate = spawn_gate_server(config).await?;
    let client = gate.client()?;

    let response = client.execute_input(&"a".repeat(4096)).await?;
    assert_eq!(response.status, 413);
    assert_eq!(response.error_message(), Some(PAYLOAD_TOO_LARGE_MESSAGE));

    let response = client.execute_input("fits").await?;
    assert_eq!(response.status, 200);
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn audit_file_records_each_request() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let audit_path = temp_dir.path().join("audit.jsonl");
    let mut config = base_gate_config(allocate_bind_addr()?);
    config.server.audit.enabled = true;
    config.server.audit.path = Some(audit_path.display().to_string());
    let gate = spawn_gate_server(config).await?;
    let client = gate.client()?;

    client.execute_input("audited").await?;
    client.execute_json(&json!({})).await?;
    client.execute_raw(None).await?;
    gate.shutdown().await;

    let contents = std::fs::read_to_string(&audit_path)?;
    let events = contents
        .lines()
        .map(serde_json::from_str::<Value>)
        .collect::<Result<Vec<_>, _>>()?;
    // The first event is the readiness check.
    let tail: Vec<_> = events.iter().rev().take(3).rev().collect();
    assert_eq!(tail.len(), 3);
    let statuses: Vec<_> = tail.iter().map(|event| event["status"].clone()).collect();
    assert_eq!(statuses, vec![json!(200), json!(400), json!(500)]);
    let outcomes: Vec<_> = tail.iter().map(|event| event["outcome"].clone()).collect();
    assert_eq!(outcomes, vec![json!("accepted"), json!("rejected"), json!("internal_fault")]);
    for event in &events {
        assert_eq!(event["event"], json!("execute_request"));
        assert_eq!(event["peer_ip"], json!("127.0.0.1"));
        assert!(!event.to_string().contains("audited"), "audit leaked input: {event}");
    }
    Ok(())
}
