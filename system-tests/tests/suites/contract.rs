// system-tests/tests/suites/contract.rs
// ============================================================================
// Module: Contract Tests
// Description: End-to-end coverage of the `/api/execute` response contract.
// Purpose: Pin statuses and messages as seen by an HTTP client.
// Dependencies: score-gate-client, helpers
// ============================================================================

//! ## Overview
//! Drives a live gate over HTTP. Runs against a loopback gate by default, or
//! against `SCORE_GATE_SYSTEM_TEST_ENDPOINT` when set.
//! Invariants:
//! - Every response carries both `output` and `error` keys.
//! - Transport failures surface as client errors, never as HTTP statuses.

use std::error::Error;
use std::time::Duration;

use helpers::fixtures::load_cases;
use helpers::harness::allocate_bind_addr;
use helpers::harness::start_gate;
use score_gate_client::CONNECTION_ISSUE_CODE;
use score_gate_client::ClientError;
use score_gate_client::ExecuteClient;
use score_gate_client::ExecuteResponse;
use serde_json::json;

use crate::helpers;

/// Asserts the response status and `error.message`, with `output` null.
fn expect_rejection(
    response: &ExecuteResponse,
    status: u16,
    message: &str,
) -> Result<(), Box<dyn Error>> {
    if response.status != status {
        return Err(format!("expected status {status}, got {}: {}", response.status, response.body)
            .into());
    }
    if response.error_message() != Some(message) {
        return Err(format!("expected error {message:?}, got {}", response.body).into());
    }
    if !response.body.get("output").is_some_and(serde_json::Value::is_null) {
        return Err(format!("expected null output, got {}", response.body).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_cases_match_contract() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let client = gate.client()?;
    let mut failures = Vec::new();
    for case in load_cases()? {
        let response = client.execute_raw(case.request.body_bytes()?).await?;
        if let Err(err) = case.check(&response) {
            failures.push(err);
        }
    }
    gate.shutdown().await;
    if failures.is_empty() { Ok(()) } else { Err(failures.join("\n").into()) }
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_input_is_rejected() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let response = gate.client()?.execute_json(&json!({"input": ""})).await?;
    expect_rejection(&response, 400, "No input provided")?;
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn null_input_is_rejected() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let response = gate.client()?.execute_json(&json!({"input": null})).await?;
    expect_rejection(&response, 400, "Format input invalid")?;
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn bare_string_body_is_rejected() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let response = gate.client()?.execute_json(&json!("Input Invalid data type")).await?;
    expect_rejection(&response, 400, "Data format request invalid")?;
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_input_property_is_rejected() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let response = gate.client()?.execute_json(&json!({})).await?;
    expect_rejection(&response, 400, "Missing requirement in requested object")?;
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_body_is_an_internal_fault() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let response = gate.client()?.execute_raw(None).await?;
    expect_rejection(&response, 500, "Internal server issue")?;
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn million_character_input_is_scored() -> Result<(), Box<dyn Error>> {
    let gate = start_gate().await?;
    let large = "a".repeat(1_000_000);
    let response = gate.client()?.execute_input(&large).await?;
    assert_eq!(response.status, 200, "body: {}", response.body);
    assert!(response.output().is_some());
    assert!(response.body["error"].is_null());
    gate.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_endpoint_reports_connection_issue() -> Result<(), Box<dyn Error>> {
    let addr = allocate_bind_addr()?;
    let client =
        ExecuteClient::with_timeout(&format!("http://{addr}/api/execute/"), Duration::from_secs(2))?;
    let Err(err) = client.execute_input("Some input").await else {
        return Err("expected a connection error from an unbound port".into());
    };
    assert!(matches!(err, ClientError::Connection(_)), "unexpected error: {err}");
    assert_eq!(err.code(), CONNECTION_ISSUE_CODE);
    assert_eq!(err.code(), "Connection issue");
    Ok(())
}
