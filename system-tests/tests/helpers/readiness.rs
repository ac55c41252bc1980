// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness checks for execute endpoints.
// Purpose: Ensure gates are ready without arbitrary sleeps.
// Dependencies: score-gate-client, tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use score_gate_client::ExecuteClient;
use tokio::time::sleep;

/// Polls the execute endpoint until any HTTP response arrives or timeout expires.
pub async fn wait_for_gate_ready(client: &ExecuteClient, timeout: Duration) -> Result<(), String> {
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match client.execute_raw(Some(b"{}".to_vec())).await {
            Ok(_) => return Ok(()),
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!("gate readiness timeout after {attempts} attempts: {err}"));
                }
                sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
