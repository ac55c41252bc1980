// crates/score-gate-cli/src/main.rs
// ============================================================================
// Module: Score Gate CLI Entry Point
// Description: Command dispatcher for serving and calling `/api/execute`.
// Purpose: Provide a small CLI for running the gate and probing deployments.
// Dependencies: clap, score-gate-client, score-gate-config, score-gate-server, tokio
// ============================================================================

//! ## Overview
//! `score-gate serve` loads configuration and runs the HTTP server.
//! `score-gate execute` sends one request and prints `{status, body}`; a
//! connection-level failure prints `Connection issue: ...` and exits with 2.
//! `score-gate config validate` loads and validates a config file.


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::ArgGroup;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use score_gate_client::ClientError;
use score_gate_client::ExecuteClient;
use score_gate_client::ExecuteResponse;
use score_gate_config::ScoreGateConfig;
use score_gate_server::GateServer;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default endpoint for `execute`.
const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/execute/";
/// Exit code for HTTP error responses.
const EXIT_HTTP_ERROR: u8 = 1;
/// Exit code for connection-level failures.
const EXIT_CONNECTION_ISSUE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "score-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Score Gate HTTP server.
    Serve(ServeCommand),
    /// Send one request to an execute endpoint.
    Execute(ExecuteCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to a config file (defaults to `SCORE_GATE_CONFIG` or `score-gate.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `execute`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("payload").required(true).args(["input", "body", "no_body"])))]
struct ExecuteCommand {
    /// Execute endpoint URL.
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Input text, sent as `{"input": TEXT}`.
    #[arg(long, value_name = "TEXT")]
    input: Option<String>,
    /// Raw request body, sent exactly as given.
    #[arg(long, value_name = "BODY")]
    body: Option<String>,
    /// Send the request with no body.
    #[arg(long, action = ArgAction::SetTrue)]
    no_body: bool,
    /// Request timeout in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    timeout_ms: u64,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Score Gate configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Path to a config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Request payload selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
    /// `{"input": text}`.
    Input(String),
    /// Raw body bytes.
    Raw(String),
    /// No body.
    Empty,
}

/// JSON document printed by `execute`.
#[derive(Debug, Serialize)]
struct ExecuteReport<'a> {
    /// HTTP status code.
    status: u16,
    /// Response body.
    body: &'a Value,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for consistent reporting.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Convenience alias for CLI results.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("score-gate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    match cli.command {
        Some(Commands::Serve(command)) => command_serve(command).await,
        Some(Commands::Execute(command)) => command_execute(command).await,
        Some(Commands::Config {
            command,
        }) => command_config(command),
        None => Err(CliError::new("no command given; run with --help for usage".to_string())),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = ScoreGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let bind = config.server.bind.clone();
    let engine = config.engine.engine_type.as_str();
    let server = tokio::task::spawn_blocking(move || GateServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("failed to start server: {err}")))?;
    write_stderr_line(&format!("score-gate: listening on {bind} (engine: {engine})"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Execute Command
// ============================================================================

/// Executes the `execute` command.
async fn command_execute(command: ExecuteCommand) -> CliResult<ExitCode> {
    let client = ExecuteClient::with_timeout(
        &command.endpoint,
        Duration::from_millis(command.timeout_ms),
    )
    .map_err(|err| CliError::new(err.to_string()))?;
    let result = match select_payload(&command) {
        Payload::Input(input) => client.execute_input(&input).await,
        Payload::Raw(body) => client.execute_raw(Some(body.into_bytes())).await,
        Payload::Empty => client.execute_raw(None).await,
    };
    match result {
        Ok(response) => {
            write_stdout_line(&render_response(&response)?)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::from(exit_code_for(&response)))
        }
        Err(err @ ClientError::Connection(_)) => {
            write_stderr_line(&err.to_string())
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            Ok(ExitCode::from(EXIT_CONNECTION_ISSUE))
        }
        Err(err) => Err(CliError::new(err.to_string())),
    }
}

/// Resolves the mutually exclusive payload flags.
fn select_payload(command: &ExecuteCommand) -> Payload {
    if let Some(input) = &command.input {
        Payload::Input(input.clone())
    } else if let Some(body) = &command.body {
        Payload::Raw(body.clone())
    } else {
        Payload::Empty
    }
}

/// Renders the `{status, body}` report.
fn render_response(response: &ExecuteResponse) -> CliResult<String> {
    serde_json::to_string_pretty(&ExecuteReport {
        status: response.status,
        body: &response.body,
    })
    .map_err(|err| CliError::new(format!("failed to render response: {err}")))
}

/// Maps an HTTP response to the process exit code.
const fn exit_code_for(response: &ExecuteResponse) -> u8 {
    if response.is_success() { 0 } else { EXIT_HTTP_ERROR }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = ScoreGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
