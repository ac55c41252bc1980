// crates/score-gate-config/src/config.rs
// ============================================================================
// Module: Score Gate Configuration
// Description: Configuration loading and validation for the Score Gate server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, thiserror, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and no file exists at the default location, the
//! built-in defaults are used (loopback bind, `length` engine). An explicit
//! path that cannot be read fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "score-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SCORE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address for the HTTP server.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:3000";
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
/// Maximum allowed request body size in bytes.
pub const MAX_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;
/// Default character count at which the length engine saturates.
pub(crate) const DEFAULT_SATURATION_CHARS: usize = 2_000;
/// Default external engine request timeout in milliseconds.
pub(crate) const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 10_000;
/// Minimum external engine request timeout in milliseconds.
pub const MIN_ENGINE_TIMEOUT_MS: u64 = 100;
/// Maximum external engine request timeout in milliseconds.
pub const MAX_ENGINE_TIMEOUT_MS: u64 = 60_000;
/// Default maximum external engine response size in bytes.
pub(crate) const DEFAULT_ENGINE_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Maximum allowed external engine response size in bytes.
pub const MAX_ENGINE_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Maximum length of an external engine URL.
pub(crate) const MAX_ENGINE_URL_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Score Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreGateConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Scoring engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ScoreGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, source) = resolve_path(path)?;
        validate_path(&resolved)?;
        if source == PathSource::Default && !resolved.exists() {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration from raw TOML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the payload is too large, not UTF-8,
    /// malformed, or invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes exceeds max of {MAX_MAX_BODY_BYTES}"
            )));
        }
        self.audit.validate()
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is empty or malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self.bind.trim();
        if bind.is_empty() {
            return Err(ConfigError::Invalid("server.bind must be non-empty".to_string()));
        }
        bind.parse().map_err(|_| ConfigError::Invalid("invalid server.bind address".to_string()))
    }
}

/// Audit logging configuration for execute requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

/// Scoring engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    /// Built-in length heuristic returning a structured score.
    #[default]
    Length,
    /// Built-in engine returning a scalar character count.
    Echo,
    /// External engine reached over HTTP.
    Http,
}

impl EngineType {
    /// Returns the config label for the engine type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Echo => "echo",
            Self::Http => "http",
        }
    }
}

/// Scoring engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Engine selection.
    #[serde(rename = "type", default)]
    pub engine_type: EngineType,
    /// Character count at which the length engine reports the maximum score.
    #[serde(default = "default_saturation_chars")]
    pub saturation_chars: usize,
    /// External engine endpoint (http engine only).
    #[serde(default)]
    pub url: Option<String>,
    /// External engine request timeout in milliseconds.
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum external engine response size in bytes.
    #[serde(default = "default_engine_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext `http://` engine URLs.
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_type: EngineType::default(),
            saturation_chars: default_saturation_chars(),
            url: None,
            timeout_ms: default_engine_timeout_ms(),
            max_response_bytes: default_engine_max_response_bytes(),
            allow_http: false,
        }
    }
}

impl EngineConfig {
    /// Validates engine configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.saturation_chars == 0 {
            return Err(ConfigError::Invalid(
                "engine.saturation_chars must be greater than zero".to_string(),
            ));
        }
        if !(MIN_ENGINE_TIMEOUT_MS ..= MAX_ENGINE_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "engine.timeout_ms must be between {MIN_ENGINE_TIMEOUT_MS} and \
                 {MAX_ENGINE_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_ENGINE_MAX_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "engine.max_response_bytes must be between 1 and {MAX_ENGINE_MAX_RESPONSE_BYTES}"
            )));
        }
        match self.engine_type {
            EngineType::Http => {
                let url = self.url.as_deref().map(str::trim).unwrap_or_default();
                if url.is_empty() {
                    return Err(ConfigError::Invalid("http engine requires engine.url".to_string()));
                }
                parse_engine_url(url, self.allow_http).map(|_| ())
            }
            EngineType::Length | EngineType::Echo => {
                if self.url.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "engine.url is only valid for http engine (got {})",
                        self.engine_type.as_str()
                    )));
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Where a resolved config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathSource {
    /// Explicit path argument.
    Explicit,
    /// `SCORE_GATE_CONFIG` environment variable.
    Env,
    /// Built-in default filename.
    Default,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, PathSource), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), PathSource::Explicit));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), PathSource::Env));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), PathSource::Default))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses an external engine URL and applies the scheme, credential, and
/// host policy shared by config validation and the http engine.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the URL is malformed or violates
/// the policy.
pub fn parse_engine_url(raw: &str, allow_http: bool) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.len() > MAX_ENGINE_URL_LENGTH {
        return Err(ConfigError::Invalid("engine.url exceeds max length".to_string()));
    }
    let url = Url::parse(raw).map_err(|err| match err {
        url::ParseError::EmptyHost => ConfigError::Invalid("engine.url host required".to_string()),
        other => ConfigError::Invalid(format!("engine.url is not a valid url: {other}")),
    })?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(
                "engine.url uses http:// without engine.allow_http".to_string(),
            ));
        }
        _ => return Err(ConfigError::Invalid("engine.url must use http or https".to_string())),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid("engine.url credentials are not allowed".to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Invalid("engine.url host required".to_string()));
    }
    Ok(url)
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Audit logging is enabled unless explicitly disabled.
const fn default_audit_enabled() -> bool {
    true
}

/// Default length engine saturation.
const fn default_saturation_chars() -> usize {
    DEFAULT_SATURATION_CHARS
}

/// Default external engine timeout.
const fn default_engine_timeout_ms() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_MS
}

/// Default external engine response limit.
const fn default_engine_max_response_bytes() -> usize {
    DEFAULT_ENGINE_MAX_RESPONSE_BYTES
}
