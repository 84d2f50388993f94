//! Adapter configuration for tether.
//!
//! Configuration merges three sources, lowest to highest precedence:
//!
//! 1. An optional `tether.yaml` file in the invocation directory (or the
//!    path given via `--config`).
//! 2. The ambient environment (`DILIGENT_BINARY_PATH`, `DILIGENT_MODEL`).
//! 3. CLI flags (`--model`, `--binary-path`, `--env KEY=VALUE`).
//!
//! # File Format
//!
//! ```yaml
//! model: "anthropic/claude-x"
//! binary_path: "/opt/agents/diligent-linux-x64"
//! search_roots:
//!   - /
//! environment:
//!   DILIGENT_LOG_LEVEL: "debug"
//! run_timeout_seconds: 600
//! collect_timeout_seconds: 30
//! ```
//!
//! Credentials are never listed here: the invocation builder forwards a fixed
//! allow-list of ambient variables instead (see [`FORWARDED_ENV_VARS`]), so
//! secrets stay out of checked-in config files.

use crate::error::{Result, TetherError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Environment variable holding an explicit binary path override.
pub const BINARY_PATH_ENV: &str = "DILIGENT_BINARY_PATH";

/// Environment variable the harness uses to select a model, optionally
/// qualified as `provider/model`.
pub const MODEL_ENV: &str = "DILIGENT_MODEL";

/// The closed set of ambient credential variables forwarded to the agent.
///
/// Anything not named here is never copied into the sandboxed process,
/// so unrelated host secrets cannot leak through the invocation boundary.
pub const FORWARDED_ENV_VARS: &[&str] = &["ANTHROPIC_API_KEY", "OPENAI_API_KEY"];

/// Default config file name looked up in the invocation directory.
pub const DEFAULT_CONFIG_FILE: &str = "tether.yaml";

/// Default timeout for the agent-run step in seconds.
const DEFAULT_RUN_TIMEOUT_SECONDS: u64 = 600;

/// Default timeout for the log-collection step in seconds.
const DEFAULT_COLLECT_TIMEOUT_SECONDS: u64 = 30;

static ENV_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static env key pattern"));

/// Adapter configuration, loaded from `tether.yaml` and then layered with
/// environment and CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Model identifier, optionally `provider/model`-qualified. The provider
    /// prefix is stripped before the value reaches the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Explicit path to the agent binary. When set, it must exist; a missing
    /// override is a hard configuration error, never a fallback trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<PathBuf>,

    /// Roots the log-collection step scans for session files. Defaults to
    /// `/` to tolerate unknown session-log locations; deployments can scope
    /// this to known candidate roots.
    pub search_roots: Vec<PathBuf>,

    /// Extra environment entries for the agent process. Applied last when
    /// building the overlay, so they win over forwarded credentials.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Timeout for the agent-run step.
    pub run_timeout_seconds: u64,

    /// Timeout for the best-effort log-collection step.
    pub collect_timeout_seconds: u64,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            model: None,
            binary_path: None,
            search_roots: vec![PathBuf::from("/")],
            environment: BTreeMap::new(),
            run_timeout_seconds: DEFAULT_RUN_TIMEOUT_SECONDS,
            collect_timeout_seconds: DEFAULT_COLLECT_TIMEOUT_SECONDS,
            extra: BTreeMap::new(),
        }
    }
}

impl AdapterConfig {
    /// Load config from a YAML file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            TetherError::UserError(format!(
                "failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&content)?;
        Ok(Some(config))
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AdapterConfig = serde_yaml::from_str(yaml)
            .map_err(|e| TetherError::UserError(format!("failed to parse tether.yaml: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validation rules:
    /// - Timeouts must be greater than 0
    /// - At least one search root must be configured
    /// - Extra environment keys must be valid variable names
    pub fn validate(&self) -> Result<()> {
        if self.run_timeout_seconds == 0 {
            return Err(TetherError::UserError(
                "config validation failed: run_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.collect_timeout_seconds == 0 {
            return Err(TetherError::UserError(
                "config validation failed: collect_timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        if self.search_roots.is_empty() {
            return Err(TetherError::UserError(
                "config validation failed: search_roots must not be empty".to_string(),
            ));
        }

        for key in self.environment.keys() {
            if !ENV_KEY_PATTERN.is_match(key) {
                return Err(TetherError::UserError(format!(
                    "config validation failed: '{}' is not a valid environment variable name",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Layer ambient environment overrides on top of file-sourced values.
    ///
    /// `DILIGENT_BINARY_PATH` and `DILIGENT_MODEL` take precedence over the
    /// config file when set.
    pub fn apply_ambient_env(&mut self) {
        if let Ok(path) = std::env::var(BINARY_PATH_ENV)
            && !path.is_empty()
        {
            self.binary_path = Some(PathBuf::from(path));
        }

        if let Ok(model) = std::env::var(MODEL_ENV)
            && !model.is_empty()
        {
            self.model = Some(model);
        }
    }

    /// Layer CLI overrides on top of everything else (highest precedence).
    ///
    /// `env_pairs` are raw `KEY=VALUE` strings from repeated `--env` flags.
    pub fn apply_overrides(
        &mut self,
        model: Option<String>,
        binary_path: Option<PathBuf>,
        env_pairs: &[String],
    ) -> Result<()> {
        if model.is_some() {
            self.model = model;
        }

        if binary_path.is_some() {
            self.binary_path = binary_path;
        }

        for pair in env_pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                TetherError::UserError(format!(
                    "invalid --env entry '{}': expected KEY=VALUE",
                    pair
                ))
            })?;

            if !ENV_KEY_PATTERN.is_match(key) {
                return Err(TetherError::UserError(format!(
                    "invalid --env entry '{}': '{}' is not a valid environment variable name",
                    pair, key
                )));
            }

            self.environment.insert(key.to_string(), value.to_string());
        }

        Ok(())
    }
}
