//! Agent binary resolution and staging.
//!
//! The agent is an opaque, pre-built executable. This module locates it with
//! a deterministic fallback order and copies it into the trial output
//! directory so the execution sandbox can run it directly.
//!
//! Resolution order:
//!
//! 1. An explicit override (`DILIGENT_BINARY_PATH`, `--binary-path`, or
//!    `binary_path` in `tether.yaml`). A configured-but-missing path is a
//!    hard configuration error, never a fallback trigger.
//! 2. `dist/<platform binary name>` under the enclosing git repository root.

use crate::config::{AdapterConfig, BINARY_PATH_ENV};
use crate::context::AdapterContext;
use crate::error::{Result, TetherError};
use crate::git;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the agent binary artifact for the current platform.
pub fn platform_binary_name() -> &'static str {
    if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        "diligent-darwin-arm64"
    } else if cfg!(target_os = "macos") {
        "diligent-darwin-x64"
    } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        "diligent-linux-arm64"
    } else {
        "diligent-linux-x64"
    }
}

/// Locate the agent binary.
///
/// # Arguments
///
/// * `config` - The adapter configuration (override path, if any)
/// * `cwd` - Directory the fallback repository search starts from
///
/// # Returns
///
/// * `Ok(PathBuf)` - An existing binary path
/// * `Err(TetherError::ConfigError)` - A configured override does not exist
/// * `Err(TetherError::DiscoveryError)` - No candidate found anywhere
pub fn resolve(config: &AdapterConfig, cwd: &Path) -> Result<PathBuf> {
    if let Some(path) = &config.binary_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(TetherError::ConfigError(format!(
            "configured binary path '{}' does not exist (set via {} or --binary-path)",
            path.display(),
            BINARY_PATH_ENV
        )));
    }

    // Fallback: dist/<name> under the enclosing repository root. Not being
    // inside a repository just means there is no fallback candidate here.
    if let Ok(repo_root) = git::get_repo_root(cwd) {
        let candidate = repo_root.join("dist").join(platform_binary_name());
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(TetherError::DiscoveryError(format!(
        "cannot find the {name} binary. \
         Either set {env} to a built binary, or run `bun run build:linux-x64` \
         in the agent repository to produce dist/{name}.",
        name = platform_binary_name(),
        env = BINARY_PATH_ENV
    )))
}

/// Resolve the binary and copy it into the trial output directory.
///
/// The destination keeps the source's permission bits: the sandbox executes
/// the staged file in place, so the execute bits must survive the copy.
pub fn stage(config: &AdapterConfig, ctx: &AdapterContext, cwd: &Path) -> Result<PathBuf> {
    let source = resolve(config, cwd)?;

    ctx.ensure_output_dir()?;
    let dest = ctx.staged_binary_path();

    let metadata = fs::metadata(&source).map_err(|e| {
        TetherError::UserError(format!(
            "failed to read metadata for '{}': {}",
            source.display(),
            e
        ))
    })?;

    fs::copy(&source, &dest).map_err(|e| {
        TetherError::UserError(format!(
            "failed to stage binary '{}' to '{}': {}",
            source.display(),
            dest.display(),
            e
        ))
    })?;

    fs::set_permissions(&dest, metadata.permissions()).map_err(|e| {
        TetherError::UserError(format!(
            "failed to set permissions on staged binary '{}': {}",
            dest.display(),
            e
        ))
    })?;

    Ok(dest)
}
