//! Output-directory layout for one harness trial.
//!
//! The harness mounts a single output directory into the sandbox. Everything
//! the adapter produces lives under it: the staged agent binary, the harvested
//! `sessions/` logs, and the audit event log. This module owns those path
//! derivations so commands never assemble them ad hoc.

use crate::binary;
use crate::error::{Result, TetherError};
use std::fs;
use std::path::PathBuf;

/// Default output directory relative to the invocation directory.
pub const DEFAULT_OUTPUT_DIR: &str = "agent-logs";

/// Subdirectory harvested session logs are copied into.
pub const SESSIONS_DIR_NAME: &str = "sessions";

/// Audit event log file name.
const EVENTS_FILE_NAME: &str = "events.ndjson";

/// Resolved paths for one adapter run.
#[derive(Debug, Clone)]
pub struct AdapterContext {
    /// The well-known output directory mounted for the trial.
    pub output_dir: PathBuf,
}

impl AdapterContext {
    /// Create a context rooted at the given output directory.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Destination path for the staged agent binary.
    ///
    /// The sandbox executes this file directly, so staging must leave it
    /// executable.
    pub fn staged_binary_path(&self) -> PathBuf {
        self.output_dir.join(binary::platform_binary_name())
    }

    /// Directory the log-collection step copies `*.jsonl` session files into.
    pub fn sessions_dir(&self) -> PathBuf {
        self.output_dir.join(SESSIONS_DIR_NAME)
    }

    /// Path of the append-only audit event log.
    pub fn events_file(&self) -> PathBuf {
        self.output_dir.join(EVENTS_FILE_NAME)
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            TetherError::UserError(format!(
                "failed to create output directory '{}': {}",
                self.output_dir.display(),
                e
            ))
        })
    }
}
