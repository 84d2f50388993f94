//! Audit event logging for tether.
//!
//! Each adapter command appends one NDJSON line to `events.ndjson` under the
//! output directory, so a trial's artifacts record which adapter actions
//! produced them.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: the adapter action (stage, plan, usage)
//! - `actor`: the invoking user as `user@host`
//! - `details`: freeform object with action-specific details
//!
//! Writing the audit log is best-effort at every call site: commands discard
//! the error because a missing or unwritable log must not fail an otherwise
//! successful adapter operation.

use crate::context::AdapterContext;
use crate::error::{Result, TetherError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;

/// Adapter actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Agent binary resolved and staged
    Stage,
    /// Invocation plan emitted
    Plan,
    /// Usage totals aggregated from session logs
    Usage,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Stage => write!(f, "stage"),
            EventAction::Plan => write!(f, "plan"),
            EventAction::Usage => write!(f, "usage"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now and attributed
    /// to `USER@HOSTNAME`.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| TetherError::UserError(format!("failed to serialize event: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the audit log as one JSON line.
///
/// Creates the output directory and the file if they don't exist. Callers
/// treat a failure here as non-fatal and discard it.
pub fn append_event(ctx: &AdapterContext, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    ctx.ensure_output_dir()?;
    let events_file = ctx.events_file();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            TetherError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        TetherError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn event_serializes_to_single_line() {
        let event = Event::new(EventAction::Stage)
            .with_details(json!({"binary": "/out/diligent-linux-x64"}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"action\":\"stage\""));
        assert!(line.contains("diligent-linux-x64"));
    }

    #[test]
    fn actor_has_user_at_host_shape() {
        let event = Event::new(EventAction::Plan);
        assert!(event.actor.contains('@'));
    }

    #[test]
    fn action_display_matches_serialization() {
        for action in [EventAction::Stage, EventAction::Plan, EventAction::Usage] {
            let serialized = serde_json::to_string(&action).unwrap();
            assert_eq!(serialized, format!("\"{}\"", action));
        }
    }

    #[test]
    fn append_creates_file_and_appends_lines() {
        let temp = TempDir::new().unwrap();
        let ctx = AdapterContext::new(temp.path().join("out"));

        append_event(&ctx, &Event::new(EventAction::Stage)).unwrap();
        append_event(
            &ctx,
            &Event::new(EventAction::Usage).with_details(json!({"input_tokens": 13})),
        )
        .unwrap();

        let content = std::fs::read_to_string(ctx.events_file()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        // Every line parses back as a complete event.
        for line in lines {
            let event: Event = serde_json::from_str(line).unwrap();
            assert!(!event.actor.is_empty());
        }
    }
}
