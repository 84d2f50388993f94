//! Token-usage aggregation over harvested session logs.
//!
//! The agent records each run as newline-delimited JSON under
//! `.diligent/sessions/`; the collection step copies those files into the
//! output directory's `sessions/` subdirectory. This module reduces them to
//! token totals for the harness result context.
//!
//! Aggregation never fails: a missing directory, unreadable files, malformed
//! lines, and absent usage fields all contribute zero. Partial telemetry must
//! never turn a successful agent run into a failed trial.

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static JSONL_MATCHER: LazyLock<GlobMatcher> =
    LazyLock::new(|| Glob::new("*.jsonl").expect("static glob pattern").compile_matcher());

/// Aggregated token counts for one trial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Total input tokens across assistant messages.
    pub input_tokens: u64,

    /// Total output tokens across assistant messages.
    pub output_tokens: u64,

    /// Combined cache read + write tokens. `None` when no cache tokens were
    /// ever observed, keeping "never used caching" distinguishable from
    /// "used caching, consumed none".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_tokens: Option<u64>,
}

/// One line of a session log.
#[derive(Debug, Deserialize)]
struct SessionEntry {
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
    #[serde(default)]
    message: Option<SessionMessage>,
}

#[derive(Debug, Deserialize)]
struct SessionMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

/// Per-message usage record. Missing counts default to zero; unknown fields
/// are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TokenUsage {
    input_tokens: u64,
    output_tokens: u64,
    cache_read_tokens: u64,
    cache_write_tokens: u64,
}

/// Reduce every `*.jsonl` file in `sessions_dir` to token totals.
///
/// Only entries of type `message` whose nested role is `assistant` count;
/// user/system lines are excluded from token accounting. File order is not
/// significant since the totals are commutative.
pub fn aggregate<P: AsRef<Path>>(sessions_dir: P) -> UsageTotals {
    let sessions_dir = sessions_dir.as_ref();

    let mut totals = UsageTotals::default();
    let mut cache_total: u64 = 0;

    let entries = match fs::read_dir(sessions_dir) {
        Ok(entries) => entries,
        Err(_) => return totals,
    };

    for entry in entries.flatten() {
        if !JSONL_MATCHER.is_match(entry.file_name()) {
            continue;
        }

        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(_) => continue,
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Malformed telemetry must never abort aggregation.
            let Ok(record) = serde_json::from_str::<SessionEntry>(line) else {
                continue;
            };

            if record.entry_type.as_deref() != Some("message") {
                continue;
            }
            let Some(message) = record.message else {
                continue;
            };
            if message.role.as_deref() != Some("assistant") {
                continue;
            }

            let usage = message.usage.unwrap_or_default();
            totals.input_tokens += usage.input_tokens;
            totals.output_tokens += usage.output_tokens;
            cache_total += usage.cache_read_tokens + usage.cache_write_tokens;
        }
    }

    totals.cache_tokens = if cache_total > 0 {
        Some(cache_total)
    } else {
        None
    };
    totals
}
