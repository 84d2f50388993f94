//! Executable step records handed to the harness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ordered unit of execution in an invocation plan.
///
/// The adapter never executes steps itself; the harness runs them in
/// sequence inside the sandbox and enforces each step's timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationStep {
    /// Shell command line to execute.
    pub command: String,

    /// Environment entries for the process. Empty maps are omitted from the
    /// serialized plan.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Maximum execution time in seconds before the harness kills the step.
    pub timeout_secs: u64,
}
