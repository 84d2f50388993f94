//! Environment overlay for the agent process.
//!
//! The overlay is assembled in three layers, later layers winning on key
//! collision:
//!
//! 1. Forwarded credentials: the fixed allow-list in
//!    [`FORWARDED_ENV_VARS`](crate::config::FORWARDED_ENV_VARS), checked
//!    against presence in the ambient environment. Never a wildcard copy of
//!    the host environment.
//! 2. The derived model variable, with any `provider/` qualifier stripped.
//! 3. Caller-supplied extra entries from config and `--env` flags.

use crate::config::{AdapterConfig, FORWARDED_ENV_VARS, MODEL_ENV};
use std::collections::BTreeMap;

/// Strip the provider qualifier from a `provider/model` identifier.
///
/// The harness names models as `provider/model`; the agent wants only the
/// model id. Everything up to and including the first `/` is removed. An
/// unqualified identifier passes through unchanged.
pub fn agent_model_id(model: &str) -> &str {
    match model.split_once('/') {
        Some((_, rest)) => rest,
        None => model,
    }
}

/// Build the environment overlay for the agent-run step.
pub fn build_overlay(config: &AdapterConfig) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    for key in FORWARDED_ENV_VARS {
        if let Ok(value) = std::env::var(key) {
            env.insert((*key).to_string(), value);
        }
    }

    if let Some(model) = &config.model {
        env.insert(MODEL_ENV.to_string(), agent_model_id(model).to_string());
    }

    // Caller-supplied entries last: they win over forwarded credentials.
    for (key, value) in &config.environment {
        env.insert(key.clone(), value.clone());
    }

    env
}
