//! CLI argument parsing for tether.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::context::DEFAULT_OUTPUT_DIR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tether: harness adapter for dispatching a prebuilt coding-agent binary.
///
/// The adapter stages the agent binary into the trial output directory,
/// emits the invocation plan the harness executes inside the sandbox, and
/// aggregates token usage from the harvested session logs afterwards.
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output directory mounted for the trial.
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Path to an adapter config file (default: ./tether.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier, optionally provider-qualified (e.g. "anthropic/claude-x").
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Explicit path to the agent binary (overrides discovery).
    #[arg(long, global = true)]
    pub binary_path: Option<PathBuf>,

    /// Extra environment entry for the agent process (repeatable).
    #[arg(long = "env", global = true, value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for tether.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the agent binary and stage it into the output directory.
    ///
    /// Prints the staged path on success.
    Stage,

    /// Build the invocation plan for an instruction.
    ///
    /// Prints the ordered steps as a JSON array; the harness must execute
    /// them in that order.
    Plan(PlanArgs),

    /// Aggregate token usage from harvested session logs.
    ///
    /// Prints the totals as JSON. Missing logs yield zero totals, never an
    /// error.
    Usage,
}

/// Arguments for the `plan` command.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Natural-language instruction for the agent.
    pub instruction: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stage_with_defaults() {
        let cli = Cli::try_parse_from(["tether", "stage"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(cli.model.is_none());
        assert!(matches!(cli.command, Command::Stage));
    }

    #[test]
    fn parses_plan_with_instruction_and_globals() {
        let cli = Cli::try_parse_from([
            "tether",
            "plan",
            "fix the failing test",
            "--model",
            "anthropic/claude-x",
            "--output-dir",
            "/logs/agent",
            "--env",
            "A=1",
            "--env",
            "B=2",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("anthropic/claude-x"));
        assert_eq!(cli.output_dir, PathBuf::from("/logs/agent"));
        assert_eq!(cli.env, vec!["A=1", "B=2"]);

        match cli.command {
            Command::Plan(args) => assert_eq!(args.instruction, "fix the failing test"),
            other => panic!("expected plan command, got {:?}", other),
        }
    }

    #[test]
    fn plan_requires_instruction() {
        assert!(Cli::try_parse_from(["tether", "plan"]).is_err());
    }

    #[test]
    fn parses_usage_command() {
        let cli = Cli::try_parse_from(["tether", "usage"]).unwrap();
        assert!(matches!(cli.command, Command::Usage));
    }
}
