//! Invocation plan construction.
//!
//! Turns a free-form instruction plus the resolved configuration into the
//! ordered steps the harness executes inside the sandbox:
//!
//! 1. **Agent run**: invokes the staged binary with the shell-escaped
//!    instruction and the credential/model environment overlay.
//! 2. **Log collection**: best-effort harvest of `*.jsonl` session logs
//!    into the output directory's `sessions/` subdirectory.
//!
//! The builder performs no execution itself and the step order is
//! significant: session logs only exist after the run completes, so the
//! caller must execute the steps in the order returned.

mod overlay;
mod step;

pub use overlay::{agent_model_id, build_overlay};
pub use step::InvocationStep;

use crate::config::AdapterConfig;
use crate::context::AdapterContext;
use std::collections::BTreeMap;

/// Path glob the collection step matches against candidate session logs.
///
/// The agent writes sessions under `{cwd}/.diligent/sessions/`, but its
/// working directory inside the sandbox is not known ahead of time, so the
/// pattern is matched across each configured search root.
pub const SESSION_LOG_GLOB: &str = "*/.diligent/sessions/*.jsonl";

/// Build the two-step invocation plan for an instruction.
pub fn build_steps(
    config: &AdapterConfig,
    ctx: &AdapterContext,
    instruction: &str,
) -> Vec<InvocationStep> {
    vec![run_step(config, ctx, instruction), collect_step(config, ctx)]
}

/// The agent-run step.
///
/// The instruction is shell-escaped so it reaches the agent as a single
/// `--prompt` argument regardless of embedded whitespace or quoting.
fn run_step(config: &AdapterConfig, ctx: &AdapterContext, instruction: &str) -> InvocationStep {
    let binary = ctx.staged_binary_path();
    let command = format!(
        "{} --prompt {}",
        shell_words::quote(&binary.to_string_lossy()),
        shell_words::quote(instruction)
    );

    InvocationStep {
        command,
        env: build_overlay(config),
        timeout_secs: config.run_timeout_seconds,
    }
}

/// The log-collection step.
///
/// Scans each configured search root for session logs and copies matches
/// into `sessions/` under the output directory. Scan errors go to /dev/null
/// and the trailing `true` forces a zero exit: missing or unreadable session
/// logs must never fail the trial.
fn collect_step(config: &AdapterConfig, ctx: &AdapterContext) -> InvocationStep {
    let sessions = ctx.sessions_dir();
    let sessions_quoted = shell_words::quote(&sessions.to_string_lossy()).into_owned();

    let scans: Vec<String> = config
        .search_roots
        .iter()
        .map(|root| {
            format!(
                "find {} -path '{}' -exec cp {{}} {}/ \\; 2>/dev/null",
                shell_words::quote(&root.to_string_lossy()),
                SESSION_LOG_GLOB,
                sessions_quoted
            )
        })
        .collect();

    InvocationStep {
        command: format!(
            "mkdir -p {} && {}; true",
            sessions_quoted,
            scans.join("; ")
        ),
        env: BTreeMap::new(),
        timeout_secs: config.collect_timeout_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    fn test_context() -> AdapterContext {
        AdapterContext::new(PathBuf::from("/logs/agent"))
    }

    #[test]
    #[serial]
    fn plan_has_run_then_collect() {
        let config = AdapterConfig::default();
        let steps = build_steps(&config, &test_context(), "fix the bug");

        assert_eq!(steps.len(), 2);
        assert!(steps[0].command.contains("--prompt"));
        assert!(steps[1].command.contains("find"));
        assert_eq!(steps[0].timeout_secs, 600);
        assert_eq!(steps[1].timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn timeout_overrides_reach_the_steps() {
        let config = AdapterConfig {
            run_timeout_seconds: 900,
            collect_timeout_seconds: 10,
            ..Default::default()
        };
        let steps = build_steps(&config, &test_context(), "task");

        assert_eq!(steps[0].timeout_secs, 900);
        assert_eq!(steps[1].timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn instruction_survives_shell_tokenization() {
        let instruction = r#"say "hello"; echo $HOME 'and' more"#;
        let steps = build_steps(&AdapterConfig::default(), &test_context(), instruction);

        let args = shell_words::split(&steps[0].command).unwrap();
        assert_eq!(args.len(), 3, "binary, --prompt, instruction");
        assert_eq!(args[1], "--prompt");
        assert_eq!(args[2], instruction);
    }

    #[test]
    #[serial]
    fn plain_instruction_stays_single_argument() {
        let steps = build_steps(
            &AdapterConfig::default(),
            &test_context(),
            "update the README with usage notes",
        );

        let args = shell_words::split(&steps[0].command).unwrap();
        assert_eq!(args[2], "update the README with usage notes");
    }

    #[test]
    #[serial]
    fn run_command_invokes_staged_binary() {
        let ctx = test_context();
        let steps = build_steps(&AdapterConfig::default(), &ctx, "task");

        let args = shell_words::split(&steps[0].command).unwrap();
        assert_eq!(args[0], ctx.staged_binary_path().to_string_lossy());
    }

    #[test]
    #[serial]
    fn collect_step_has_expected_command_shape() {
        let steps = build_steps(&AdapterConfig::default(), &test_context(), "task");

        assert_eq!(
            steps[1].command,
            "mkdir -p /logs/agent/sessions && \
             find / -path '*/.diligent/sessions/*.jsonl' \
             -exec cp {} /logs/agent/sessions/ \\; 2>/dev/null; true"
        );
        assert!(steps[1].env.is_empty());
    }

    #[test]
    #[serial]
    fn collect_step_scans_each_configured_root() {
        let config = AdapterConfig {
            search_roots: vec![PathBuf::from("/workspace"), PathBuf::from("/tmp")],
            ..Default::default()
        };
        let steps = build_steps(&config, &test_context(), "task");

        let command = &steps[1].command;
        assert!(command.contains("find /workspace -path"));
        assert!(command.contains("find /tmp -path"));
        assert!(command.ends_with("; true"));
    }

    #[test]
    #[serial]
    fn collect_step_quotes_paths_with_spaces() {
        let ctx = AdapterContext::new(PathBuf::from("/logs/agent run"));
        let steps = build_steps(&AdapterConfig::default(), &ctx, "task");

        assert!(steps[1].command.contains("'/logs/agent run/sessions'"));
    }
}
