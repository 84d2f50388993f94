//! `tether plan` - emit the invocation steps for the harness to execute.

use crate::config::AdapterConfig;
use crate::context::AdapterContext;
use crate::error::{Result, TetherError};
use crate::events::{self, Event, EventAction};
use crate::invocation;
use serde_json::json;

pub fn cmd_plan(config: &AdapterConfig, ctx: &AdapterContext, instruction: &str) -> Result<()> {
    let steps = invocation::build_steps(config, ctx, instruction);

    let payload = serde_json::to_string_pretty(&steps)
        .map_err(|e| TetherError::UserError(format!("failed to serialize plan: {}", e)))?;

    // Best-effort audit trail; an unwritable log must not fail the plan.
    let _ = events::append_event(
        ctx,
        &Event::new(EventAction::Plan).with_details(json!({"steps": steps.len()})),
    );

    println!("{}", payload);
    Ok(())
}
