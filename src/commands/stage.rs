//! `tether stage` - resolve the agent binary and stage it for the sandbox.

use crate::binary;
use crate::config::AdapterConfig;
use crate::context::AdapterContext;
use crate::error::{Result, TetherError};
use crate::events::{self, Event, EventAction};
use serde_json::json;

pub fn cmd_stage(config: &AdapterConfig, ctx: &AdapterContext) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        TetherError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    let staged = binary::stage(config, ctx, &cwd)?;

    // Best-effort audit trail; an unwritable log must not fail the staging.
    let _ = events::append_event(
        ctx,
        &Event::new(EventAction::Stage)
            .with_details(json!({"binary": staged.to_string_lossy()})),
    );

    println!("{}", staged.display());
    Ok(())
}
