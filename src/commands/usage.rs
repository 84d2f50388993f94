//! `tether usage` - aggregate token usage from harvested session logs.

use crate::context::AdapterContext;
use crate::error::{Result, TetherError};
use crate::events::{self, Event, EventAction};
use crate::usage;

pub fn cmd_usage(ctx: &AdapterContext) -> Result<()> {
    let totals = usage::aggregate(ctx.sessions_dir());

    let payload = serde_json::to_string(&totals)
        .map_err(|e| TetherError::UserError(format!("failed to serialize totals: {}", e)))?;

    // Best-effort audit trail; an unwritable log must not fail the report.
    let details = serde_json::to_value(&totals).unwrap_or_default();
    let _ = events::append_event(ctx, &Event::new(EventAction::Usage).with_details(details));

    println!("{}", payload);
    Ok(())
}
