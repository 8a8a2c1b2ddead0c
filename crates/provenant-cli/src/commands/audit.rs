use super::Context;
use crate::output;
use anyhow::{bail, Result};
use provenant_journal::verify_chain;
use serde_json::json;

/// Checks event ids and chain links, then replays the journal through the
/// registry rules. Exits non-zero if either check fails.
pub fn run(ctx: &Context) -> Result<()> {
    let report = verify_chain(ctx.reader()?)?;
    let replay_error = if report.is_intact() {
        ctx.snapshot().err().map(|e| format!("{:#}", e))
    } else {
        None
    };

    if ctx.json {
        output::print_json(&json!({
            "events": report.events,
            "tip": report.tip,
            "faults": report.faults,
            "replay_error": replay_error,
        }))?;
    } else {
        println!("events:  {}", report.events);
        if let Some(tip) = &report.tip {
            println!("tip:     {}", tip);
        }
        for fault in &report.faults {
            println!(
                "fault:   #{} (seq {}): {}",
                fault.position, fault.seq, fault.reason
            );
        }
        if let Some(reason) = &replay_error {
            println!("replay:  {}", reason);
        }
    }

    if !report.is_intact() {
        bail!("journal failed audit: {} fault(s)", report.faults.len());
    }
    if replay_error.is_some() {
        bail!("journal failed audit: history does not replay");
    }
    tracing::info!(events = report.events, "audit passed");
    Ok(())
}
