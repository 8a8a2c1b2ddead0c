use super::Context;
use crate::output;
use anyhow::{Context as _, Result};
use provenant_core::Identity;
use provenant_journal::init_registry;
use serde_json::json;

pub fn run(admin: Identity, ctx: &Context) -> Result<()> {
    let registry = init_registry(&ctx.journal, admin, ctx.registry.clone())
        .with_context(|| format!("cannot initialize {}", ctx.journal.display()))?;

    if ctx.json {
        output::print_json(&json!({
            "journal": ctx.journal,
            "admin": registry.admin(),
        }))?;
    } else {
        println!(
            "Initialized registry {} (admin {})",
            ctx.journal.display(),
            registry.admin()
        );
    }
    Ok(())
}
