//! Read-only commands. They replay the journal into memory and never write.

use super::Context;
use crate::output;
use anyhow::Result;
use provenant_core::{Identity, ItemId};
use serde_json::json;

pub fn item(item_id: ItemId, ctx: &Context) -> Result<()> {
    let item = ctx.snapshot()?.get_item(item_id)?;
    if ctx.json {
        output::print_json(&item)?;
    } else {
        println!("{}", output::format_item(&item));
    }
    Ok(())
}

pub fn history(item_id: ItemId, ctx: &Context) -> Result<()> {
    let history = ctx.snapshot()?.get_ownership_history(item_id)?;
    if ctx.json {
        output::print_json(&history)?;
    } else {
        output::print_history_header();
        for (index, record) in history.iter().enumerate() {
            println!("{}", output::format_history_row(index, record));
        }
    }
    Ok(())
}

pub fn status(item_id: ItemId, ctx: &Context) -> Result<()> {
    let status = ctx.snapshot()?.get_verification_status(item_id)?;
    if ctx.json {
        output::print_json(&status)?;
    } else {
        println!("{}", output::format_status_line(&status));
    }
    Ok(())
}

pub fn is_verifier(identity: Identity, ctx: &Context) -> Result<()> {
    let authorized = ctx.snapshot()?.is_authorized_verifier(&identity);
    if ctx.json {
        output::print_json(&json!({ "identity": identity, "authorized": authorized }))?;
    } else {
        println!("{}", if authorized { "yes" } else { "no" });
    }
    Ok(())
}

pub fn verifiers(ctx: &Context) -> Result<()> {
    let registry = ctx.snapshot()?;
    let verifiers = registry.verifiers();
    if ctx.json {
        output::print_json(&json!({ "admin": registry.admin(), "verifiers": verifiers }))?;
    } else {
        for verifier in &verifiers {
            if verifier == registry.admin() {
                println!("{} (admin)", verifier);
            } else {
                println!("{}", verifier);
            }
        }
    }
    Ok(())
}

pub fn total(ctx: &Context) -> Result<()> {
    let total = ctx.snapshot()?.get_total_items();
    if ctx.json {
        output::print_json(&json!({ "total_items": total }))?;
    } else {
        println!("{}", total);
    }
    Ok(())
}

pub fn owned(identity: Option<Identity>, ctx: &Context) -> Result<()> {
    let owner = match identity {
        Some(identity) => identity,
        None => ctx.caller()?.clone(),
    };
    let items = ctx.snapshot()?.items_owned_by(&owner);
    if ctx.json {
        output::print_json(&json!({ "owner": owner, "items": items }))?;
    } else {
        for item_id in items {
            println!("{}", item_id);
        }
    }
    Ok(())
}
