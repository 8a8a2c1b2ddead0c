//! Commands that change the registry. Each one appends exactly one event.

use super::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use provenant_core::{ContentHash, Identity, ItemId, NewItem, Price};
use serde_json::json;

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Free-text description
    #[arg(long)]
    pub description: String,
    /// Place or maker of origin
    #[arg(long)]
    pub origin: String,
    /// Year of creation (negative for BCE)
    #[arg(long, allow_hyphen_values = true)]
    pub year: i32,
    /// Content hash of the supporting documentation
    #[arg(long)]
    pub doc_hash: ContentHash,
}

pub fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let caller = ctx.caller()?;
    let mut registry = ctx.open()?;
    let item_id = registry.register_item(
        caller,
        NewItem {
            name: args.name,
            description: args.description,
            origin: args.origin,
            year_of_creation: args.year,
            doc_hash: args.doc_hash,
        },
    )?;

    if ctx.json {
        output::print_json(&json!({ "item_id": item_id, "owner": caller }))?;
    } else {
        println!("Registered item {}", item_id);
    }
    Ok(())
}

pub fn verify(item_id: ItemId, ctx: &Context) -> Result<()> {
    let caller = ctx.caller()?;
    let mut registry = ctx.open()?;
    registry.verify_item(caller, item_id)?;

    if ctx.json {
        output::print_json(&registry.get_verification_status(item_id)?)?;
    } else {
        println!("Verified item {}", item_id);
    }
    Ok(())
}

pub fn transfer(item_id: ItemId, new_owner: Identity, price: Price, ctx: &Context) -> Result<()> {
    let caller = ctx.caller()?;
    let mut registry = ctx.open()?;
    registry.transfer_ownership(caller, item_id, &new_owner, price)?;

    if ctx.json {
        output::print_json(&json!({
            "item_id": item_id,
            "previous_owner": caller,
            "new_owner": new_owner,
            "price": price,
        }))?;
    } else {
        println!("Transferred item {} to {} for {}", item_id, new_owner, price);
    }
    Ok(())
}

pub fn authorize(identity: Identity, ctx: &Context) -> Result<()> {
    let caller = ctx.caller()?;
    let mut registry = ctx.open()?;
    registry.authorize_verifier(caller, &identity)?;

    if ctx.json {
        output::print_json(&json!({ "verifier": identity, "authorized": true }))?;
    } else {
        println!("Authorized verifier {}", identity);
    }
    Ok(())
}

pub fn revoke(identity: Identity, ctx: &Context) -> Result<()> {
    let caller = ctx.caller()?;
    let mut registry = ctx.open()?;
    registry.revoke_verifier(caller, &identity)?;

    if ctx.json {
        output::print_json(&json!({ "verifier": identity, "authorized": false }))?;
    } else {
        println!("Revoked verifier {}", identity);
    }
    Ok(())
}
