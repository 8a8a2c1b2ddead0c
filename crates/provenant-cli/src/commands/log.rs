use super::Context;
use crate::output;
use anyhow::Result;
use provenant_core::{EventKind, Identity, ItemId};
use provenant_journal::{ActorFilter, AndFilter, EventKindFilter, FilteredReader, ItemFilter};

pub fn run(
    item: Option<ItemId>,
    kind: Option<EventKind>,
    actor: Option<Identity>,
    ctx: &Context,
) -> Result<()> {
    let mut filter = AndFilter::default();
    if let Some(item_id) = item {
        filter = filter.with(ItemFilter { item_id });
    }
    if let Some(kind) = kind {
        filter = filter.with(EventKindFilter { kind });
    }
    if let Some(actor) = actor {
        filter = filter.with(ActorFilter { actor });
    }

    let mut reader = FilteredReader::new(ctx.reader()?, filter);

    if !ctx.json {
        output::print_event_header();
    }
    while let Some(event) = reader.read_next()? {
        if ctx.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", output::format_event_row(&event));
        }
    }
    Ok(())
}
