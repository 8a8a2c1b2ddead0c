//! Output formatting utilities.

use provenant_core::{Item, OwnershipRecord, RegistryEvent, VerificationStatus};
use serde::Serialize;

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats an item as aligned `key: value` lines.
pub fn format_item(item: &Item) -> String {
    let mut lines = vec![
        format!("{:<12} {}", "id:", item.id),
        format!("{:<12} {}", "name:", item.name),
        format!("{:<12} {}", "description:", item.description),
        format!("{:<12} {}", "origin:", item.origin),
        format!("{:<12} {}", "year:", item.year_of_creation),
        format!("{:<12} {}", "doc_hash:", item.doc_hash),
        format!("{:<12} {}", "owner:", item.current_owner),
    ];
    lines.push(format_status_line(&item.verification_status()));
    lines.join("\n")
}

/// Formats verification status as a single line.
pub fn format_status_line(status: &VerificationStatus) -> String {
    match (&status.verifier, &status.verified_at) {
        (Some(verifier), Some(at)) if status.verified => {
            format!("{:<12} yes (by {} at {})", "verified:", verifier, at)
        }
        _ => format!("{:<12} no", "verified:"),
    }
}

/// Prints the ownership history header.
#[allow(clippy::print_literal)]
pub fn print_history_header() {
    println!("{:<4} {:<26} {:>14} {}", "#", "ACQUIRED_AT", "PRICE", "OWNER");
    println!("{}", "-".repeat(72));
}

/// Formats one ownership record.
pub fn format_history_row(index: usize, record: &OwnershipRecord) -> String {
    format!(
        "{:<4} {:<26} {:>14} {}",
        index + 1,
        record.acquired_at,
        record.price,
        record.owner
    )
}

/// Prints the event log header.
#[allow(clippy::print_literal)]
pub fn print_event_header() {
    println!(
        "{:<6} {:<22} {:<26} {:<6} {}",
        "SEQ", "KIND", "OCCURRED_AT", "ITEM", "ACTOR"
    );
    println!("{}", "-".repeat(90));
}

/// Formats an event as a table row.
pub fn format_event_row(event: &RegistryEvent) -> String {
    let item = event
        .payload
        .item_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<6} {:<22} {:<26} {:<6} {}",
        event.seq,
        event.kind(),
        event.occurred_at,
        item,
        event.actor
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenant_core::{ContentHash, Identity, ItemId, Price, Timestamp};

    #[test]
    fn unverified_item_shows_no() {
        let item = Item {
            id: ItemId::new(3),
            name: "Lute".to_string(),
            description: "Eight-course lute".to_string(),
            origin: "Venice".to_string(),
            year_of_creation: 1590,
            doc_hash: ContentHash::new("sha256:aa".to_string()),
            current_owner: Identity::new("human:carol".to_string()),
            verifier: None,
            verified_at: None,
            verified: false,
        };
        let text = format_item(&item);
        assert!(text.contains("Lute"));
        assert!(text.ends_with("no"));
    }

    #[test]
    fn history_row_is_one_based() {
        let record = OwnershipRecord {
            owner: Identity::new("human:dave".to_string()),
            acquired_at: Timestamp::new("2024-01-01T00:00:00.000Z".to_string()),
            price: Price::new(1250),
        };
        let row = format_history_row(0, &record);
        assert!(row.starts_with("1 "));
        assert!(row.contains("1250"));
        assert!(row.ends_with("human:dave"));
    }
}
