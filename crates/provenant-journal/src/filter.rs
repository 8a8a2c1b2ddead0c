use crate::errors::JournalError;
use crate::reader::JournalReader;
use provenant_canonical::Identity;
use provenant_core::{EventKind, ItemId, RegistryEvent};

/// Predicate over registry events.
pub trait EventFilter {
    /// Returns true if the event matches the filter criteria.
    fn matches(&self, event: &RegistryEvent) -> bool;
}

/// Matches events that concern one item.
#[derive(Debug, Clone)]
pub struct ItemFilter {
    /// Item to match.
    pub item_id: ItemId,
}

impl EventFilter for ItemFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.payload.item_id() == Some(self.item_id)
    }
}

/// Matches events of one kind.
#[derive(Debug, Clone)]
pub struct EventKindFilter {
    /// Kind to match.
    pub kind: EventKind,
}

impl EventFilter for EventKindFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.kind() == self.kind
    }
}

/// Matches events performed by one identity.
#[derive(Debug, Clone)]
pub struct ActorFilter {
    /// Actor to match.
    pub actor: Identity,
}

impl EventFilter for ActorFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.actor == self.actor
    }
}

/// Composite filter: all filters must match. Empty matches everything.
#[derive(Default)]
pub struct AndFilter {
    /// Filters to combine.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl AndFilter {
    /// Adds a filter.
    pub fn with(mut self, filter: impl EventFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl EventFilter for AndFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }
}

/// Reader that yields only matching events.
pub struct FilteredReader<F: EventFilter> {
    reader: JournalReader,
    filter: F,
}

impl<F: EventFilter> FilteredReader<F> {
    /// Wraps `reader`.
    pub fn new(reader: JournalReader, filter: F) -> Self {
        Self { reader, filter }
    }

    /// Reads the next matching event.
    pub fn read_next(&mut self) -> Result<Option<RegistryEvent>, JournalError> {
        while let Some(event) = self.reader.read_event()? {
            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Unwraps the underlying reader.
    pub fn into_inner(self) -> JournalReader {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenant_canonical::{ContentHash, Timestamp};
    use provenant_core::{ChainTip, EventPayload, Price};

    fn event(payload: EventPayload, actor: &str) -> RegistryEvent {
        ChainTip::default()
            .next(
                Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
                Identity::parse(actor).unwrap(),
                payload,
            )
            .unwrap()
    }

    fn transfer(item: u64) -> RegistryEvent {
        event(
            EventPayload::OwnershipTransferred {
                item_id: ItemId::new(item),
                previous_owner: Identity::parse("human:alice").unwrap(),
                new_owner: Identity::parse("human:bob").unwrap(),
                price: Price::new(10),
            },
            "human:alice",
        )
    }

    #[test]
    fn item_filter_ignores_registry_level_events() {
        let filter = ItemFilter {
            item_id: ItemId::new(2),
        };
        assert!(filter.matches(&transfer(2)));
        assert!(!filter.matches(&transfer(3)));
        let created = event(
            EventPayload::RegistryCreated {
                admin: Identity::parse("org:registry").unwrap(),
            },
            "org:registry",
        );
        assert!(!filter.matches(&created));
    }

    #[test]
    fn and_filter_requires_all() {
        let filter = AndFilter::default()
            .with(EventKindFilter {
                kind: EventKind::OwnershipTransferred,
            })
            .with(ActorFilter {
                actor: Identity::parse("human:alice").unwrap(),
            });
        assert!(filter.matches(&transfer(1)));

        let registered = event(
            EventPayload::ItemRegistered {
                item_id: ItemId::new(1),
                name: "Vase".to_string(),
                description: "Blue glaze".to_string(),
                origin: "Delft".to_string(),
                year_of_creation: 1680,
                doc_hash: ContentHash::new("sha256:abc".to_string()),
                owner: Identity::parse("human:alice").unwrap(),
            },
            "human:alice",
        );
        assert!(!filter.matches(&registered));
        assert!(AndFilter::default().matches(&registered));
    }
}
