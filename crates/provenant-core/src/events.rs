use std::fmt;
use std::str::FromStr;

use provenant_canonical::{
    compute_event_id, ContentHash, Digest, EventIdError, Identity, Price, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;
use crate::item::ItemId;

/// Current event schema version.
pub const EVENT_VERSION: &str = "1";

/// What happened, with every field needed to replay it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// Genesis event fixing the administrator.
    RegistryCreated {
        /// Administrator for the lifetime of the registry.
        admin: Identity,
    },
    /// An item was registered.
    ItemRegistered {
        /// Assigned identifier.
        item_id: ItemId,
        /// Display name.
        name: String,
        /// Free-text description.
        description: String,
        /// Free-text origin.
        origin: String,
        /// Year of creation.
        year_of_creation: i32,
        /// External documentation reference.
        doc_hash: ContentHash,
        /// Registrant and first owner.
        owner: Identity,
    },
    /// An item was verified.
    ItemVerified {
        /// Verified item.
        item_id: ItemId,
        /// Verifying party.
        verifier: Identity,
    },
    /// Ownership of an item changed hands.
    OwnershipTransferred {
        /// Transferred item.
        item_id: ItemId,
        /// Owner before the transfer.
        previous_owner: Identity,
        /// Owner after the transfer.
        new_owner: Identity,
        /// Price paid.
        price: Price,
    },
    /// An identity joined the verifier set.
    VerifierAuthorized {
        /// New verifier.
        verifier: Identity,
        /// Administrator that granted the role.
        admin: Identity,
    },
    /// An identity left the verifier set.
    VerifierRevoked {
        /// Removed verifier.
        verifier: Identity,
        /// Administrator that removed the role.
        admin: Identity,
    },
}

impl EventPayload {
    /// Discriminant of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::RegistryCreated { .. } => EventKind::RegistryCreated,
            EventPayload::ItemRegistered { .. } => EventKind::ItemRegistered,
            EventPayload::ItemVerified { .. } => EventKind::ItemVerified,
            EventPayload::OwnershipTransferred { .. } => EventKind::OwnershipTransferred,
            EventPayload::VerifierAuthorized { .. } => EventKind::VerifierAuthorized,
            EventPayload::VerifierRevoked { .. } => EventKind::VerifierRevoked,
        }
    }

    /// Item the event concerns, if any.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            EventPayload::ItemRegistered { item_id, .. }
            | EventPayload::ItemVerified { item_id, .. }
            | EventPayload::OwnershipTransferred { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }
}

/// Event discriminant, as written in the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `registry_created`
    RegistryCreated,
    /// `item_registered`
    ItemRegistered,
    /// `item_verified`
    ItemVerified,
    /// `ownership_transferred`
    OwnershipTransferred,
    /// `verifier_authorized`
    VerifierAuthorized,
    /// `verifier_revoked`
    VerifierRevoked,
}

impl EventKind {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::RegistryCreated => "registry_created",
            EventKind::ItemRegistered => "item_registered",
            EventKind::ItemVerified => "item_verified",
            EventKind::OwnershipTransferred => "ownership_transferred",
            EventKind::VerifierAuthorized => "verifier_authorized",
            EventKind::VerifierRevoked => "verifier_revoked",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registry_created" => Ok(EventKind::RegistryCreated),
            "item_registered" => Ok(EventKind::ItemRegistered),
            "item_verified" => Ok(EventKind::ItemVerified),
            "ownership_transferred" => Ok(EventKind::OwnershipTransferred),
            "verifier_authorized" => Ok(EventKind::VerifierAuthorized),
            "verifier_revoked" => Ok(EventKind::VerifierRevoked),
            other => Err(format!("unknown event kind '{}'", other)),
        }
    }
}

/// A committed registry event.
///
/// Events form a hash chain: `seq` counts from 1 at the genesis event and
/// `prev_event_id` names the preceding event. `event_id` is
/// `sha256(domain || canonical_bytes(event without event_id))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Content-derived identifier.
    pub event_id: Digest,
    /// Schema version (`"1"`).
    pub event_version: String,
    /// Position in the chain, from 1.
    pub seq: u64,
    /// Identifier of the previous event; absent only for genesis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_event_id: Option<Digest>,
    /// When the event was committed.
    pub occurred_at: Timestamp,
    /// Identity that performed the operation.
    pub actor: Identity,
    /// What happened.
    pub payload: EventPayload,
}

#[derive(Serialize)]
struct EventBody<'a> {
    event_version: &'a str,
    seq: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev_event_id: Option<&'a Digest>,
    occurred_at: &'a Timestamp,
    actor: &'a Identity,
    payload: &'a EventPayload,
}

impl RegistryEvent {
    /// Builds an event and computes its identifier.
    pub fn seal(
        seq: u64,
        prev_event_id: Option<Digest>,
        occurred_at: Timestamp,
        actor: Identity,
        payload: EventPayload,
    ) -> Result<Self, EventIdError> {
        let event_id = compute_event_id(&EventBody {
            event_version: EVENT_VERSION,
            seq,
            prev_event_id: prev_event_id.as_ref(),
            occurred_at: &occurred_at,
            actor: &actor,
            payload: &payload,
        })?;
        Ok(Self {
            event_id,
            event_version: EVENT_VERSION.to_string(),
            seq,
            prev_event_id,
            occurred_at,
            actor,
            payload,
        })
    }

    /// Recomputes the identifier and compares it with `event_id`.
    pub fn verify_id(&self) -> Result<bool, EventIdError> {
        Ok(compute_event_id(self)? == self.event_id)
    }

    /// Discriminant of the payload.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Head of the event chain: the last committed sequence number and id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainTip {
    /// Sequence number of the last event; 0 before genesis.
    pub seq: u64,
    /// Identifier of the last event.
    pub event_id: Option<Digest>,
}

impl ChainTip {
    /// Seals the event that would follow this tip.
    pub fn next(
        &self,
        occurred_at: Timestamp,
        actor: Identity,
        payload: EventPayload,
    ) -> Result<RegistryEvent, RegistryError> {
        let seq = self.seq.checked_add(1).ok_or(RegistryError::Replay {
            seq: self.seq,
            reason: "event sequence exhausted".to_string(),
        })?;
        Ok(RegistryEvent::seal(
            seq,
            self.event_id.clone(),
            occurred_at,
            actor,
            payload,
        )?)
    }

    /// Returns true if `event` directly extends this tip.
    pub fn accepts(&self, event: &RegistryEvent) -> bool {
        event.seq == self.seq + 1 && event.prev_event_id == self.event_id
    }

    /// Moves the tip to `event`.
    pub fn advance(&mut self, event: &RegistryEvent) {
        self.seq = event.seq;
        self.event_id = Some(event.event_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::parse("human:admin").unwrap()
    }

    fn genesis() -> RegistryEvent {
        ChainTip::default()
            .next(
                Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap(),
                admin(),
                EventPayload::RegistryCreated { admin: admin() },
            )
            .unwrap()
    }

    #[test]
    fn payload_serializes_with_kind_tag() {
        let payload = EventPayload::ItemVerified {
            item_id: ItemId::new(3),
            verifier: admin(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["kind"], "item_verified");
        assert_eq!(value["item_id"], 3);
    }

    #[test]
    fn sealed_event_verifies_and_detects_tampering() {
        let mut event = genesis();
        assert!(event.verify_id().unwrap());
        event.actor = Identity::parse("human:mallory").unwrap();
        assert!(!event.verify_id().unwrap());
    }

    #[test]
    fn genesis_has_no_predecessor() {
        let event = genesis();
        assert_eq!(event.seq, 1);
        assert!(event.prev_event_id.is_none());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("prev_event_id").is_none());
    }

    #[test]
    fn tip_links_successive_events() {
        let first = genesis();
        let mut tip = ChainTip::default();
        assert!(tip.accepts(&first));
        tip.advance(&first);

        let second = tip
            .next(
                Timestamp::parse("2024-01-01T00:00:01.000Z").unwrap(),
                admin(),
                EventPayload::VerifierAuthorized {
                    verifier: Identity::parse("org:lab").unwrap(),
                    admin: admin(),
                },
            )
            .unwrap();
        assert_eq!(second.prev_event_id.as_ref(), Some(&first.event_id));
        assert!(tip.accepts(&second));
        assert!(!tip.accepts(&first));
    }

    #[test]
    fn event_round_trips_through_json_with_same_id() {
        let event = genesis();
        let json = serde_json::to_string(&event).unwrap();
        let back: RegistryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(back.verify_id().unwrap());
    }

    #[test]
    fn kind_parses_from_wire_name() {
        assert_eq!(
            "ownership_transferred".parse::<EventKind>().unwrap(),
            EventKind::OwnershipTransferred
        );
        assert!("auction_closed".parse::<EventKind>().is_err());
    }
}
