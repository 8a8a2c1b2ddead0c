use provenant_canonical::{Identity, Price};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::errors::RegistryError;
use crate::events::{ChainTip, EventPayload, RegistryEvent};
use crate::item::{Item, ItemId, NewItem, OwnershipRecord, VerificationStatus};
use crate::sink::{EventSink, MemorySink};
use crate::state::{Command, RegistryState};
use crate::verifiers::VerifierSet;

/// The provenance registry engine.
///
/// Mutations take `&mut self`, so a `Registry` is a single writer by
/// construction. Each mutation checks its preconditions, hands exactly one
/// event to the sink, and only then changes state. A failed check or a
/// failed sink leaves the registry untouched.
///
/// # Example
///
/// ```rust
/// use provenant_core::{ContentHash, Identity, MemorySink, NewItem, Price, Registry,
///     RegistryConfig, SystemClock};
///
/// let admin = Identity::parse("human:admin")?;
/// let owner = Identity::parse("human:owner")?;
/// let mut registry = Registry::create(
///     admin.clone(),
///     RegistryConfig::default(),
///     Box::new(SystemClock),
///     MemorySink::new(),
/// )?;
///
/// let id = registry.register_item(&owner, NewItem {
///     name: "Vase".into(),
///     description: "Ming era".into(),
///     origin: "China".into(),
///     year_of_creation: 1420,
///     doc_hash: ContentHash::parse("hashA")?,
/// })?;
/// registry.verify_item(&admin, id)?;
/// registry.transfer_ownership(&owner, id, &Identity::parse("human:buyer")?, Price::new(500))?;
///
/// assert_eq!(registry.get_ownership_history(id)?.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Registry<S = MemorySink> {
    state: RegistryState,
    config: RegistryConfig,
    clock: Box<dyn Clock>,
    sink: S,
    tip: ChainTip,
}

impl<S: EventSink> Registry<S> {
    /// Creates a registry administered by `admin` and records the genesis event.
    pub fn create(
        admin: Identity,
        config: RegistryConfig,
        clock: Box<dyn Clock>,
        mut sink: S,
    ) -> Result<Self, RegistryError> {
        VerifierSet::check_admin(&admin)?;
        let genesis = ChainTip::default().next(
            clock.now(),
            admin.clone(),
            EventPayload::RegistryCreated {
                admin: admin.clone(),
            },
        )?;
        sink.record(&genesis)?;

        let mut tip = ChainTip::default();
        tip.advance(&genesis);
        info!(admin = %admin, "registry created");

        Ok(Self {
            state: RegistryState::new(admin),
            config,
            clock,
            sink,
            tip,
        })
    }

    /// Rebuilds a registry from its recorded events.
    ///
    /// The first event must be the genesis event. Every later event must
    /// extend the chain, carry a valid id, and be exactly what the transition
    /// rules produce for its actor at that point. Replayed events are not
    /// re-recorded; `sink` receives only events committed afterwards.
    pub fn replay<I>(
        events: I,
        config: RegistryConfig,
        clock: Box<dyn Clock>,
        sink: S,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RegistryEvent>,
    {
        let mut events = events.into_iter();
        let genesis = events.next().ok_or(RegistryError::Replay {
            seq: 0,
            reason: "history is empty".to_string(),
        })?;

        let mut tip = ChainTip::default();
        check_link(&tip, &genesis)?;
        let admin = match &genesis.payload {
            EventPayload::RegistryCreated { admin } if *admin == genesis.actor => admin.clone(),
            _ => {
                return Err(RegistryError::Replay {
                    seq: genesis.seq,
                    reason: "first event is not registry_created by its admin".to_string(),
                })
            }
        };
        VerifierSet::check_admin(&admin).map_err(|e| RegistryError::Replay {
            seq: genesis.seq,
            reason: e.to_string(),
        })?;
        tip.advance(&genesis);

        let mut state = RegistryState::new(admin);
        let rules = RegistryConfig::permissive();
        for event in events {
            check_link(&tip, &event)?;
            let command = Command::from_payload(&event.payload).ok_or(RegistryError::Replay {
                seq: event.seq,
                reason: "registry_created after genesis".to_string(),
            })?;
            let expected = state
                .plan(&rules, &event.actor, &command)
                .map_err(|e| RegistryError::Replay {
                    seq: event.seq,
                    reason: e.to_string(),
                })?;
            if expected != event.payload {
                return Err(RegistryError::Replay {
                    seq: event.seq,
                    reason: "payload differs from its recomputed effect".to_string(),
                });
            }
            state.apply(&event.payload, &event.occurred_at);
            tip.advance(&event);
        }
        debug!(events = tip.seq, items = state.total_items(), "replay complete");

        Ok(Self {
            state,
            config,
            clock,
            sink,
            tip,
        })
    }

    /// Registers an item owned by `caller` and returns its identifier.
    pub fn register_item(
        &mut self,
        caller: &Identity,
        item: NewItem,
    ) -> Result<ItemId, RegistryError> {
        let event = self.execute(caller, Command::RegisterItem(item))?;
        event
            .payload
            .item_id()
            .ok_or(RegistryError::IdSpaceExhausted)
    }

    /// Marks an item as verified by `caller`.
    pub fn verify_item(&mut self, caller: &Identity, item_id: ItemId) -> Result<(), RegistryError> {
        self.execute(caller, Command::VerifyItem(item_id))?;
        Ok(())
    }

    /// Transfers an item from `caller` to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: &Identity,
        item_id: ItemId,
        new_owner: &Identity,
        price: Price,
    ) -> Result<(), RegistryError> {
        self.execute(
            caller,
            Command::TransferOwnership {
                item_id,
                new_owner: new_owner.clone(),
                price,
            },
        )?;
        Ok(())
    }

    /// Adds `verifier` to the verifier set. Administrator only.
    pub fn authorize_verifier(
        &mut self,
        caller: &Identity,
        verifier: &Identity,
    ) -> Result<(), RegistryError> {
        self.execute(caller, Command::AuthorizeVerifier(verifier.clone()))?;
        Ok(())
    }

    /// Removes `verifier` from the verifier set. Administrator only.
    pub fn revoke_verifier(
        &mut self,
        caller: &Identity,
        verifier: &Identity,
    ) -> Result<(), RegistryError> {
        self.execute(caller, Command::RevokeVerifier(verifier.clone()))?;
        Ok(())
    }

    /// Runs a command and returns the committed event.
    pub fn execute(
        &mut self,
        caller: &Identity,
        command: Command,
    ) -> Result<RegistryEvent, RegistryError> {
        let payload = self
            .state
            .plan(&self.config, caller, &command)
            .inspect_err(|e| debug!(caller = %caller, error = %e, "command rejected"))?;
        let event = self.tip.next(self.clock.now(), caller.clone(), payload)?;
        self.sink.record(&event)?;

        self.state.apply(&event.payload, &event.occurred_at);
        self.tip.advance(&event);
        info!(seq = event.seq, kind = %event.kind(), actor = %caller, "event committed");
        Ok(event)
    }
}

impl<S> Registry<S> {
    /// Snapshot of an item.
    pub fn get_item(&self, item_id: ItemId) -> Result<Item, RegistryError> {
        self.state.item(item_id).cloned()
    }

    /// Ownership chain of an item, oldest first.
    pub fn get_ownership_history(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<OwnershipRecord>, RegistryError> {
        self.state.history(item_id).map(<[_]>::to_vec)
    }

    /// Verification fields of an item.
    pub fn get_verification_status(
        &self,
        item_id: ItemId,
    ) -> Result<VerificationStatus, RegistryError> {
        self.state.item(item_id).map(Item::verification_status)
    }

    /// Returns true if `identity` may verify items.
    pub fn is_authorized_verifier(&self, identity: &Identity) -> bool {
        self.state.verifiers().contains(identity)
    }

    /// Number of registered items.
    pub fn get_total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// The administrator.
    pub fn admin(&self) -> &Identity {
        self.state.admin()
    }

    /// Current verifiers in sorted order.
    pub fn verifiers(&self) -> Vec<Identity> {
        self.state.verifiers().iter().cloned().collect()
    }

    /// Identifiers of the items held by `owner`.
    pub fn items_owned_by(&self, owner: &Identity) -> Vec<ItemId> {
        self.state.items_owned_by(owner).map(|item| item.id).collect()
    }

    /// Read access to the full state.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Active input limits.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Head of the event chain.
    pub fn chain_tip(&self) -> &ChainTip {
        &self.tip
    }

    /// The event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the registry, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

fn check_link(tip: &ChainTip, event: &RegistryEvent) -> Result<(), RegistryError> {
    if !tip.accepts(event) {
        return Err(RegistryError::Replay {
            seq: event.seq,
            reason: format!("does not extend chain at seq {}", tip.seq),
        });
    }
    if !event.occurred_at.is_valid() {
        return Err(RegistryError::Replay {
            seq: event.seq,
            reason: format!("malformed occurred_at '{}'", event.occurred_at),
        });
    }
    if !event.verify_id()? {
        return Err(RegistryError::Replay {
            seq: event.seq,
            reason: "event_id does not match contents".to_string(),
        });
    }
    Ok(())
}
