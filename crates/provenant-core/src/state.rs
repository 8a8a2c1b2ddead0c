//! Registry state and the rules that govern its transitions.
//!
//! Transitions happen in two steps. [`RegistryState::plan`] checks a
//! [`Command`] against the current state and, if it is allowed, returns the
//! [`EventPayload`] describing its effect without changing anything.
//! [`RegistryState::apply`] then folds an accepted payload into the state.
//! Live operations and replay share both steps.

use provenant_canonical::{Identity, Price, Timestamp};

use crate::config::RegistryConfig;
use crate::errors::RegistryError;
use crate::events::EventPayload;
use crate::item::{Item, ItemId, NewItem, OwnershipRecord};
use crate::verifiers::VerifierSet;

/// A requested state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a new item owned by the caller.
    RegisterItem(NewItem),
    /// Mark an item as verified.
    VerifyItem(ItemId),
    /// Hand an item to a new owner.
    TransferOwnership {
        /// Item to transfer.
        item_id: ItemId,
        /// Receiving identity.
        new_owner: Identity,
        /// Price paid.
        price: Price,
    },
    /// Add a verifier.
    AuthorizeVerifier(Identity),
    /// Remove a verifier.
    RevokeVerifier(Identity),
}

impl Command {
    /// Reconstructs the command that produced `payload`.
    ///
    /// Returns `None` for the genesis payload, which no command produces.
    pub fn from_payload(payload: &EventPayload) -> Option<Command> {
        match payload {
            EventPayload::RegistryCreated { .. } => None,
            EventPayload::ItemRegistered {
                name,
                description,
                origin,
                year_of_creation,
                doc_hash,
                ..
            } => Some(Command::RegisterItem(NewItem {
                name: name.clone(),
                description: description.clone(),
                origin: origin.clone(),
                year_of_creation: *year_of_creation,
                doc_hash: doc_hash.clone(),
            })),
            EventPayload::ItemVerified { item_id, .. } => Some(Command::VerifyItem(*item_id)),
            EventPayload::OwnershipTransferred {
                item_id,
                new_owner,
                price,
                ..
            } => Some(Command::TransferOwnership {
                item_id: *item_id,
                new_owner: new_owner.clone(),
                price: *price,
            }),
            EventPayload::VerifierAuthorized { verifier, .. } => {
                Some(Command::AuthorizeVerifier(verifier.clone()))
            }
            EventPayload::VerifierRevoked { verifier, .. } => {
                Some(Command::RevokeVerifier(verifier.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemEntry {
    item: Item,
    history: Vec<OwnershipRecord>,
}

/// Items, their ownership chains and the verifier set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
    verifiers: VerifierSet,
    // Index `i` holds item `i + 1`.
    items: Vec<ItemEntry>,
}

impl RegistryState {
    /// Empty state administered by `admin`.
    pub fn new(admin: Identity) -> Self {
        Self {
            verifiers: VerifierSet::new(admin),
            items: Vec::new(),
        }
    }

    /// The administrator.
    pub fn admin(&self) -> &Identity {
        self.verifiers.admin()
    }

    /// The verifier set.
    pub fn verifiers(&self) -> &VerifierSet {
        &self.verifiers
    }

    /// Number of registered items; also the highest assigned identifier.
    pub fn total_items(&self) -> u64 {
        self.items.len() as u64
    }

    /// Looks up an item.
    pub fn item(&self, item_id: ItemId) -> Result<&Item, RegistryError> {
        self.entry(item_id).map(|entry| &entry.item)
    }

    /// Ownership chain of an item, oldest first.
    pub fn history(&self, item_id: ItemId) -> Result<&[OwnershipRecord], RegistryError> {
        self.entry(item_id).map(|entry| entry.history.as_slice())
    }

    /// Items currently held by `owner`, in identifier order.
    pub fn items_owned_by<'a>(&'a self, owner: &'a Identity) -> impl Iterator<Item = &'a Item> {
        self.items
            .iter()
            .map(|entry| &entry.item)
            .filter(move |item| item.current_owner == *owner)
    }

    /// Checks `command` on behalf of `caller` and describes its effect.
    pub fn plan(
        &self,
        config: &RegistryConfig,
        caller: &Identity,
        command: &Command,
    ) -> Result<EventPayload, RegistryError> {
        match command {
            Command::RegisterItem(new_item) => {
                if caller.is_null() || !caller.is_valid() {
                    return Err(RegistryError::Unauthorized {
                        caller: caller.clone(),
                        action: "register items",
                    });
                }
                config.check_new_item(new_item)?;
                let item_id = self
                    .total_items()
                    .checked_add(1)
                    .map(ItemId::new)
                    .ok_or(RegistryError::IdSpaceExhausted)?;
                Ok(EventPayload::ItemRegistered {
                    item_id,
                    name: new_item.name.clone(),
                    description: new_item.description.clone(),
                    origin: new_item.origin.clone(),
                    year_of_creation: new_item.year_of_creation,
                    doc_hash: new_item.doc_hash.clone(),
                    owner: caller.clone(),
                })
            }
            Command::VerifyItem(item_id) => {
                let item = self.item(*item_id)?;
                if item.verified {
                    return Err(RegistryError::AlreadyVerified(*item_id));
                }
                if !self.verifiers.contains(caller) {
                    return Err(RegistryError::Unauthorized {
                        caller: caller.clone(),
                        action: "verify items",
                    });
                }
                Ok(EventPayload::ItemVerified {
                    item_id: *item_id,
                    verifier: caller.clone(),
                })
            }
            Command::TransferOwnership {
                item_id,
                new_owner,
                price,
            } => {
                let item = self.item(*item_id)?;
                if item.current_owner != *caller {
                    return Err(RegistryError::Unauthorized {
                        caller: caller.clone(),
                        action: "transfer this item",
                    });
                }
                if new_owner.is_null() || !new_owner.is_valid() {
                    return Err(RegistryError::InvalidTarget {
                        target: new_owner.clone(),
                        reason: "not a valid identity",
                    });
                }
                if new_owner == caller {
                    return Err(RegistryError::InvalidTarget {
                        target: new_owner.clone(),
                        reason: "already the current owner",
                    });
                }
                Ok(EventPayload::OwnershipTransferred {
                    item_id: *item_id,
                    previous_owner: item.current_owner.clone(),
                    new_owner: new_owner.clone(),
                    price: *price,
                })
            }
            Command::AuthorizeVerifier(target) => {
                self.verifiers.check_authorize(caller, target)?;
                Ok(EventPayload::VerifierAuthorized {
                    verifier: target.clone(),
                    admin: caller.clone(),
                })
            }
            Command::RevokeVerifier(target) => {
                self.verifiers.check_revoke(caller, target)?;
                Ok(EventPayload::VerifierRevoked {
                    verifier: target.clone(),
                    admin: caller.clone(),
                })
            }
        }
    }

    /// Folds a payload returned by [`RegistryState::plan`] into the state.
    pub fn apply(&mut self, payload: &EventPayload, at: &Timestamp) {
        match payload {
            EventPayload::RegistryCreated { .. } => {}
            EventPayload::ItemRegistered {
                item_id,
                name,
                description,
                origin,
                year_of_creation,
                doc_hash,
                owner,
            } => {
                self.items.push(ItemEntry {
                    item: Item {
                        id: *item_id,
                        name: name.clone(),
                        description: description.clone(),
                        origin: origin.clone(),
                        year_of_creation: *year_of_creation,
                        doc_hash: doc_hash.clone(),
                        current_owner: owner.clone(),
                        verifier: None,
                        verified_at: None,
                        verified: false,
                    },
                    history: vec![OwnershipRecord {
                        owner: owner.clone(),
                        acquired_at: at.clone(),
                        price: Price::ZERO,
                    }],
                });
            }
            EventPayload::ItemVerified { item_id, verifier } => {
                if let Some(entry) = self.entry_mut(*item_id) {
                    entry.item.verified = true;
                    entry.item.verifier = Some(verifier.clone());
                    entry.item.verified_at = Some(at.clone());
                }
            }
            EventPayload::OwnershipTransferred {
                item_id,
                new_owner,
                price,
                ..
            } => {
                if let Some(entry) = self.entry_mut(*item_id) {
                    entry.item.current_owner = new_owner.clone();
                    entry.history.push(OwnershipRecord {
                        owner: new_owner.clone(),
                        acquired_at: at.clone(),
                        price: *price,
                    });
                }
            }
            EventPayload::VerifierAuthorized { verifier, .. } => {
                self.verifiers.insert(verifier.clone());
            }
            EventPayload::VerifierRevoked { verifier, .. } => {
                self.verifiers.remove(verifier);
            }
        }
    }

    fn index(&self, item_id: ItemId) -> Option<usize> {
        let index = usize::try_from(item_id.get().checked_sub(1)?).ok()?;
        (index < self.items.len()).then_some(index)
    }

    fn entry(&self, item_id: ItemId) -> Result<&ItemEntry, RegistryError> {
        self.index(item_id)
            .map(|index| &self.items[index])
            .ok_or(RegistryError::NotFound(item_id))
    }

    fn entry_mut(&mut self, item_id: ItemId) -> Option<&mut ItemEntry> {
        let index = self.index(item_id)?;
        self.items.get_mut(index)
    }
}
