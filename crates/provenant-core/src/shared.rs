use std::sync::Arc;

use parking_lot::Mutex;
use provenant_canonical::{Identity, Price};

use crate::errors::RegistryError;
use crate::events::RegistryEvent;
use crate::item::{Item, ItemId, NewItem, OwnershipRecord, VerificationStatus};
use crate::registry::Registry;
use crate::sink::{EventSink, MemorySink};
use crate::state::Command;

/// Cloneable handle that serializes access to one [`Registry`].
///
/// A single registry-wide lock guards every call. Identifier allocation is a
/// registry-global invariant, so locking individual items would not be
/// enough. Reads take the same lock and therefore never see a half-applied
/// mutation.
pub struct SharedRegistry<S = MemorySink> {
    inner: Arc<Mutex<Registry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink> SharedRegistry<S> {
    /// Wraps a registry.
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// See [`Registry::register_item`].
    pub fn register_item(&self, caller: &Identity, item: NewItem) -> Result<ItemId, RegistryError> {
        self.inner.lock().register_item(caller, item)
    }

    /// See [`Registry::verify_item`].
    pub fn verify_item(&self, caller: &Identity, item_id: ItemId) -> Result<(), RegistryError> {
        self.inner.lock().verify_item(caller, item_id)
    }

    /// See [`Registry::transfer_ownership`].
    pub fn transfer_ownership(
        &self,
        caller: &Identity,
        item_id: ItemId,
        new_owner: &Identity,
        price: Price,
    ) -> Result<(), RegistryError> {
        self.inner
            .lock()
            .transfer_ownership(caller, item_id, new_owner, price)
    }

    /// See [`Registry::authorize_verifier`].
    pub fn authorize_verifier(
        &self,
        caller: &Identity,
        verifier: &Identity,
    ) -> Result<(), RegistryError> {
        self.inner.lock().authorize_verifier(caller, verifier)
    }

    /// See [`Registry::revoke_verifier`].
    pub fn revoke_verifier(&self, caller: &Identity, verifier: &Identity) -> Result<(), RegistryError> {
        self.inner.lock().revoke_verifier(caller, verifier)
    }

    /// See [`Registry::execute`].
    pub fn execute(&self, caller: &Identity, command: Command) -> Result<RegistryEvent, RegistryError> {
        self.inner.lock().execute(caller, command)
    }
}

impl<S> SharedRegistry<S> {
    /// See [`Registry::get_item`].
    pub fn get_item(&self, item_id: ItemId) -> Result<Item, RegistryError> {
        self.inner.lock().get_item(item_id)
    }

    /// See [`Registry::get_ownership_history`].
    pub fn get_ownership_history(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<OwnershipRecord>, RegistryError> {
        self.inner.lock().get_ownership_history(item_id)
    }

    /// See [`Registry::get_verification_status`].
    pub fn get_verification_status(
        &self,
        item_id: ItemId,
    ) -> Result<VerificationStatus, RegistryError> {
        self.inner.lock().get_verification_status(item_id)
    }

    /// See [`Registry::is_authorized_verifier`].
    pub fn is_authorized_verifier(&self, identity: &Identity) -> bool {
        self.inner.lock().is_authorized_verifier(identity)
    }

    /// See [`Registry::get_total_items`].
    pub fn get_total_items(&self) -> u64 {
        self.inner.lock().get_total_items()
    }

    /// Runs `f` with the lock held, for reads spanning several queries.
    pub fn read<T>(&self, f: impl FnOnce(&Registry<S>) -> T) -> T {
        f(&self.inner.lock())
    }
}
