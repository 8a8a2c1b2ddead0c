use std::collections::BTreeSet;

use provenant_canonical::Identity;

use crate::errors::RegistryError;

/// Identities allowed to verify items.
///
/// The administrator is inserted at construction and can never be removed,
/// so the set is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierSet {
    admin: Identity,
    members: BTreeSet<Identity>,
}

impl VerifierSet {
    /// Creates a set whose sole member is `admin`.
    pub fn new(admin: Identity) -> Self {
        let mut members = BTreeSet::new();
        members.insert(admin.clone());
        Self { admin, members }
    }

    /// Checks that `admin` can administer a registry.
    pub fn check_admin(admin: &Identity) -> Result<(), RegistryError> {
        if admin.is_null() || !admin.is_valid() {
            return Err(RegistryError::InvalidTarget {
                target: admin.clone(),
                reason: "administrator must be a valid identity",
            });
        }
        Ok(())
    }

    /// The administrator.
    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    /// Returns true if `identity` may verify items.
    pub fn contains(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    /// Members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.members.iter()
    }

    /// Number of members, administrator included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; the administrator is a permanent member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Checks that `caller` may add `target`.
    pub fn check_authorize(&self, caller: &Identity, target: &Identity) -> Result<(), RegistryError> {
        self.require_admin(caller, "authorize verifiers")?;
        if target.is_null() || !target.is_valid() {
            return Err(RegistryError::InvalidTarget {
                target: target.clone(),
                reason: "not a valid identity",
            });
        }
        if self.contains(target) {
            return Err(RegistryError::AlreadyAuthorized(target.clone()));
        }
        Ok(())
    }

    /// Checks that `caller` may remove `target`.
    pub fn check_revoke(&self, caller: &Identity, target: &Identity) -> Result<(), RegistryError> {
        self.require_admin(caller, "revoke verifiers")?;
        if *target == self.admin {
            return Err(RegistryError::CannotRevokeAdmin(target.clone()));
        }
        if !self.contains(target) {
            return Err(RegistryError::NotAuthorized(target.clone()));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, identity: Identity) {
        self.members.insert(identity);
    }

    pub(crate) fn remove(&mut self, identity: &Identity) {
        if *identity != self.admin {
            self.members.remove(identity);
        }
    }

    fn require_admin(&self, caller: &Identity, action: &'static str) -> Result<(), RegistryError> {
        if *caller != self.admin {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
                action,
            });
        }
        Ok(())
    }
}
