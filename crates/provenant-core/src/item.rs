use std::fmt;
use std::str::FromStr;

use provenant_canonical::{ContentHash, Identity, Price, Timestamp};
use serde::{Deserialize, Serialize};

/// Sequential item identifier. The first registered item is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wraps a raw identifier. Zero is representable but never assigned.
    pub const fn new(id: u64) -> Self {
        ItemId(id)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ItemId)
    }
}

/// Caller-supplied fields for a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Free-text origin (place, workshop, maker).
    pub origin: String,
    /// Year the item was made; negative for BCE.
    pub year_of_creation: i32,
    /// Reference to documentation held in an external content store.
    pub doc_hash: ContentHash,
}

/// A registered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, immutable once assigned.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Free-text origin.
    pub origin: String,
    /// Year the item was made.
    pub year_of_creation: i32,
    /// Reference to external documentation.
    pub doc_hash: ContentHash,
    /// Current holder.
    pub current_owner: Identity,
    /// Verifier that authenticated the item, once verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier: Option<Identity>,
    /// When the item was verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<Timestamp>,
    /// Whether the item has been verified.
    pub verified: bool,
}

impl Item {
    /// Snapshot of the verification fields.
    pub fn verification_status(&self) -> VerificationStatus {
        VerificationStatus {
            verified: self.verified,
            verifier: self.verifier.clone(),
            verified_at: self.verified_at.clone(),
        }
    }
}

/// One entry in an item's ownership chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Holder from this point on.
    pub owner: Identity,
    /// When ownership was assumed.
    pub acquired_at: Timestamp,
    /// Price paid; zero for the registration record.
    pub price: Price,
}

/// Verification fields of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// Whether the item has been verified.
    pub verified: bool,
    /// Who verified it.
    pub verifier: Option<Identity>,
    /// When it was verified.
    pub verified_at: Option<Timestamp>,
}
