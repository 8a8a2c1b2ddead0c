//! Canonical data model primitives for Provenant registry events.
//!
//! Everything that participates in hashing or identity comparison lives in
//! this crate: principal identities, opaque content hashes, timestamps,
//! prices, digests and the canonical JSON encoding used to derive event ids.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Event ID computation with domain-separated hashing.
pub mod event_id;
/// Identities, content hashes and timestamps.
pub mod identifiers;
/// Transfer prices in minor units.
pub mod price;
/// Validation errors shared by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{Digest, DigestAlg};
pub use event_id::{compute_event_id, verify_event_id, EventIdError};
pub use identifiers::{ContentHash, Identity, Timestamp};
pub use price::Price;
pub use validation::ValidationError;
