//! Provenance registry engine.
//!
//! This crate provides:
//! - The [`Registry`] state-transition engine (registration, one-time
//!   verification, ownership transfer, verifier management)
//! - Registry events, hash-chained and content-addressed
//! - Replay of an event history back into registry state
//! - [`SharedRegistry`], a single-writer handle for concurrent hosts
//!
//! Core invariants:
//! - Item identifiers are sequential from 1 and never reused
//! - An item's verified flag goes from false to true exactly once
//! - Ownership history is append-only; its last entry names the current owner
//! - The administrator is fixed at creation and is always a verifier
//! - A rejected call changes nothing and records no event
//!
#![deny(missing_docs)]

/// Time sources.
pub mod clock;
/// Registry configuration and input limits.
pub mod config;
/// Error types for registry operations.
pub mod errors;
/// Registry events and hash chaining.
pub mod events;
/// Items, ownership records and verification status.
pub mod item;
/// The registry engine.
pub mod registry;
/// Serialized handle for concurrent callers.
pub mod shared;
/// Event sinks.
pub mod sink;
/// Registry state and transition rules.
pub mod state;
/// Verifier set management.
pub mod verifiers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use errors::RegistryError;
pub use events::{ChainTip, EventKind, EventPayload, RegistryEvent};
pub use item::{Item, ItemId, NewItem, OwnershipRecord, VerificationStatus};
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use sink::{EventSink, MemorySink, SinkError};
pub use state::{Command, RegistryState};
pub use verifiers::VerifierSet;

pub use provenant_canonical::{ContentHash, Identity, Price, Timestamp};
