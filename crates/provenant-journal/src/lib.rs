//! Append-only journal of Provenant registry events.
//!
//! This crate provides:
//! - Framed, append-only storage for registry events
//! - Reader/writer APIs with strict and permissive modes
//! - Hash-chain verification ([`verify_chain`])
//! - Event filters for selective reads
//! - [`JournalSink`], which makes a journal the registry's event sink, and
//!   [`load_registry`], which rebuilds a registry from its journal
//!
//! ## Quick Start
//!
//! ```rust
//! use provenant_canonical::{ContentHash, Identity};
//! use provenant_core::{NewItem, RegistryConfig};
//! use provenant_journal::{init_registry, load_registry};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("registry.pvj");
//! let admin = Identity::parse("org:registry")?;
//! let owner = Identity::parse("human:alice")?;
//!
//! let mut registry = init_registry(&path, admin, RegistryConfig::default())?;
//! let id = registry.register_item(&owner, NewItem {
//!     name: "Astrolabe".to_string(),
//!     description: "Brass planispheric astrolabe".to_string(),
//!     origin: "Isfahan".to_string(),
//!     year_of_creation: 1650,
//!     doc_hash: ContentHash::parse("sha256:9f2c")?,
//! })?;
//! drop(registry);
//!
//! let registry = load_registry(&path, RegistryConfig::default())?;
//! assert_eq!(registry.get_item(id)?.current_owner, owner);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The file format is described in [`frame`].

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Event filters.
pub mod filter;
/// File header and frame layout.
pub mod frame;
/// Journal reader.
pub mod reader;
/// Journal-backed event sink and registry loading.
pub mod sink;
/// Hash-chain verification.
pub mod verification;
/// Journal writer.
pub mod writer;

pub use errors::JournalError;
pub use filter::{ActorFilter, AndFilter, EventFilter, EventKindFilter, FilteredReader, ItemFilter};
pub use frame::{FrameHeader, FrameKind, JournalHeader};
pub use reader::{JournalReader, ReadMode};
pub use sink::{
    init_registry, init_registry_with_clock, load_registry, load_registry_with_clock, JournalSink,
};
pub use verification::{verify_chain, ChainFault, ChainReport};
pub use writer::{JournalWriter, WriteOptions};
