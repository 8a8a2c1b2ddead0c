use provenant_canonical::{EventIdError, Identity};
use thiserror::Error;

use crate::item::ItemId;
use crate::sink::SinkError;

/// Errors returned by registry operations.
///
/// Every error is terminal for the call that produced it and leaves the
/// registry exactly as it was.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Caller lacks the role the operation requires.
    #[error("{caller} is not permitted to {action}")]
    Unauthorized {
        /// Rejected caller.
        caller: Identity,
        /// What the caller attempted.
        action: &'static str,
    },
    /// Item identifier is zero or beyond the number of registered items.
    #[error("item {0} does not exist")]
    NotFound(ItemId),
    /// Item has already been verified.
    #[error("item {0} is already verified")]
    AlreadyVerified(ItemId),
    /// Target identity is null, malformed, or the caller itself.
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget {
        /// Rejected target.
        target: Identity,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Identity is already an authorized verifier.
    #[error("{0} is already an authorized verifier")]
    AlreadyAuthorized(Identity),
    /// Identity is not an authorized verifier.
    #[error("{0} is not an authorized verifier")]
    NotAuthorized(Identity),
    /// The administrator can never leave the verifier set.
    #[error("administrator {0} cannot be revoked")]
    CannotRevokeAdmin(Identity),
    /// Caller-supplied field is empty or out of range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// No further item identifiers can be assigned.
    #[error("item identifier space exhausted")]
    IdSpaceExhausted,
    /// Event sink failed to record the event; nothing was applied.
    #[error(transparent)]
    Sink(#[from] SinkError),
    /// Event could not be hashed.
    #[error("event id computation failed: {0}")]
    EventId(#[from] EventIdError),
    /// Recorded history is inconsistent with the transition rules.
    #[error("replay failed at event {seq}: {reason}")]
    Replay {
        /// Sequence number of the offending event.
        seq: u64,
        /// What was wrong with it.
        reason: String,
    },
}

impl RegistryError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Unauthorized { .. } => "UNAUTHORIZED",
            RegistryError::NotFound(_) => "NOT_FOUND",
            RegistryError::AlreadyVerified(_) => "ALREADY_VERIFIED",
            RegistryError::InvalidTarget { .. } => "INVALID_TARGET",
            RegistryError::AlreadyAuthorized(_) => "ALREADY_AUTHORIZED",
            RegistryError::NotAuthorized(_) => "NOT_AUTHORIZED",
            RegistryError::CannotRevokeAdmin(_) => "CANNOT_REVOKE_ADMIN",
            RegistryError::InvalidField { .. } => "INVALID_FIELD",
            RegistryError::IdSpaceExhausted => "ID_SPACE_EXHAUSTED",
            RegistryError::Sink(_) => "SINK_FAILED",
            RegistryError::EventId(_) => "EVENT_ID_FAILED",
            RegistryError::Replay { .. } => "REPLAY_FAILED",
        }
    }
}
