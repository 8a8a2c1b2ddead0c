//! Event ID computation with domain-separated hashing.
//!
//! Event IDs are computed as `sha256(domain_separator || canonical_bytes(event))`
//! where the `event_id` field is excluded from the hash input.

use serde::Serialize;
use serde_json::Value;

use crate::{CanonicalizationError, Canonicalizer, Digest};

/// Domain separator for event ID computation: `b"provenant:event:v1\0"`.
pub const EVENT_DOMAIN_SEPARATOR: &[u8] = b"provenant:event:v1\0";

/// Error during event ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EventIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// The event carries no parseable `event_id`.
    #[error("missing or malformed event_id")]
    MissingEventId,
}

/// Computes the event ID for a serializable event.
///
/// Numbers are stringified before canonicalization so the hash input never
/// depends on float/integer formatting. As a consequence a number and its
/// decimal string form hash identically (`{"seq":7}` and `{"seq":"7"}` share
/// an id). This is intentional: the id identifies content, not its JSON
/// encoding, and must not be used to tell the two apart.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::compute_event_id;
/// use serde_json::json;
///
/// let event = json!({ "seq": 1, "payload": { "kind": "registry_created" } });
/// let id = compute_event_id(&event)?;
/// assert_eq!(id.b64.len(), 43);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_event_id<T: Serialize>(event: &T) -> Result<Digest, EventIdError> {
    let mut value: Value =
        serde_json::to_value(event).map_err(|e| EventIdError::Serialization(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove("event_id");
    }

    stringify_numbers(&mut value);

    let bytes = Canonicalizer::new().canonicalize(&value)?;
    Ok(Digest::sha256(&[EVENT_DOMAIN_SEPARATOR, bytes.as_slice()]))
}

/// Checks a JSON event against its claimed `event_id`.
pub fn verify_event_id(event: &Value) -> Result<bool, EventIdError> {
    let claimed: Digest = event
        .get("event_id")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .ok_or(EventIdError::MissingEventId)?;
    Ok(compute_event_id(event)? == claimed)
}

fn stringify_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            let s = n.to_string();
            *value = Value::String(s);
        }
        Value::Array(arr) => arr.iter_mut().for_each(stringify_numbers),
        Value::Object(map) => map.values_mut().for_each(stringify_numbers),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_id_ignores_existing_event_id_field() {
        let bare = json!({ "seq": 1, "actor": "human:alice" });
        let mut stamped = bare.clone();
        stamped["event_id"] = json!({ "alg": "sha-256", "b64": "whatever" });
        assert_eq!(
            compute_event_id(&bare).unwrap(),
            compute_event_id(&stamped).unwrap()
        );
    }

    #[test]
    fn numbers_and_their_string_forms_hash_identically() {
        let numeric = json!({ "seq": 7 });
        let textual = json!({ "seq": "7" });
        assert_eq!(
            compute_event_id(&numeric).unwrap(),
            compute_event_id(&textual).unwrap()
        );
    }

    #[test]
    fn verify_detects_tampering() {
        let mut event = json!({ "seq": 1, "payload": { "name": "Vase" } });
        let id = compute_event_id(&event).unwrap();
        event["event_id"] = serde_json::to_value(&id).unwrap();
        assert!(verify_event_id(&event).unwrap());

        event["payload"]["name"] = json!("Bowl");
        assert!(!verify_event_id(&event).unwrap());
    }

    #[test]
    fn verify_requires_event_id() {
        let event = json!({ "seq": 1 });
        assert!(matches!(
            verify_event_id(&event),
            Err(EventIdError::MissingEventId)
        ));
    }
}
