use std::fmt;

use canonical_json::to_string;
use serde_json::Value;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Failure reported by the RFC 8785 encoder.
    #[error("encoder error: {0}")]
    Encoder(String),
}

/// JSON path used in error messages, e.g. `payload.item.name`.
#[derive(Debug, Clone, Default)]
struct JsonPath(Vec<String>);

impl JsonPath {
    fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    fn index(&self, idx: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(format!("[{}]", idx));
        Self(segments)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// Produces RFC 8785 canonical bytes for JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a canonicalizer.
    pub fn new() -> Self {
        Canonicalizer
    }

    /// Validates `value` and returns its canonical UTF-8 bytes.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        Self::validate(value, &JsonPath::default())?;
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Encoder(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    fn validate(value: &Value, path: &JsonPath) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    Self::validate(child, &path.field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    Self::validate(item, &path.index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}
