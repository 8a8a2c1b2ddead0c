use std::fmt;
use std::sync::OnceLock;

use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::validation::ValidationError;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm currently emitted).
    #[serde(rename = "sha-256")]
    Sha256,
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlg::Sha256 => f.write_str("sha-256"),
        }
    }
}

/// Algorithm + bytes digest, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm.
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    #[serde(rename = "b64")]
    pub b64: String,
}

fn b64_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{43}$").expect("invalid regex"))
}

impl Digest {
    /// Constructs a validated digest.
    pub fn new(alg: DigestAlg, b64: impl Into<String>) -> Result<Self, ValidationError> {
        let b64 = b64.into();
        if !b64_pattern().is_match(&b64) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b64,
            });
        }
        Ok(Digest { alg, b64 })
    }

    /// Hashes the concatenation of `parts` with SHA-256.
    pub fn sha256(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize());
        Digest {
            alg: DigestAlg::Sha256,
            b64,
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg, self.b64)
    }
}
