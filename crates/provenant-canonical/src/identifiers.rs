use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::validation::ValidationError;

macro_rules! newtype {
    ($name:ident, $field:expr, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        ///
        /// Deserialization validates against the pattern; only `new`
        /// builds an unchecked value.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            fn pattern() -> &'static Regex {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"))
            }

            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if s.is_empty() {
                    return Err(ValidationError::Empty { field: $field });
                }
                if !Self::pattern().is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: $field,
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns true if the wrapped value matches the canonical pattern.
            pub fn is_valid(&self) -> bool {
                Self::pattern().is_match(&self.0)
            }

            /// Borrows the wrapped string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Self::parse(value).map_err(de::Error::custom)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

newtype!(
    Identity,
    "identity",
    "Stable identifier for a registry participant (`kind:name`, lowercase, URL-safe).",
    r"^(human|service|agent|org):[a-z][a-z0-9_-]{0,62}$"
);
newtype!(
    ContentHash,
    "doc_hash",
    "Opaque reference to externally stored documentation (e.g. an IPFS CID).",
    r"^[A-Za-z0-9:_+/=.-]{1,256}$"
);
newtype!(
    Timestamp,
    "timestamp",
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

impl Identity {
    /// The null identity. Never a valid owner or verifier.
    pub fn null() -> Self {
        Self(String::new())
    }

    /// Returns true for the null (empty) identity.
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }
}

impl Timestamp {
    /// Current wall-clock time with millisecond precision.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Formats a chrono UTC datetime in the canonical form.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parses the wrapped string back into a chrono datetime.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, ValidationError> {
        DateTime::parse_from_rfc3339(&self.0)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ValidationError::PatternMismatch {
                field: "timestamp",
                value: self.0.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn identity_accepts_kind_and_name() {
        assert!(Identity::parse("human:alice").is_ok());
        assert!(Identity::parse("org:museum_of-art").is_ok());
    }

    #[test]
    fn identity_rejects_unknown_kind_and_uppercase() {
        assert!(Identity::parse("robot:alice").is_err());
        assert!(Identity::parse("human:Alice").is_err());
        assert!(Identity::parse("alice").is_err());
    }

    #[test]
    fn empty_identity_is_null_and_invalid() {
        let null = Identity::null();
        assert!(null.is_null());
        assert!(!null.is_valid());
        assert_eq!(
            Identity::parse(""),
            Err(ValidationError::Empty { field: "identity" })
        );
    }

    #[test]
    fn content_hash_is_opaque_but_rejects_whitespace() {
        assert!(ContentHash::parse("hashA").is_ok());
        assert!(ContentHash::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").is_ok());
        assert!(ContentHash::parse("has space").is_err());
    }

    #[test]
    fn timestamp_round_trips_through_chrono() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let ts = Timestamp::from_datetime(at);
        assert_eq!(ts.as_str(), "2024-03-01T12:30:00.000Z");
        assert!(ts.is_valid());
        assert_eq!(ts.to_datetime().unwrap(), at);
    }

    #[test]
    fn deserialization_enforces_patterns() {
        let ts: Timestamp = serde_json::from_str(r#""2024-03-01T12:30:00.000Z""#).unwrap();
        assert!(ts.is_valid());
        assert!(serde_json::from_str::<Timestamp>(r#""yesterday""#).is_err());
        assert!(serde_json::from_str::<Identity>(r#""""#).is_err());
        assert!(serde_json::from_str::<Identity>(r#""human:Alice""#).is_err());
        assert!(serde_json::from_str::<ContentHash>(r#""two words""#).is_err());
    }

    #[test]
    fn timestamps_order_chronologically() {
        let earlier = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let later = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert!(earlier < later);
    }
}
