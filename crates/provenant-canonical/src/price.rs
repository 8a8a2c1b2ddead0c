use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::ValidationError;

/// Price paid for an ownership transfer, in indivisible minor units.
///
/// Encoded on the wire as a base-10 string (no sign, no leading zeros) so
/// that canonical bytes never depend on JSON number formatting. Values that
/// do not fit in 64 bits are rejected instead of truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    /// Zero, used for the registration record.
    pub const ZERO: Price = Price(0);

    /// Wraps an amount in minor units.
    pub const fn new(amount: u64) -> Self {
        Price(amount)
    }

    /// Returns the amount in minor units.
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Returns true for a zero price.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Price(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minimal = s == "0" || (!s.starts_with('0') && !s.is_empty());
        if !minimal || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::PatternMismatch {
                field: "price",
                value: s.to_string(),
            });
        }
        s.parse::<u64>()
            .map(Price)
            .map_err(|_| ValidationError::OutOfBounds {
                field: "price",
                value: s.to_string(),
            })
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
