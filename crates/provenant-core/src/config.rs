use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;
use crate::item::NewItem;

/// Limits applied to caller-supplied item fields.
///
/// Out-of-range values are rejected with [`RegistryError::InvalidField`];
/// nothing is silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Earliest accepted year of creation (negative years are BCE).
    pub min_year: i32,
    /// Latest accepted year of creation.
    pub max_year: i32,
    /// Maximum length in bytes of name, description and origin.
    pub max_text_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_year: -10_000,
            max_year: 9_999,
            max_text_len: 4096,
        }
    }
}

impl RegistryConfig {
    /// Limits that accept every representable value.
    ///
    /// Used when replaying history, so that tightening the limits later never
    /// invalidates events that were accepted at the time.
    pub fn permissive() -> Self {
        Self {
            min_year: i32::MIN,
            max_year: i32::MAX,
            max_text_len: usize::MAX,
        }
    }

    /// Checks a registration request against these limits.
    pub fn check_new_item(&self, item: &NewItem) -> Result<(), RegistryError> {
        self.check_text("name", &item.name)?;
        self.check_text("description", &item.description)?;
        self.check_text("origin", &item.origin)?;

        if item.year_of_creation < self.min_year || item.year_of_creation > self.max_year {
            return Err(RegistryError::InvalidField {
                field: "year_of_creation",
                reason: format!(
                    "{} is outside {}..={}",
                    item.year_of_creation, self.min_year, self.max_year
                ),
            });
        }

        if !item.doc_hash.is_valid() {
            return Err(RegistryError::InvalidField {
                field: "doc_hash",
                reason: format!("'{}' is not a content hash", item.doc_hash),
            });
        }
        Ok(())
    }

    fn check_text(&self, field: &'static str, value: &str) -> Result<(), RegistryError> {
        if value.trim().is_empty() {
            return Err(RegistryError::InvalidField {
                field,
                reason: "must not be empty".to_string(),
            });
        }
        if value.len() > self.max_text_len {
            return Err(RegistryError::InvalidField {
                field,
                reason: format!("{} bytes exceeds limit of {}", value.len(), self.max_text_len),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenant_canonical::ContentHash;

    fn vase() -> NewItem {
        NewItem {
            name: "Vase".into(),
            description: "Ming era".into(),
            origin: "China".into(),
            year_of_creation: 1420,
            doc_hash: ContentHash::new("hashA".into()),
        }
    }

    #[test]
    fn default_limits_accept_a_typical_item() {
        assert!(RegistryConfig::default().check_new_item(&vase()).is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut item = vase();
        item.origin = "   ".into();
        let err = RegistryConfig::default().check_new_item(&item).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField { field: "origin", .. }));
    }

    #[test]
    fn year_outside_range_is_rejected() {
        let mut item = vase();
        item.year_of_creation = 12_000;
        let err = RegistryConfig::default().check_new_item(&item).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidField { field: "year_of_creation", .. }
        ));
        assert!(RegistryConfig::permissive().check_new_item(&item).is_ok());
    }

    #[test]
    fn oversized_text_is_rejected() {
        let config = RegistryConfig {
            max_text_len: 3,
            ..RegistryConfig::default()
        };
        let err = config.check_new_item(&vase()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn malformed_doc_hash_is_rejected() {
        let mut item = vase();
        item.doc_hash = ContentHash::new(String::new());
        let err = RegistryConfig::default().check_new_item(&item).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField { field: "doc_hash", .. }));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"max_year": 2100}"#).unwrap();
        assert_eq!(config.max_year, 2100);
        assert_eq!(config.min_year, RegistryConfig::default().min_year);
    }
}
