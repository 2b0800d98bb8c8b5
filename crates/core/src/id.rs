//! Strongly-typed catalog keys.
//!
//! Entitlements, offerings and products are all identified by opaque strings
//! issued by the purchase provider's catalog (`"pro_cat"`, `"annual_cats"`,
//! `"com.example.cats.annual"`). Each gets its own newtype so an offering key
//! can never be passed where an entitlement key is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Key of an entitlement (a named bundle of purchase rights).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntitlementKey(String);

/// Key of an offering, scoped within an entitlement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OfferingKey(String);

/// Store identifier of a purchasable product (SKU).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

fn validate_key(raw: &str, name: &str) -> DomainResult<()> {
    if raw.is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: must not be empty")));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(DomainError::invalid_id(format!(
            "{name}: must not contain whitespace ({raw:?})"
        )));
    }
    Ok(())
}

macro_rules! impl_key_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Validate and wrap a raw key.
            pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
                let raw = raw.into();
                validate_key(&raw, $name)?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl core::borrow::Borrow<str> for $t {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_key_newtype!(EntitlementKey, "EntitlementKey");
impl_key_newtype!(OfferingKey, "OfferingKey");
impl_key_newtype!(ProductId, "ProductId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_keys() {
        let key: EntitlementKey = "pro_cat".parse().unwrap();
        assert_eq!(key.as_str(), "pro_cat");
        assert_eq!(key.to_string(), "pro_cat");
    }

    #[test]
    fn rejects_empty_key() {
        let err = OfferingKey::new("").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidId("OfferingKey: must not be empty".to_string())
        );
    }

    #[test]
    fn rejects_whitespace() {
        assert!(ProductId::new("com.cats annual").is_err());
        assert!(ProductId::new(" com.cats").is_err());
    }

    #[test]
    fn serde_is_transparent_and_validated() {
        let key = OfferingKey::new("annual_cats").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"annual_cats\"");

        let back: OfferingKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);

        assert!(serde_json::from_str::<OfferingKey>("\"\"").is_err());
    }

    #[test]
    fn borrow_allows_str_lookups() {
        let mut set = std::collections::BTreeSet::new();
        set.insert(EntitlementKey::new("pro_cat").unwrap());
        assert!(set.contains("pro_cat"));
    }
}
