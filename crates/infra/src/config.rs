//! Paywall configuration: which entitlement to sell and which offerings to show.
//!
//! Read from the environment with built-in defaults matching the cats paywall:
//!
//! - `UPSELL_ENTITLEMENT` (default `pro_cat`)
//! - `UPSELL_OFFERINGS` as `key=Title,key=Title` (default monthly, annual and
//!   lifetime cats)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use upsell_core::{EntitlementKey, OfferingKey};

pub const ENTITLEMENT_VAR: &str = "UPSELL_ENTITLEMENT";
pub const OFFERINGS_VAR: &str = "UPSELL_OFFERINGS";

const DEFAULT_ENTITLEMENT: &str = "pro_cat";
const DEFAULT_OFFERINGS: &str =
    "monthly_cats=Buy Monthly,annual_cats=Buy Annual,lifetime_cats=Buy Lifetime";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{var} lists no offerings")]
    NoOfferings { var: &'static str },

    #[error("{var} lists offering {key} more than once")]
    DuplicateOffering { var: &'static str, key: OfferingKey },
}

/// One offering shown on the paywall, with its button title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingSlot {
    pub key: OfferingKey,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaywallConfig {
    pub entitlement: EntitlementKey,
    /// Display order of the offering buttons; all are required to resolve.
    pub offerings: Vec<OfferingSlot>,
}

impl PaywallConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// The built-in cats paywall.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }

    /// Build from an arbitrary variable lookup; unset or blank variables fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let entitlement = EntitlementKey::new(read(ENTITLEMENT_VAR, DEFAULT_ENTITLEMENT).trim())
            .map_err(|e| ConfigError::Invalid {
                var: ENTITLEMENT_VAR,
                reason: e.to_string(),
            })?;
        let offerings = parse_offerings(&read(OFFERINGS_VAR, DEFAULT_OFFERINGS))?;

        Ok(Self {
            entitlement,
            offerings,
        })
    }

    pub fn offering_keys(&self) -> Vec<OfferingKey> {
        self.offerings.iter().map(|slot| slot.key.clone()).collect()
    }
}

fn parse_offerings(raw: &str) -> Result<Vec<OfferingSlot>, ConfigError> {
    let mut slots: Vec<OfferingSlot> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, title) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
            var: OFFERINGS_VAR,
            reason: format!("expected key=Title, got {entry:?}"),
        })?;

        let key = OfferingKey::new(key.trim()).map_err(|e| ConfigError::Invalid {
            var: OFFERINGS_VAR,
            reason: e.to_string(),
        })?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ConfigError::Invalid {
                var: OFFERINGS_VAR,
                reason: format!("offering {key} has no title"),
            });
        }
        if slots.iter().any(|slot| slot.key == key) {
            return Err(ConfigError::DuplicateOffering {
                var: OFFERINGS_VAR,
                key,
            });
        }

        slots.push(OfferingSlot {
            key,
            title: title.to_string(),
        });
    }

    if slots.is_empty() {
        return Err(ConfigError::NoOfferings { var: OFFERINGS_VAR });
    }
    Ok(slots)
}
