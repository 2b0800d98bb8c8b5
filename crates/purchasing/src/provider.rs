//! Data contract of the external purchase provider.
//!
//! The provider itself (catalog fetch, purchase execution) is an async
//! boundary owned by the infrastructure layer; this module only defines what
//! crosses it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use upsell_catalog::{PurchaserInfo, Transaction};

/// Provider-level failure (catalog fetch or purchase execution).
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ProviderError {
    /// Transport failure talking to the store or the provider backend.
    #[error("{0}")]
    Network(String),

    /// The store rejected the request (invalid product, payment declined, ...).
    #[error("store error: {0}")]
    Store(String),

    /// Purchases are disabled for this user or device.
    #[error("purchase not allowed: {0}")]
    NotAllowed(String),

    #[error("{0}")]
    Unknown(String),
}

impl ProviderError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

/// What a purchase call reports when it completes without a provider error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCompletion {
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub purchaser_info: PurchaserInfo,
    /// The provider's own cancellation flag (user dismissed the store sheet).
    #[serde(default)]
    pub user_cancelled: bool,
}

impl PurchaseCompletion {
    pub fn cancelled(purchaser_info: PurchaserInfo) -> Self {
        Self {
            transaction: None,
            purchaser_info,
            user_cancelled: true,
        }
    }
}
