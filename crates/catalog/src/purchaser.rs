use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use upsell_core::{EntitlementKey, ProductId};

/// A store transaction produced by a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub product_id: ProductId,
    pub purchased_at: DateTime<Utc>,
}

/// The provider's view of what the current user owns.
///
/// `active_entitlements` is authoritative: the provider decides which
/// entitlements are active, the dates are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaserInfo {
    #[serde(default)]
    active_entitlements: BTreeSet<EntitlementKey>,
    #[serde(default)]
    purchase_date_by_entitlement: BTreeMap<EntitlementKey, DateTime<Utc>>,
    /// `None` marks a non-expiring (lifetime) grant.
    #[serde(default)]
    expiration_date_by_entitlement: BTreeMap<EntitlementKey, Option<DateTime<Utc>>>,
    #[serde(default)]
    non_consumable_purchases: BTreeSet<ProductId>,
    #[serde(default)]
    original_application_version: Option<String>,
}

impl PurchaserInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_original_application_version(mut self, version: impl Into<String>) -> Self {
        self.original_application_version = Some(version.into());
        self
    }

    /// Record an entitlement grant.
    ///
    /// `expires_at = None` is a lifetime grant; lifetime products are also
    /// tracked as non-consumable purchases.
    pub fn record_grant(
        &mut self,
        entitlement: EntitlementKey,
        product_id: ProductId,
        purchased_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        if expires_at.is_none() {
            self.non_consumable_purchases.insert(product_id);
        }
        self.purchase_date_by_entitlement
            .insert(entitlement.clone(), purchased_at);
        self.expiration_date_by_entitlement
            .insert(entitlement.clone(), expires_at);
        self.active_entitlements.insert(entitlement);
    }

    pub fn active_entitlements(&self) -> &BTreeSet<EntitlementKey> {
        &self.active_entitlements
    }

    pub fn is_entitled_to(&self, key: &EntitlementKey) -> bool {
        self.active_entitlements.contains(key)
    }

    pub fn purchase_date_for(&self, key: &EntitlementKey) -> Option<DateTime<Utc>> {
        self.purchase_date_by_entitlement.get(key).copied()
    }

    /// `Some(None)` means granted without expiry; `None` means never granted.
    pub fn expiration_date_for(&self, key: &EntitlementKey) -> Option<Option<DateTime<Utc>>> {
        self.expiration_date_by_entitlement.get(key).copied()
    }

    pub fn non_consumable_purchases(&self) -> &BTreeSet<ProductId> {
        &self.non_consumable_purchases
    }

    pub fn original_application_version(&self) -> Option<&str> {
        self.original_application_version.as_deref()
    }
}
