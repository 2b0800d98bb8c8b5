use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use upsell_core::{DomainError, DomainResult, EntitlementKey, Entity, OfferingKey, ProductId};

use crate::product::Product;

/// A named purchase option within an entitlement (monthly, annual, lifetime…).
///
/// Invariant: an offering without an active product cannot be purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    key: OfferingKey,
    #[serde(default)]
    active_product: Option<Product>,
}

impl Offering {
    pub fn new(key: OfferingKey, active_product: Option<Product>) -> Self {
        Self {
            key,
            active_product,
        }
    }

    pub fn key(&self) -> &OfferingKey {
        &self.key
    }

    pub fn active_product(&self) -> Option<&Product> {
        self.active_product.as_ref()
    }

    pub fn can_be_purchased(&self) -> bool {
        self.active_product.is_some()
    }
}

/// A named bundle of purchase rights, owning its offerings by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntitlementRecord", into = "EntitlementRecord")]
pub struct Entitlement {
    key: EntitlementKey,
    offerings: BTreeMap<OfferingKey, Offering>,
}

#[derive(Serialize, Deserialize)]
struct EntitlementRecord {
    key: EntitlementKey,
    #[serde(default)]
    offerings: Vec<Offering>,
}

impl TryFrom<EntitlementRecord> for Entitlement {
    type Error = DomainError;

    fn try_from(value: EntitlementRecord) -> Result<Self, Self::Error> {
        value
            .offerings
            .into_iter()
            .try_fold(Entitlement::new(value.key), Entitlement::with_offering)
    }
}

impl From<Entitlement> for EntitlementRecord {
    fn from(value: Entitlement) -> Self {
        Self {
            key: value.key,
            offerings: value.offerings.into_values().collect(),
        }
    }
}

impl Entitlement {
    pub fn new(key: EntitlementKey) -> Self {
        Self {
            key,
            offerings: BTreeMap::new(),
        }
    }

    /// Add an offering. Offering keys are unique within an entitlement.
    pub fn with_offering(mut self, offering: Offering) -> DomainResult<Self> {
        if self.offerings.contains_key(offering.key()) {
            return Err(DomainError::invariant(format!(
                "duplicate offering {} in entitlement {}",
                offering.key(),
                self.key
            )));
        }
        self.offerings.insert(offering.key().clone(), offering);
        Ok(self)
    }

    pub fn key(&self) -> &EntitlementKey {
        &self.key
    }

    pub fn offering(&self, key: &OfferingKey) -> Option<&Offering> {
        self.offerings.get(key)
    }

    pub fn offerings(&self) -> impl Iterator<Item = &Offering> {
        self.offerings.values()
    }

    pub fn offering_count(&self) -> usize {
        self.offerings.len()
    }
}

/// Everything the provider's catalog fetch returned: all entitlements, each
/// with its offerings and their current active products.
///
/// Immutable once fetched; a new fetch yields a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecord", into = "CatalogRecord")]
pub struct CatalogSnapshot {
    entitlements: BTreeMap<EntitlementKey, Entitlement>,
}

#[derive(Serialize, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    entitlements: Vec<Entitlement>,
}

impl TryFrom<CatalogRecord> for CatalogSnapshot {
    type Error = DomainError;

    fn try_from(value: CatalogRecord) -> Result<Self, Self::Error> {
        value
            .entitlements
            .into_iter()
            .try_fold(CatalogSnapshot::new(), CatalogSnapshot::with_entitlement)
    }
}

impl From<CatalogSnapshot> for CatalogRecord {
    fn from(value: CatalogSnapshot) -> Self {
        Self {
            entitlements: value.entitlements.into_values().collect(),
        }
    }
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entitlement(mut self, entitlement: Entitlement) -> DomainResult<Self> {
        if self.entitlements.contains_key(entitlement.key()) {
            return Err(DomainError::invariant(format!(
                "duplicate entitlement {}",
                entitlement.key()
            )));
        }
        self.entitlements
            .insert(entitlement.key().clone(), entitlement);
        Ok(self)
    }

    pub fn entitlement(&self, key: &EntitlementKey) -> Option<&Entitlement> {
        self.entitlements.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entitlements.is_empty()
    }

    /// Find the active product with the given id and the entitlement it unlocks.
    pub fn find_product(&self, id: &ProductId) -> Option<(&EntitlementKey, &Product)> {
        self.entitlements.values().find_map(|entitlement| {
            entitlement
                .offerings()
                .filter_map(Offering::active_product)
                .find(|product| product.id() == id)
                .map(|product| (entitlement.key(), product))
        })
    }
}
