use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use upsell_catalog::{CatalogSnapshot, Product};
use upsell_core::{EntitlementKey, OfferingKey};

use crate::provider::ProviderError;

/// Why a resolution attempt ended in `Failed`.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ResolutionError {
    #[error("catalog fetch failed: {0}")]
    CatalogFetch(ProviderError),

    #[error("{0} entitlement not found")]
    MissingEntitlement(EntitlementKey),

    #[error("{0} offering not found")]
    MissingOffering(OfferingKey),

    #[error("{0} active product not found")]
    MissingActiveProduct(OfferingKey),
}

/// The products resolved for one entitlement, keyed by offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOfferings {
    entitlement: EntitlementKey,
    products: BTreeMap<OfferingKey, Product>,
}

impl ResolvedOfferings {
    pub fn entitlement(&self) -> &EntitlementKey {
        &self.entitlement
    }

    pub fn product(&self, key: &OfferingKey) -> Option<&Product> {
        self.products.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OfferingKey, &Product)> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Readiness of the offering display.
///
/// `Loading -> {Ready | Failed}`; leaving `Ready` or `Failed` takes a new
/// resolution attempt, which replaces the state wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ResolutionState {
    #[default]
    Loading,
    Ready(ResolvedOfferings),
    Failed(ResolutionError),
}

impl ResolutionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResolutionState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ResolutionState::Ready(_))
    }

    pub fn offerings(&self) -> Option<&ResolvedOfferings> {
        match self {
            ResolutionState::Ready(offerings) => Some(offerings),
            _ => None,
        }
    }

    /// Product for `key`, only when Ready.
    pub fn product(&self, key: &OfferingKey) -> Option<&Product> {
        self.offerings().and_then(|offerings| offerings.product(key))
    }

    pub fn error(&self) -> Option<&ResolutionError> {
        match self {
            ResolutionState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<ResolvedOfferings, ResolutionError>> for ResolutionState {
    fn from(value: Result<ResolvedOfferings, ResolutionError>) -> Self {
        match value {
            Ok(offerings) => ResolutionState::Ready(offerings),
            Err(err) => ResolutionState::Failed(err),
        }
    }
}

/// Resolve `required` offerings of `entitlement` against a fetched catalog.
///
/// All required offerings are checked for presence first, then for an active
/// product, each pass in the caller's order; the first gap ends resolution.
/// Duplicate keys in `required` resolve once.
pub fn resolve_offerings(
    catalog: &CatalogSnapshot,
    entitlement: &EntitlementKey,
    required: &[OfferingKey],
) -> Result<ResolvedOfferings, ResolutionError> {
    let found = catalog
        .entitlement(entitlement)
        .ok_or_else(|| ResolutionError::MissingEntitlement(entitlement.clone()))?;

    let offerings = required
        .iter()
        .map(|key| {
            found
                .offering(key)
                .ok_or_else(|| ResolutionError::MissingOffering(key.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let products = offerings
        .into_iter()
        .map(|offering| {
            offering
                .active_product()
                .map(|product| (offering.key().clone(), product.clone()))
                .ok_or_else(|| ResolutionError::MissingActiveProduct(offering.key().clone()))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(ResolvedOfferings {
        entitlement: entitlement.clone(),
        products,
    })
}
