use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use upsell_catalog::{CatalogSnapshot, Product, PurchaserInfo, SubscriptionPeriod, Transaction};
use upsell_core::{Entity, ProductId};
use upsell_purchasing::{ProviderError, PurchaseCompletion};

use super::r#trait::PurchaseProvider;

/// How the in-memory store answers a purchase of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum PurchaseScript {
    /// Grant the entitlement that owns the product.
    #[default]
    Grant,
    /// Report the provider's user-cancelled flag.
    Cancel,
    /// Fail with a provider error.
    Fail { error: ProviderError },
    /// Complete without error and without granting anything.
    Complete,
}

/// In-memory purchase provider.
///
/// Intended for tests, demos and fixtures. Counts every call so callers can
/// assert exactly-once semantics.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseProvider {
    catalog: RwLock<CatalogSnapshot>,
    fetch_error: RwLock<Option<ProviderError>>,
    scripts: RwLock<HashMap<ProductId, PurchaseScript>>,
    purchaser: RwLock<PurchaserInfo>,
    fetch_calls: AtomicUsize,
    purchase_calls: AtomicUsize,
}

impl InMemoryPurchaseProvider {
    pub fn new(catalog: CatalogSnapshot) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            ..Self::default()
        }
    }

    /// Make every catalog fetch fail with `error`.
    pub fn with_fetch_error(self, error: ProviderError) -> Self {
        self.set_fetch_error(Some(error));
        self
    }

    pub fn with_script(self, product_id: ProductId, script: PurchaseScript) -> Self {
        self.set_script(product_id, script);
        self
    }

    pub fn with_purchaser(self, purchaser: PurchaserInfo) -> Self {
        *write_recovering(&self.purchaser, "purchaser") = purchaser;
        self
    }

    pub fn set_catalog(&self, catalog: CatalogSnapshot) {
        *write_recovering(&self.catalog, "catalog") = catalog;
    }

    pub fn set_fetch_error(&self, error: Option<ProviderError>) {
        *write_recovering(&self.fetch_error, "fetch_error") = error;
    }

    pub fn set_script(&self, product_id: ProductId, script: PurchaseScript) {
        write_recovering(&self.scripts, "scripts").insert(product_id, script);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn purchase_calls(&self) -> usize {
        self.purchase_calls.load(Ordering::SeqCst)
    }

    /// Current purchaser state as the store sees it.
    pub fn purchaser_info(&self) -> Result<PurchaserInfo, ProviderError> {
        let purchaser = self.purchaser.read().map_err(|_| poisoned())?;
        Ok(purchaser.clone())
    }

    fn script_for(&self, product_id: &ProductId) -> Result<PurchaseScript, ProviderError> {
        let scripts = self.scripts.read().map_err(|_| poisoned())?;
        Ok(scripts.get(product_id).cloned().unwrap_or_default())
    }

    fn grant(&self, product: &Product) -> Result<PurchaseCompletion, ProviderError> {
        let entitlement = {
            let catalog = self.catalog.read().map_err(|_| poisoned())?;
            let (entitlement, _) = catalog.find_product(product.id()).ok_or_else(|| {
                ProviderError::store(format!("unknown product {}", product.id()))
            })?;
            entitlement.clone()
        };

        let purchased_at = Utc::now();
        let expires_at = product
            .subscription_period()
            .and_then(|period| expiry_after(period, purchased_at));

        let mut purchaser = self.purchaser.write().map_err(|_| poisoned())?;
        purchaser.record_grant(entitlement, product.id().clone(), purchased_at, expires_at);

        Ok(PurchaseCompletion {
            transaction: Some(Transaction {
                transaction_id: Uuid::now_v7().to_string(),
                product_id: product.id().clone(),
                purchased_at,
            }),
            purchaser_info: purchaser.clone(),
            user_cancelled: false,
        })
    }
}

fn poisoned() -> ProviderError {
    ProviderError::Unknown("in-memory store lock poisoned".to_string())
}

/// Write access for setters: a poisoned lock is logged, cleared and written.
fn write_recovering<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|err| {
        tracing::warn!(store, "in-memory store lock poisoned; overwriting");
        lock.clear_poison();
        err.into_inner()
    })
}

fn expiry_after(period: SubscriptionPeriod, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match period {
        SubscriptionPeriod::Week => from.checked_add_signed(chrono::Duration::days(7)),
        SubscriptionPeriod::Month => from.checked_add_months(Months::new(1)),
        SubscriptionPeriod::Year => from.checked_add_months(Months::new(12)),
    }
}

#[async_trait::async_trait]
impl PurchaseProvider for InMemoryPurchaseProvider {
    async fn fetch_entitlements(&self) -> Result<CatalogSnapshot, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.fetch_error.read().map_err(|_| poisoned())?.clone() {
            return Err(err);
        }

        let catalog = self.catalog.read().map_err(|_| poisoned())?;
        Ok(catalog.clone())
    }

    async fn execute_purchase(
        &self,
        product: &Product,
    ) -> Result<PurchaseCompletion, ProviderError> {
        self.purchase_calls.fetch_add(1, Ordering::SeqCst);

        match self.script_for(product.id())? {
            PurchaseScript::Grant => self.grant(product),
            PurchaseScript::Cancel => Ok(PurchaseCompletion::cancelled(self.purchaser_info()?)),
            PurchaseScript::Fail { error } => Err(error),
            PurchaseScript::Complete => Ok(PurchaseCompletion {
                transaction: None,
                purchaser_info: self.purchaser_info()?,
                user_cancelled: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cats_catalog, pro_cat, product};
    use upsell_catalog::SubscriptionPeriod;

    #[tokio::test]
    async fn fetch_returns_catalog_and_counts_calls() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog());

        let catalog = provider.fetch_entitlements().await.unwrap();
        assert!(catalog.entitlement(&pro_cat()).is_some());
        assert_eq!(provider.fetch_calls(), 1);
        assert_eq!(provider.purchase_calls(), 0);
    }

    #[tokio::test]
    async fn scripted_fetch_error_is_returned() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog())
            .with_fetch_error(ProviderError::network("offline"));

        let err = provider.fetch_entitlements().await.unwrap_err();
        assert_eq!(err, ProviderError::network("offline"));
        assert_eq!(provider.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn grant_records_entitlement_with_expiry() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog());
        let annual = product("cats.annual", "39.99").with_subscription_period(SubscriptionPeriod::Year);

        let completion = provider.execute_purchase(&annual).await.unwrap();
        let info = &completion.purchaser_info;
        assert!(info.is_entitled_to(&pro_cat()));

        let purchased = info.purchase_date_for(&pro_cat()).unwrap();
        let expires = info.expiration_date_for(&pro_cat()).unwrap().unwrap();
        assert_eq!(expires, purchased.checked_add_months(Months::new(12)).unwrap());

        let transaction = completion.transaction.unwrap();
        assert_eq!(transaction.product_id.as_str(), "cats.annual");
        assert!(provider.purchaser_info().unwrap().is_entitled_to(&pro_cat()));
    }

    #[tokio::test]
    async fn lifetime_grant_never_expires() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog());
        let lifetime = product("cats.lifetime", "99.99");

        let completion = provider.execute_purchase(&lifetime).await.unwrap();
        assert_eq!(
            completion.purchaser_info.expiration_date_for(&pro_cat()),
            Some(None)
        );
    }

    #[tokio::test]
    async fn unknown_product_is_a_store_error() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog());
        let err = provider
            .execute_purchase(&product("dogs.annual", "1.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Store(_)));
        assert_eq!(provider.purchase_calls(), 1);
    }

    #[tokio::test]
    async fn scripts_override_default_grant() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog())
            .with_script(ProductId::new("cats.monthly").unwrap(), PurchaseScript::Cancel)
            .with_script(ProductId::new("cats.annual").unwrap(), PurchaseScript::Complete);

        let cancelled = provider
            .execute_purchase(&product("cats.monthly", "4.99"))
            .await
            .unwrap();
        assert!(cancelled.user_cancelled);

        let completed = provider
            .execute_purchase(&product("cats.annual", "39.99"))
            .await
            .unwrap();
        assert!(!completed.user_cancelled);
        assert!(!completed.purchaser_info.is_entitled_to(&pro_cat()));
        assert_eq!(provider.purchase_calls(), 2);
    }

    #[test]
    fn script_serde_uses_behavior_tag() {
        let script: PurchaseScript = serde_json::from_str(
            r#"{"behavior": "fail", "error": {"kind": "network", "message": "network timeout"}}"#,
        )
        .unwrap();
        assert_eq!(
            script,
            PurchaseScript::Fail {
                error: ProviderError::network("network timeout")
            }
        );
    }

    fn poison<T>(lock: &RwLock<T>) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = lock.write().unwrap();
            panic!("writer panicked while holding the lock");
        }));
        assert!(lock.is_poisoned());
    }

    #[tokio::test]
    async fn setter_takes_over_a_poisoned_lock() {
        let provider = InMemoryPurchaseProvider::new(CatalogSnapshot::new());
        poison(&provider.catalog);

        provider.set_catalog(cats_catalog());
        assert!(!provider.catalog.is_poisoned());

        let catalog = provider.fetch_entitlements().await.unwrap();
        assert!(catalog.entitlement(&pro_cat()).is_some());
    }

    #[tokio::test]
    async fn poisoned_purchaser_is_an_error_not_an_empty_purchaser() {
        let provider = InMemoryPurchaseProvider::new(cats_catalog())
            .with_script(ProductId::new("cats.annual").unwrap(), PurchaseScript::Complete);
        poison(&provider.purchaser);

        assert_eq!(provider.purchaser_info().unwrap_err(), poisoned());
        let err = provider
            .execute_purchase(&product("cats.annual", "39.99"))
            .await
            .unwrap_err();
        assert_eq!(err, poisoned());
    }
}
