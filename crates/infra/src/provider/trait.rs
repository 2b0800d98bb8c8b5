use std::sync::Arc;

use upsell_catalog::{CatalogSnapshot, Product};
use upsell_purchasing::{ProviderError, PurchaseCompletion};

/// The external purchase provider (store SDK, billing backend, ...).
///
/// The core reaches the provider only through this capability set, injected at
/// construction. Both calls may suspend for as long as the provider needs
/// (a purchase waits on the user in the store sheet); neither is retried or
/// cancelled by the core.
///
/// ## Call contract
///
/// - `fetch_entitlements` returns the whole catalog: every entitlement, its
///   offerings, and each offering's current active product.
/// - `execute_purchase` buys exactly the given product and reports the
///   purchaser's entitlements afterwards, plus the provider's own
///   cancellation flag.
/// - Timeouts and transport retries, if any, belong to the implementation.
#[async_trait::async_trait]
pub trait PurchaseProvider: Send + Sync {
    async fn fetch_entitlements(&self) -> Result<CatalogSnapshot, ProviderError>;

    async fn execute_purchase(
        &self,
        product: &Product,
    ) -> Result<PurchaseCompletion, ProviderError>;
}

#[async_trait::async_trait]
impl<P> PurchaseProvider for Arc<P>
where
    P: PurchaseProvider + ?Sized,
{
    async fn fetch_entitlements(&self) -> Result<CatalogSnapshot, ProviderError> {
        (**self).fetch_entitlements().await
    }

    async fn execute_purchase(
        &self,
        product: &Product,
    ) -> Result<PurchaseCompletion, ProviderError> {
        (**self).execute_purchase(product).await
    }
}
