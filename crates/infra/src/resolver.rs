//! Offering resolution against the provider's catalog.

use upsell_core::{EntitlementKey, OfferingKey};
use upsell_purchasing::{ResolutionError, ResolutionState, resolve_offerings};

use crate::provider::PurchaseProvider;

/// Turns one catalog fetch into a UI-ready map of named products.
///
/// Every `resolve` call performs exactly one catalog fetch and replaces the
/// current state wholesale; there is no retry and no partial population.
pub struct OfferingResolver<P> {
    provider: P,
    state: ResolutionState,
}

impl<P> OfferingResolver<P>
where
    P: PurchaseProvider,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: ResolutionState::Loading,
        }
    }

    /// Current readiness (for gating purchases and rendering prices).
    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub async fn resolve(
        &mut self,
        entitlement: &EntitlementKey,
        required: &[OfferingKey],
    ) -> &ResolutionState {
        self.state = ResolutionState::Loading;
        tracing::debug!(
            entitlement = %entitlement,
            offerings = required.len(),
            "fetching entitlement catalog"
        );

        let next = match self.provider.fetch_entitlements().await {
            Err(err) => {
                tracing::warn!(error = %err, "catalog fetch failed");
                ResolutionState::Failed(ResolutionError::CatalogFetch(err))
            }
            Ok(catalog) => match resolve_offerings(&catalog, entitlement, required) {
                Ok(offerings) => {
                    tracing::info!(
                        entitlement = %entitlement,
                        offerings = offerings.len(),
                        "all offerings resolved"
                    );
                    ResolutionState::Ready(offerings)
                }
                Err(err) => {
                    tracing::warn!(entitlement = %entitlement, error = %err, "offering resolution failed");
                    ResolutionState::Failed(err)
                }
            },
        };

        self.state = next;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::provider::InMemoryPurchaseProvider;
    use crate::test_support::{
        all_offering_keys, annual, catalog_with, cats_catalog, monthly, offering_key, pro_cat,
    };
    use upsell_catalog::CatalogSnapshot;
    use upsell_purchasing::ProviderError;

    #[tokio::test]
    async fn starts_loading() {
        let resolver = OfferingResolver::new(InMemoryPurchaseProvider::new(cats_catalog()));
        assert!(resolver.state().is_loading());
    }

    #[tokio::test]
    async fn resolves_three_cat_offerings() {
        let provider = Arc::new(InMemoryPurchaseProvider::new(cats_catalog()));
        let mut resolver = OfferingResolver::new(provider.clone());

        let state = resolver.resolve(&pro_cat(), &all_offering_keys()).await;
        let offerings = state.offerings().unwrap();
        assert_eq!(offerings.len(), 3);
        assert_eq!(
            offerings.product(&offering_key("annual_cats")).unwrap().price_label(),
            "$39.99"
        );
        assert_eq!(provider.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn missing_lifetime_offering_fails_with_its_key() {
        let catalog = catalog_with(vec![
            ("monthly_cats", Some(monthly())),
            ("annual_cats", Some(annual())),
        ]);
        let mut resolver = OfferingResolver::new(InMemoryPurchaseProvider::new(catalog));

        let state = resolver.resolve(&pro_cat(), &all_offering_keys()).await;
        assert_eq!(
            state.error().map(ToString::to_string).as_deref(),
            Some("lifetime_cats offering not found")
        );
    }

    #[tokio::test]
    async fn fetch_error_fails_without_partial_state() {
        let provider = Arc::new(
            InMemoryPurchaseProvider::new(cats_catalog())
                .with_fetch_error(ProviderError::network("offline")),
        );
        let mut resolver = OfferingResolver::new(provider.clone());

        let state = resolver.resolve(&pro_cat(), &all_offering_keys()).await;
        assert_eq!(
            state,
            &ResolutionState::Failed(ResolutionError::CatalogFetch(ProviderError::network(
                "offline"
            )))
        );
        assert!(state.offerings().is_none());
        assert_eq!(provider.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn re_resolve_replaces_state() {
        let provider = Arc::new(InMemoryPurchaseProvider::new(CatalogSnapshot::new()));
        let mut resolver = OfferingResolver::new(provider.clone());

        assert!(resolver.resolve(&pro_cat(), &all_offering_keys()).await.error().is_some());

        provider.set_catalog(cats_catalog());
        assert!(resolver.resolve(&pro_cat(), &all_offering_keys()).await.is_ready());

        provider.set_fetch_error(Some(ProviderError::network("offline")));
        assert!(resolver.resolve(&pro_cat(), &all_offering_keys()).await.error().is_some());
        assert_eq!(provider.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn same_snapshot_yields_equal_states() {
        let mut resolver = OfferingResolver::new(InMemoryPurchaseProvider::new(cats_catalog()));

        let first = resolver.resolve(&pro_cat(), &all_offering_keys()).await.clone();
        let second = resolver.resolve(&pro_cat(), &all_offering_keys()).await.clone();
        assert_eq!(first, second);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: one catalog fetch per resolve, whatever the number of keys.
            #[test]
            fn one_fetch_per_resolve(keys in proptest::collection::vec("[a-z_]{1,12}", 0..20)) {
                let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
                let provider = Arc::new(InMemoryPurchaseProvider::new(cats_catalog()));
                let mut resolver = OfferingResolver::new(provider.clone());
                let required: Vec<_> = keys.iter().map(|k| offering_key(k)).collect();

                runtime.block_on(resolver.resolve(&pro_cat(), &required));
                prop_assert_eq!(provider.fetch_calls(), 1);
            }
        }
    }
}
