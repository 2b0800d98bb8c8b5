//! Purchase execution and outcome classification.

use std::collections::BTreeSet;

use uuid::Uuid;

use upsell_catalog::Product;
use upsell_core::{Entity, EntitlementKey};
use upsell_purchasing::{PurchaseResult, classify_purchase};

use crate::provider::PurchaseProvider;

/// Executes purchases for one target entitlement.
///
/// One provider call per `purchase`, never retried. `&mut self` keeps a
/// single purchase in flight per orchestrator; the next one may start as soon
/// as the previous call returns.
pub struct PurchaseOrchestrator<P> {
    provider: P,
    entitlement: EntitlementKey,
    active_entitlements: BTreeSet<EntitlementKey>,
}

impl<P> PurchaseOrchestrator<P>
where
    P: PurchaseProvider,
{
    pub fn new(provider: P, entitlement: EntitlementKey) -> Self {
        Self {
            provider,
            entitlement,
            active_entitlements: BTreeSet::new(),
        }
    }

    pub fn entitlement(&self) -> &EntitlementKey {
        &self.entitlement
    }

    /// Entitlements the provider last reported as active for this user.
    ///
    /// Only a completed purchase call updates this; a provider error leaves it
    /// untouched.
    pub fn active_entitlements(&self) -> &BTreeSet<EntitlementKey> {
        &self.active_entitlements
    }

    pub fn is_entitled(&self) -> bool {
        self.active_entitlements.contains(&self.entitlement)
    }

    /// Purchase `product`, which must come from a Ready resolution.
    pub async fn purchase(&mut self, product: &Product) -> PurchaseResult {
        let attempt_id = Uuid::now_v7();
        tracing::info!(
            %attempt_id,
            product_id = %product.id(),
            title = product.title(),
            amount = %product.price().amount(),
            currency = product.price().locale().currency_code(),
            "purchase started"
        );

        let response = self.provider.execute_purchase(product).await;
        if let Ok(completion) = &response {
            self.active_entitlements = completion.purchaser_info.active_entitlements().clone();
        }

        let result = classify_purchase(&self.entitlement, response);
        if let PurchaseResult::Failure(err) = &result {
            tracing::error!(%attempt_id, error = %err, "purchase error");
        }
        tracing::info!(
            %attempt_id,
            entitlement = %self.entitlement,
            outcome = result.kind(),
            "purchase finished"
        );

        result
    }
}
