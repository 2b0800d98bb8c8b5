//! Paywall facade: resolver + orchestrator wired to one configuration.
//!
//! This is the surface a UI layer or CLI drives. It owns the readiness gate
//! (no purchase before `Ready`) and renders UI-independent button state.

use serde::{Deserialize, Serialize};

use upsell_core::OfferingKey;
use upsell_purchasing::{PurchaseResult, ResolutionState};

use crate::config::PaywallConfig;
use crate::orchestrator::PurchaseOrchestrator;
use crate::provider::PurchaseProvider;
use crate::resolver::OfferingResolver;

/// Where the caller should go after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// Show the gated content.
    ShowContent,
    /// Return the paywall to its pre-purchase state.
    StayOnPaywall,
}

impl From<&PurchaseResult> for NextStep {
    fn from(result: &PurchaseResult) -> Self {
        if result.is_success() {
            NextStep::ShowContent
        } else {
            NextStep::StayOnPaywall
        }
    }
}

/// Render state of one offering button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingButton {
    pub key: OfferingKey,
    pub title: String,
    /// `"<title> - <price>"` once Ready, otherwise unset.
    pub label: Option<String>,
    pub enabled: bool,
}

pub struct Paywall<P> {
    config: PaywallConfig,
    resolver: OfferingResolver<P>,
    orchestrator: PurchaseOrchestrator<P>,
}

impl<P> Paywall<P>
where
    P: PurchaseProvider + Clone,
{
    pub fn new(provider: P, config: PaywallConfig) -> Self {
        let orchestrator = PurchaseOrchestrator::new(provider.clone(), config.entitlement.clone());
        Self {
            resolver: OfferingResolver::new(provider),
            orchestrator,
            config,
        }
    }

    pub fn config(&self) -> &PaywallConfig {
        &self.config
    }

    pub fn state(&self) -> &ResolutionState {
        self.resolver.state()
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    pub fn is_entitled(&self) -> bool {
        self.orchestrator.is_entitled()
    }

    /// Resolve every configured offering (one catalog fetch).
    pub async fn load(&mut self) -> &ResolutionState {
        let keys = self.config.offering_keys();
        self.resolver.resolve(&self.config.entitlement, &keys).await
    }

    /// Buttons in configured order.
    pub fn buttons(&self) -> Vec<OfferingButton> {
        let state = self.resolver.state();
        self.config
            .offerings
            .iter()
            .map(|slot| {
                let label = state
                    .product(&slot.key)
                    .map(|product| format!("{} - {}", slot.title, product.price_label()));
                OfferingButton {
                    key: slot.key.clone(),
                    title: slot.title.clone(),
                    enabled: label.is_some(),
                    label,
                }
            })
            .collect()
    }

    /// Purchase the product behind `key`.
    ///
    /// Returns `None` without calling the provider when the paywall is not
    /// Ready or `key` is not a resolved offering.
    pub async fn purchase_offering(&mut self, key: &OfferingKey) -> Option<PurchaseResult> {
        let Some(product) = self.resolver.state().product(key).cloned() else {
            tracing::debug!(offering = %key, "purchase ignored: offering not ready");
            return None;
        };
        Some(self.orchestrator.purchase(&product).await)
    }

    /// Leave the paywall without buying.
    pub fn skip(&self) -> NextStep {
        NextStep::ShowContent
    }
}
