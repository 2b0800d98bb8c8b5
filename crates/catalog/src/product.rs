use serde::{Deserialize, Serialize};

use upsell_core::{Entity, Price, ProductId};

/// Billing period of an auto-renewing product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPeriod {
    Week,
    Month,
    Year,
}

/// A purchasable SKU as reported by the store.
///
/// Products are owned by the purchase provider; the core only ever holds
/// copies taken from a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    price: Price,
    /// `None` for one-off (lifetime) purchases.
    #[serde(default)]
    subscription_period: Option<SubscriptionPeriod>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            subscription_period: None,
        }
    }

    pub fn with_subscription_period(mut self, period: SubscriptionPeriod) -> Self {
        self.subscription_period = Some(period);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn subscription_period(&self) -> Option<SubscriptionPeriod> {
        self.subscription_period
    }

    pub fn is_subscription(&self) -> bool {
        self.subscription_period.is_some()
    }

    /// `<currency-symbol><amount>`, e.g. `$39.99`.
    pub fn price_label(&self) -> String {
        self.price.label()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
