//! Shared fixtures for unit tests.

use core::str::FromStr;

use upsell_catalog::{CatalogSnapshot, Entitlement, Offering, Product, SubscriptionPeriod};
use upsell_core::{Decimal, EntitlementKey, OfferingKey, Price, PriceLocale, ProductId};

pub fn pro_cat() -> EntitlementKey {
    EntitlementKey::new("pro_cat").unwrap()
}

pub fn offering_key(raw: &str) -> OfferingKey {
    OfferingKey::new(raw).unwrap()
}

pub fn product(id: &str, amount: &str) -> Product {
    let price = Price::new(
        Decimal::from_str(amount).unwrap(),
        PriceLocale::new("USD", Some("$".to_string())).unwrap(),
    )
    .unwrap();
    Product::new(ProductId::new(id).unwrap(), id, price)
}

pub fn monthly() -> Product {
    product("cats.monthly", "4.99").with_subscription_period(SubscriptionPeriod::Month)
}

pub fn annual() -> Product {
    product("cats.annual", "39.99").with_subscription_period(SubscriptionPeriod::Year)
}

pub fn lifetime() -> Product {
    product("cats.lifetime", "99.99")
}

pub fn all_offering_keys() -> Vec<OfferingKey> {
    vec![
        offering_key("monthly_cats"),
        offering_key("annual_cats"),
        offering_key("lifetime_cats"),
    ]
}

pub fn catalog_with(offerings: Vec<(&str, Option<Product>)>) -> CatalogSnapshot {
    let entitlement = offerings
        .into_iter()
        .try_fold(Entitlement::new(pro_cat()), |acc, (key, product)| {
            acc.with_offering(Offering::new(offering_key(key), product))
        })
        .unwrap();
    CatalogSnapshot::new().with_entitlement(entitlement).unwrap()
}

/// `pro_cat` with monthly ($4.99), annual ($39.99) and lifetime ($99.99).
pub fn cats_catalog() -> CatalogSnapshot {
    catalog_with(vec![
        ("monthly_cats", Some(monthly())),
        ("annual_cats", Some(annual())),
        ("lifetime_cats", Some(lifetime())),
    ])
}
