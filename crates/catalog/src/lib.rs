//! Catalog model: entitlements, offerings, products, and purchaser info.
//!
//! Pure data owned by the purchase provider (no IO). The core reads these
//! snapshots but never mutates the provider's catalog.

pub mod catalog;
pub mod product;
pub mod purchaser;

pub use catalog::{CatalogSnapshot, Entitlement, Offering};
pub use product::{Product, SubscriptionPeriod};
pub use purchaser::{PurchaserInfo, Transaction};
