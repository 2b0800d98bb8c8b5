//! `upsell-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no provider access).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntitlementKey, OfferingKey, ProductId};
pub use value_object::{Price, PriceLocale, ValueObject};

pub use rust_decimal::Decimal;
