//! Purchase provider boundary.
//!
//! Defines the async capability set the core needs from an external purchase
//! provider, plus an in-memory implementation for tests, demos and fixtures.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryPurchaseProvider, PurchaseScript};
pub use r#trait::PurchaseProvider;
