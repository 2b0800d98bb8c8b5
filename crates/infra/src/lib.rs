//! Infrastructure layer: the purchase provider boundary and the async flows
//! that drive it.
//!
//! - [`provider`]: the `PurchaseProvider` capability set plus an in-memory store
//! - [`resolver`]: one catalog fetch → `ResolutionState`
//! - [`orchestrator`]: one purchase call → `PurchaseResult`
//! - [`paywall`]: both of the above behind one configuration
//! - [`config`]: environment-driven paywall configuration

pub mod config;
pub mod orchestrator;
pub mod paywall;
pub mod provider;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, OfferingSlot, PaywallConfig};
pub use orchestrator::PurchaseOrchestrator;
pub use paywall::{NextStep, OfferingButton, Paywall};
pub use provider::{InMemoryPurchaseProvider, PurchaseProvider, PurchaseScript};
pub use resolver::OfferingResolver;
