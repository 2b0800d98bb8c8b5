//! Offering resolution and purchase classification (pure domain logic).
//!
//! This crate decides what a fetched catalog and a purchase response *mean*
//! for the paywall: which products are ready to sell, and whether a purchase
//! unlocked the entitlement. It performs no IO; the provider calls themselves
//! live behind the infrastructure layer.

pub mod outcome;
pub mod provider;
pub mod resolution;

pub use outcome::{PurchaseResult, classify_purchase};
pub use provider::{ProviderError, PurchaseCompletion};
pub use resolution::{ResolutionError, ResolutionState, ResolvedOfferings, resolve_offerings};
