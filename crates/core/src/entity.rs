//! Entity trait: identity + continuity across catalog refreshes.

/// Entity marker + minimal interface.
///
/// A product fetched twice is the same product if its identifier matches, even
/// when its price changed between fetches.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
