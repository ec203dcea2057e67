//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Items and journal records are both entities: an item keeps its identifier
/// across every stock movement, and records are referenced by id from the
/// persisted snapshot.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
