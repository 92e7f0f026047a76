//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Storage adapters key their tables by `Entity::Id`, so any record with a stable
/// identity can live in a generic table.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
