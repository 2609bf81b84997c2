//! Entity trait: records that keep their identity while their values change.

/// Entity marker + minimal interface.
///
/// Expenses are entities (the host persists them and edits them in place);
/// drafts produced from them are value objects.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
