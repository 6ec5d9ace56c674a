//! Entity trait: identity that survives state changes.

/// Entity marker + minimal interface.
///
/// Medicines are entities keyed by their name; two records with the same
/// name describe the same inventory item even if their prices differ.
pub trait Entity {
    /// Identifier type (for medicines, the name itself).
    type Id: ?Sized + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
