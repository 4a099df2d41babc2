//! Entity trait: identity + continuity across state changes.

/// A record stored on the ledger under a composite key.
pub trait Entity {
    /// Composite-key object type (namespace) this entity is stored under.
    const OBJECT_TYPE: &'static str;

    /// Returns the full ledger key of this entity.
    fn key(&self) -> &str;
}
