//! Named identity shared by scene nodes and scenes

/// Display name of a node or scene
///
/// Names are labels only: two entities may share a name, and identity is
/// always the arena handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    name: String,
}

impl NamedEntity {
    /// Create an entity with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Current name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
