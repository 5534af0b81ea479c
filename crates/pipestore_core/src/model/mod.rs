//! Domain entities and their flat persisted shadows.
//!
//! # Responsibility
//! - Define the live entities used by the orchestration layer.
//! - Define one serializable flat model per entity type.
//!
//! # Invariants
//! - Flat models hold identifiers only, never live object references.
//! - Every flat model maps to exactly one `EntityKind` namespace.

pub mod data_source;
pub mod task;
pub mod version;

/// Static tag selecting the storage namespace of an entity type.
///
/// The namespace is a sub-directory for the file backend and a table for
/// the SQLite backend, so equal ids of different kinds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Version,
    DataSource,
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Version, Self::DataSource, Self::Task];

    /// Directory / table name for this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::DataSource => "data_source",
            Self::Task => "task",
        }
    }

    /// Reverse lookup used by command-line entry points.
    pub fn from_collection(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection() == value)
    }
}
