//! Backend stores for flat models.
//!
//! # Responsibility
//! - Define the backend-agnostic capability set every store implements.
//! - Provide the file-based and SQLite-based variants plus config-time
//!   selection between them.
//!
//! # Invariants
//! - Every operation is keyed by the model id inside its own collection.
//! - `load` and `delete` report `ModelNotFound` for absent ids; `exists`,
//!   `load_all`, `delete_all` and `save` never do.
//! - `delete_many` skips ids that are already gone.

use crate::error::{RepoError, RepoResult};
use crate::model::EntityKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

mod backend;
mod fs_store;
mod json_file;
mod sqlite_store;

pub use backend::{AnyStore, Storage};
pub use fs_store::FsStore;
pub use sqlite_store::SqliteStore;

static MODEL_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^./\\\x00][^/\\\x00]*$").expect("valid model id regex")
});

/// How a flat-model field is laid out in a SQLite column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    /// Nested value stored as JSON text.
    Json,
}

impl ColumnKind {
    /// Declared SQLite type of the column.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Text | Self::Json => "TEXT",
            Self::Integer => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Column backing an `Option` field.
    pub const fn nullable(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

/// A serializable flat model that a store can persist.
///
/// `COLUMNS` lists every top-level serialized field, `id` first. The SQLite
/// table of the model is created from it and checked against it on open.
pub trait StoredModel: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    const KIND: EntityKind;
    const COLUMNS: &'static [Column];

    fn id(&self) -> &str;

    fn collection() -> &'static str {
        Self::KIND.collection()
    }

    fn column(name: &str) -> Option<&'static Column> {
        Self::COLUMNS.iter().find(|column| column.name == name)
    }
}

/// Exact-match condition on one flat-model field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: serde_json::Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Capability set shared by every backend.
pub trait ModelStore<M: StoredModel> {
    /// Creates or overwrites the record with `model.id()`.
    fn save(&self, model: &M) -> RepoResult<()>;

    fn load(&self, id: &str) -> RepoResult<M>;

    fn exists(&self, id: &str) -> RepoResult<bool>;

    /// Returns records matching every filter, ordered by id.
    fn load_all(&self, filters: &[Filter]) -> RepoResult<Vec<M>>;

    fn delete(&self, id: &str) -> RepoResult<()>;

    fn delete_all(&self) -> RepoResult<()>;

    /// Writes `<id>.json` below `target_dir` for inspection or migration.
    fn export(&self, id: &str, target_dir: &Path) -> RepoResult<()>;

    fn search(&self, field: &str, value: serde_json::Value) -> RepoResult<Vec<M>> {
        self.load_all(&[Filter::eq(field, value)])
    }

    /// Deletes every listed id that exists and returns how many were removed.
    ///
    /// Missing ids are skipped; transport errors still abort.
    fn delete_many(&self, ids: &[&str]) -> RepoResult<usize> {
        let mut deleted = 0;
        for id in ids {
            match self.delete(id) {
                Ok(()) => deleted += 1,
                Err(RepoError::ModelNotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(deleted)
    }
}

/// Returns whether `id` can name a record in any backend.
///
/// Ids must be non-empty, must not start with `.`, and must not contain a
/// path separator or NUL.
pub fn is_valid_model_id(id: &str) -> bool {
    MODEL_ID_PATTERN.is_match(id)
}

pub(crate) fn validate_model_id(id: &str) -> RepoResult<()> {
    if is_valid_model_id(id) {
        Ok(())
    } else {
        Err(RepoError::InvalidId(id.to_string()))
    }
}
