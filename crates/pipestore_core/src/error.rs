//! Error taxonomy shared by converters, stores and repositories.
//!
//! # Invariants
//! - `ModelNotFound` is only produced by `load` and `delete`.
//! - `ReferencedEntityNotFound` is only produced while converting a flat
//!   model back into a domain entity.
//! - Transport errors (`Io`, `Sqlite`) are wrapped without retry.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// No record with `id` exists in `collection`.
    ModelNotFound { collection: &'static str, id: String },
    /// A flat model references an id the registry cannot resolve.
    ReferencedEntityNotFound { id: String },
    InvalidId(String),
    InvalidData(String),
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
    /// The database was written by a newer schema than this binary knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A table does not match the column metadata of its model.
    SchemaMismatch { table: &'static str, detail: String },
}

impl RepoError {
    /// Returns whether this error reports a missing backend record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelNotFound { collection, id } => {
                write!(f, "model not found in `{collection}`: {id}")
            }
            Self::ReferencedEntityNotFound { id } => {
                write!(f, "referenced entity not found: {id}")
            }
            Self::InvalidId(id) => write!(f, "invalid model id `{id}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted model data: {message}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::SchemaMismatch { table, detail } => {
                write!(f, "table `{table}` does not match its model: {detail}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::ModelNotFound { .. }
            | Self::ReferencedEntityNotFound { .. }
            | Self::InvalidId(_)
            | Self::InvalidData(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::SchemaMismatch { .. } => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
