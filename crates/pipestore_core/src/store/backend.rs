//! Config-time backend selection.
//!
//! `Storage` owns the backend handle (a base directory or a SQLite
//! connection) and hands out per-model `AnyStore` views borrowing it.

use crate::config::StorageConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::error::RepoResult;
use crate::store::{Filter, FsStore, ModelStore, SqliteStore, StoredModel};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Backend handle shared by every repository of one configuration.
pub enum Storage {
    Filesystem { base_path: PathBuf },
    Sqlite { conn: Connection },
}

impl Storage {
    /// Opens the backend described by `config`.
    ///
    /// For SQLite this creates the parent directory, opens the database and
    /// applies migrations; for the file backend nothing touches the disk
    /// until the first write.
    pub fn open(config: &StorageConfig) -> RepoResult<Self> {
        let storage = match config {
            StorageConfig::Filesystem { base_path } => Self::Filesystem {
                base_path: base_path.clone(),
            },
            StorageConfig::Sqlite { db_path: Some(path) } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Self::Sqlite {
                    conn: open_db(path)?,
                }
            }
            StorageConfig::Sqlite { db_path: None } => Self::Sqlite {
                conn: open_db_in_memory()?,
            },
        };
        info!(
            "event=storage_open module=store status=ok backend={}",
            storage.backend_name()
        );
        Ok(storage)
    }

    pub fn filesystem(base_path: impl AsRef<Path>) -> Self {
        Self::Filesystem {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn sqlite(conn: Connection) -> Self {
        Self::Sqlite { conn }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "fs",
            Self::Sqlite { .. } => "sqlite",
        }
    }

    /// Returns the store for model `M` on this backend.
    pub fn store<M: StoredModel>(&self) -> AnyStore<'_, M> {
        match self {
            Self::Filesystem { base_path } => AnyStore::Filesystem(FsStore::new(base_path)),
            Self::Sqlite { conn } => AnyStore::Sqlite(SqliteStore::new(conn)),
        }
    }
}

/// Either backend variant behind one static type.
pub enum AnyStore<'conn, M> {
    Filesystem(FsStore<M>),
    Sqlite(SqliteStore<'conn, M>),
}

impl<M: StoredModel> ModelStore<M> for AnyStore<'_, M> {
    fn save(&self, model: &M) -> RepoResult<()> {
        match self {
            Self::Filesystem(store) => store.save(model),
            Self::Sqlite(store) => store.save(model),
        }
    }

    fn load(&self, id: &str) -> RepoResult<M> {
        match self {
            Self::Filesystem(store) => store.load(id),
            Self::Sqlite(store) => store.load(id),
        }
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        match self {
            Self::Filesystem(store) => store.exists(id),
            Self::Sqlite(store) => store.exists(id),
        }
    }

    fn load_all(&self, filters: &[Filter]) -> RepoResult<Vec<M>> {
        match self {
            Self::Filesystem(store) => store.load_all(filters),
            Self::Sqlite(store) => store.load_all(filters),
        }
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        match self {
            Self::Filesystem(store) => store.delete(id),
            Self::Sqlite(store) => store.delete(id),
        }
    }

    fn delete_all(&self) -> RepoResult<()> {
        match self {
            Self::Filesystem(store) => store.delete_all(),
            Self::Sqlite(store) => store.delete_all(),
        }
    }

    fn export(&self, id: &str, target_dir: &Path) -> RepoResult<()> {
        match self {
            Self::Filesystem(store) => store.export(id, target_dir),
            Self::Sqlite(store) => store.export(id, target_dir),
        }
    }
}
