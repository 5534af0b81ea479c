//! Persistence core for pipeline entities.
//!
//! Stores versions, data-source descriptors and tasks through either a
//! JSON-file backend or a SQLite backend, converting between live domain
//! entities and flat identifier-only models at the repository boundary.

pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repo;
pub mod store;

pub use config::{ConfigError, CoreConfig, LoggingConfig, StorageConfig};
pub use convert::{DataSourceConverter, ModelConverter, TaskConverter, VersionConverter};
pub use error::{RepoError, RepoResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::data_source::{DataSource, DataSourceModel, Scope};
pub use model::task::{Task, TaskFunction, TaskModel};
pub use model::version::{Version, VersionModel};
pub use model::EntityKind;
pub use registry::{DataSourceLookup, DataSourceRegistry};
pub use repo::{DataSourceRepository, Repository, TaskRepository, VersionRepository};
pub use store::{AnyStore, Filter, FsStore, ModelStore, SqliteStore, Storage, StoredModel};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
