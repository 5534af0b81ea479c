//! Entity-level repositories.
//!
//! # Responsibility
//! - Compose one converter with one store behind a uniform entity API.
//! - Keep callers unaware of which backend is active.
//!
//! # Invariants
//! - No caching: every load resolves references again.
//! - No transaction spans more than one store call.

mod repository;

pub use repository::{DataSourceRepository, Repository, TaskRepository, VersionRepository};
