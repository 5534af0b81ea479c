//! SQLite bootstrap for the relational backend.
//!
//! # Responsibility
//! - Open connections and bring them to the latest schema.
//! - Keep every entity table in line with its model's `COLUMNS`.
//!
//! # Invariants
//! - Applied schema version is tracked via `PRAGMA user_version`.
//! - A connection is only handed out after `schema::verify_schema` passes,
//!   so stores never meet a table that disagrees with their model.

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{verify_schema, verify_table};
