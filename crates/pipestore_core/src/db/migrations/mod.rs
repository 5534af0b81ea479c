//! Ordered schema migrations.
//!
//! Each step runs inside one transaction together with the
//! `PRAGMA user_version` bump that records it.

use crate::db::schema::create_table_sql;
use crate::error::{RepoError, RepoResult};
use crate::model::data_source::DataSourceModel;
use crate::model::task::TaskModel;
use crate::model::version::VersionModel;
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    apply: create_entity_tables,
}];

fn create_entity_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&create_table_sql::<VersionModel>())?;
    conn.execute_batch(&create_table_sql::<DataSourceModel>())?;
    conn.execute_batch(&create_table_sql::<TaskModel>())?;
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_version_name ON version(name);
         CREATE INDEX IF NOT EXISTS idx_task_parent_id ON task(parent_id);",
    )
}

/// Latest schema version this binary can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`; refuses newer databases.
pub fn apply_migrations(conn: &mut Connection) -> RepoResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(RepoError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current);
    let tx = conn.transaction()?;
    for migration in pending {
        (migration.apply)(&tx)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        info!(
            "event=db_migrate module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;
    Ok(())
}
