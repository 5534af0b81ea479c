//! Entity tables derived from flat-model column metadata.
//!
//! `create_table_sql` is the only place DDL for an entity is written, and
//! `verify_table` reads the live table back through `PRAGMA table_info` to
//! catch databases whose layout drifted from the model.

use crate::error::{RepoError, RepoResult};
use crate::model::data_source::DataSourceModel;
use crate::model::task::TaskModel;
use crate::model::version::VersionModel;
use crate::store::{Column, StoredModel};
use rusqlite::Connection;

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

impl TableColumn {
    fn expected(column: &Column) -> Self {
        let primary_key = column.name == "id";
        Self {
            name: column.name.to_string(),
            declared_type: column.kind.sql_type().to_string(),
            not_null: primary_key || !column.nullable,
            primary_key,
        }
    }
}

/// `CREATE TABLE` statement for `M`, keyed by a unique `id` column.
pub fn create_table_sql<M: StoredModel>() -> String {
    let definitions = M::COLUMNS
        .iter()
        .map(|column| {
            let expected = TableColumn::expected(column);
            let mut definition = format!("{} {}", expected.name, expected.declared_type);
            if expected.primary_key {
                definition.push_str(" PRIMARY KEY");
            }
            if expected.not_null {
                definition.push_str(" NOT NULL");
            }
            definition
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({definitions});", M::collection())
}

/// Reads the live layout of `table`; empty when the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<TableColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let rows = stmt.query_map([], |row| {
        Ok(TableColumn {
            name: row.get("name")?,
            declared_type: row.get("type")?,
            not_null: row.get::<_, i64>("notnull")? != 0,
            primary_key: row.get::<_, i64>("pk")? != 0,
        })
    })?;

    let mut columns = Vec::new();
    for column in rows {
        columns.push(column?);
    }
    Ok(columns)
}

/// Checks that the table of `M` has exactly `M::COLUMNS`, in order.
pub fn verify_table<M: StoredModel>(conn: &Connection) -> RepoResult<()> {
    let actual = table_columns(conn, M::collection())?;
    let expected = M::COLUMNS
        .iter()
        .map(TableColumn::expected)
        .collect::<Vec<_>>();

    if actual.is_empty() {
        return Err(RepoError::SchemaMismatch {
            table: M::collection(),
            detail: "table is missing".to_string(),
        });
    }
    if actual.len() != expected.len() {
        return Err(RepoError::SchemaMismatch {
            table: M::collection(),
            detail: format!(
                "expected {} columns, found {}",
                expected.len(),
                actual.len()
            ),
        });
    }
    for (want, have) in expected.iter().zip(&actual) {
        if want != have {
            return Err(RepoError::SchemaMismatch {
                table: M::collection(),
                detail: format!("expected column {want:?}, found {have:?}"),
            });
        }
    }
    Ok(())
}

/// Verifies the table of every persisted model.
pub fn verify_schema(conn: &Connection) -> RepoResult<()> {
    verify_table::<VersionModel>(conn)?;
    verify_table::<DataSourceModel>(conn)?;
    verify_table::<TaskModel>(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{create_table_sql, verify_table};
    use crate::error::RepoError;
    use crate::model::task::TaskModel;
    use crate::model::version::VersionModel;
    use rusqlite::Connection;

    #[test]
    fn create_table_sql_follows_column_metadata() {
        assert_eq!(
            create_table_sql::<TaskModel>(),
            "CREATE TABLE IF NOT EXISTS task (id TEXT PRIMARY KEY NOT NULL, \
             parent_id TEXT, config_name TEXT NOT NULL, input_ids TEXT NOT NULL, \
             output_ids TEXT NOT NULL, function_name TEXT NOT NULL, \
             function_module TEXT NOT NULL);"
        );
    }

    #[test]
    fn generated_table_passes_verification() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&create_table_sql::<VersionModel>()).unwrap();

        verify_table::<VersionModel>(&conn).unwrap();
    }

    #[test]
    fn missing_or_reordered_columns_are_reported() {
        let conn = Connection::open_in_memory().unwrap();
        let err = verify_table::<VersionModel>(&conn).unwrap_err();
        assert!(matches!(err, RepoError::SchemaMismatch { table: "version", .. }));

        conn.execute_batch(
            "CREATE TABLE version (
                id TEXT PRIMARY KEY NOT NULL,
                config TEXT NOT NULL,
                name TEXT NOT NULL,
                creation_date INTEGER NOT NULL
            );",
        )
        .unwrap();
        let err = verify_table::<VersionModel>(&conn).unwrap_err();
        assert!(err.to_string().contains("config"));
    }
}
