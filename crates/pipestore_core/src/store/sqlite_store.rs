//! SQLite-backed store: one table per entity kind, one row per record.
//!
//! # Invariants
//! - Table name is `M::collection()`; columns are `M::COLUMNS`.
//! - Each write is a single upsert statement; no multi-statement transaction.
//! - SQL identifiers are only ever taken from static column metadata, never
//!   from caller input.

use crate::error::{RepoError, RepoResult};
use crate::store::json_file::{model_file_name, write_model};
use crate::store::{validate_model_id, Column, ColumnKind, Filter, ModelStore, StoredModel};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;
use std::path::Path;

pub struct SqliteStore<'conn, M> {
    conn: &'conn Connection,
    _model: PhantomData<fn() -> M>,
}

impl<'conn, M: StoredModel> SqliteStore<'conn, M> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _model: PhantomData,
        }
    }

    fn table() -> &'static str {
        M::collection()
    }

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", column_list::<M>(), Self::table())
    }

    fn not_found(id: &str) -> RepoError {
        RepoError::ModelNotFound {
            collection: M::collection(),
            id: id.to_string(),
        }
    }
}

impl<M: StoredModel> ModelStore<M> for SqliteStore<'_, M> {
    fn save(&self, model: &M) -> RepoResult<()> {
        validate_model_id(model.id())?;

        let row = model_to_row(model)?;
        let placeholders = (1..=M::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let updates = M::COLUMNS
            .iter()
            .filter(|column| column.name != "id")
            .map(|column| format!("{0} = excluded.{0}", column.name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})
             ON CONFLICT(id) DO UPDATE SET {updates};",
            Self::table(),
            column_list::<M>(),
        );

        self.conn.execute(&sql, params_from_iter(row))?;
        debug!(
            "event=store_save module=store backend=sqlite status=ok collection={} id={}",
            M::collection(),
            model.id()
        );
        Ok(())
    }

    fn load(&self, id: &str) -> RepoResult<M> {
        let sql = format!("{} WHERE id = ?1;", Self::select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_model_row(row);
        }

        Err(Self::not_found(id))
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1;", Self::table()),
                [id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn load_all(&self, filters: &[Filter]) -> RepoResult<Vec<M>> {
        let mut sql = format!("{} WHERE 1 = 1", Self::select_sql());
        let mut bind_values: Vec<Value> = Vec::new();

        for filter in filters {
            let Some(column) = M::column(&filter.field) else {
                debug!(
                    "event=store_load_all module=store backend=sqlite status=skipped collection={} reason=unknown_field field={}",
                    M::collection(),
                    filter.field
                );
                return Ok(Vec::new());
            };
            if filter.value.is_null() {
                sql.push_str(&format!(" AND {} IS NULL", column.name));
                continue;
            }
            match json_to_sql(column, &filter.value) {
                Ok(value) => {
                    sql.push_str(&format!(" AND {} = ?", column.name));
                    bind_values.push(value);
                }
                Err(_) => return Ok(Vec::new()),
            }
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut models = Vec::new();
        while let Some(row) = rows.next()? {
            models.push(parse_model_row(row)?);
        }

        debug!(
            "event=store_load_all module=store backend=sqlite status=ok collection={} filters={} count={}",
            M::collection(),
            filters.len(),
            models.len()
        );
        Ok(models)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", Self::table()),
            [id],
        )?;
        if changed == 0 {
            return Err(Self::not_found(id));
        }
        debug!(
            "event=store_delete module=store backend=sqlite status=ok collection={} id={}",
            M::collection(),
            id
        );
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.conn
            .execute(&format!("DELETE FROM {};", Self::table()), [])?;
        Ok(())
    }

    fn export(&self, id: &str, target_dir: &Path) -> RepoResult<()> {
        let model = self.load(id)?;
        let path = target_dir
            .join(M::collection())
            .join(model_file_name(id));
        write_model(&path, &model)
    }
}

fn column_list<M: StoredModel>() -> String {
    M::COLUMNS
        .iter()
        .map(|column| column.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn model_to_row<M: StoredModel>(model: &M) -> RepoResult<Vec<Value>> {
    let document = serde_json::to_value(model)?;
    let fields = document.as_object().ok_or_else(|| {
        RepoError::InvalidData(format!(
            "{} model did not serialize to an object",
            M::collection()
        ))
    })?;

    M::COLUMNS
        .iter()
        .map(|column| match fields.get(column.name) {
            None | Some(serde_json::Value::Null) => Ok(Value::Null),
            Some(value) => json_to_sql(column, value),
        })
        .collect()
}

fn json_to_sql(column: &Column, value: &serde_json::Value) -> RepoResult<Value> {
    let converted = match (column.kind, value) {
        (ColumnKind::Text, serde_json::Value::String(text)) => Some(Value::Text(text.clone())),
        (ColumnKind::Integer, serde_json::Value::Number(number)) => {
            number.as_i64().map(Value::Integer)
        }
        (ColumnKind::Json, nested) => Some(Value::Text(serde_json::to_string(nested)?)),
        _ => None,
    };

    converted.ok_or_else(|| {
        RepoError::InvalidData(format!(
            "value `{value}` does not fit column `{}` ({:?})",
            column.name, column.kind
        ))
    })
}

fn sql_to_json(column: &Column, value: Value) -> RepoResult<serde_json::Value> {
    let converted = match (column.kind, value) {
        (_, Value::Null) => serde_json::Value::Null,
        (ColumnKind::Text, Value::Text(text)) => serde_json::Value::String(text),
        (ColumnKind::Integer, Value::Integer(number)) => serde_json::Value::from(number),
        (ColumnKind::Json, Value::Text(text)) => serde_json::from_str(&text)?,
        (kind, other) => {
            return Err(RepoError::InvalidData(format!(
                "unexpected value {other:?} in column `{}` ({kind:?})",
                column.name
            )));
        }
    };
    Ok(converted)
}

fn parse_model_row<M: StoredModel>(row: &Row<'_>) -> RepoResult<M> {
    let mut fields = serde_json::Map::new();
    for column in M::COLUMNS {
        let raw: Value = row.get(column.name)?;
        fields.insert(column.name.to_string(), sql_to_json(column, raw)?);
    }
    Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
}
