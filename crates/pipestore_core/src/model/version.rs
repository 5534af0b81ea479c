//! Version entity.
//!
//! A version names one configuration snapshot of the pipeline system.
//! `id` is stable; `name` is mutable and not guaranteed unique.

use crate::model::EntityKind;
use crate::store::{Column, ColumnKind, StoredModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub id: String,
    pub name: String,
    /// Free-form version metadata.
    pub config: BTreeMap<String, String>,
    /// Unix epoch milliseconds.
    pub creation_date: i64,
}

impl Version {
    pub fn new(id: impl Into<String>, name: impl Into<String>, creation_date: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            config: BTreeMap::new(),
            creation_date,
        }
    }
}

/// Flat persisted shape of [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionModel {
    pub id: String,
    pub name: String,
    pub config: BTreeMap<String, String>,
    pub creation_date: i64,
}

impl StoredModel for VersionModel {
    const KIND: EntityKind = EntityKind::Version;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", ColumnKind::Text),
        Column::new("name", ColumnKind::Text),
        Column::new("config", ColumnKind::Json),
        Column::new("creation_date", ColumnKind::Integer),
    ];

    fn id(&self) -> &str {
        &self.id
    }
}
