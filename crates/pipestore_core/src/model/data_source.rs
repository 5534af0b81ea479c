//! Data-source descriptor entity.
//!
//! # Invariants
//! - Live instances are shared through `Arc<DataSource>`; tasks reference
//!   them by identity and never own them.
//! - `scope` is persisted as its lowercase name.

use crate::model::EntityKind;
use crate::store::{Column, ColumnKind, StoredModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visibility level of a data source inside the orchestration hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Pipeline,
    Scenario,
    Global,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pipeline => "pipeline",
            Self::Scenario => "scenario",
            Self::Global => "global",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pipeline" => Some(Self::Pipeline),
            "scenario" => Some(Self::Scenario),
            "global" => Some(Self::Global),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub id: String,
    pub config_name: String,
    pub scope: Scope,
    pub parent_id: Option<String>,
    /// Storage flavour, e.g. `csv` or `pickle`.
    pub storage_type: String,
    pub properties: BTreeMap<String, String>,
    /// Unix epoch milliseconds of the last write, if any.
    pub last_edit_date: Option<i64>,
}

impl DataSource {
    pub fn new(
        id: impl Into<String>,
        config_name: impl Into<String>,
        scope: Scope,
        storage_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            config_name: config_name.into(),
            scope,
            parent_id: None,
            storage_type: storage_type.into(),
            properties: BTreeMap::new(),
            last_edit_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceModel {
    pub id: String,
    pub config_name: String,
    pub scope: String,
    pub parent_id: Option<String>,
    pub storage_type: String,
    pub properties: BTreeMap<String, String>,
    pub last_edit_date: Option<i64>,
}

impl StoredModel for DataSourceModel {
    const KIND: EntityKind = EntityKind::DataSource;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", ColumnKind::Text),
        Column::new("config_name", ColumnKind::Text),
        Column::new("scope", ColumnKind::Text),
        Column::nullable("parent_id", ColumnKind::Text),
        Column::new("storage_type", ColumnKind::Text),
        Column::new("properties", ColumnKind::Json),
        Column::nullable("last_edit_date", ColumnKind::Integer),
    ];

    fn id(&self) -> &str {
        &self.id
    }
}
