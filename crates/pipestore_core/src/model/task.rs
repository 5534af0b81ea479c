//! Task entity.
//!
//! # Invariants
//! - `input` / `output` hold weak references: the flat model keeps only
//!   data-source ids, in the same order.
//! - `parent_id` names an owning scope but is not enforced as a foreign key.

use crate::model::data_source::DataSource;
use crate::model::EntityKind;
use crate::store::{Column, ColumnKind, StoredModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies an executable unit without embedding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskFunction {
    pub name: String,
    pub module: String,
}

impl TaskFunction {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub parent_id: Option<String>,
    pub config_name: String,
    pub input: Vec<Arc<DataSource>>,
    pub output: Vec<Arc<DataSource>>,
    pub function: TaskFunction,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        config_name: impl Into<String>,
        input: Vec<Arc<DataSource>>,
        output: Vec<Arc<DataSource>>,
        function: TaskFunction,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            config_name: config_name.into(),
            input,
            output,
            function,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskModel {
    pub id: String,
    pub parent_id: Option<String>,
    pub config_name: String,
    pub input_ids: Vec<String>,
    pub output_ids: Vec<String>,
    pub function_name: String,
    pub function_module: String,
}

impl StoredModel for TaskModel {
    const KIND: EntityKind = EntityKind::Task;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", ColumnKind::Text),
        Column::nullable("parent_id", ColumnKind::Text),
        Column::new("config_name", ColumnKind::Text),
        Column::new("input_ids", ColumnKind::Json),
        Column::new("output_ids", ColumnKind::Json),
        Column::new("function_name", ColumnKind::Text),
        Column::new("function_module", ColumnKind::Text),
    ];

    fn id(&self) -> &str {
        &self.id
    }
}
