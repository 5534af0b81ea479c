//! Task conversion with data-source resolution.
//!
//! Input and output references are stored as ordered id lists and resolved
//! through a `DataSourceLookup` on every `from_model`.

use crate::convert::ModelConverter;
use crate::error::{RepoError, RepoResult};
use crate::model::data_source::DataSource;
use crate::model::task::{Task, TaskFunction, TaskModel};
use crate::registry::DataSourceLookup;
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskConverter {
    lookup: Arc<dyn DataSourceLookup>,
}

impl TaskConverter {
    pub fn new(lookup: Arc<dyn DataSourceLookup>) -> Self {
        Self { lookup }
    }

    fn resolve(&self, ids: Vec<String>) -> RepoResult<Vec<Arc<DataSource>>> {
        ids.into_iter()
            .map(|id| match self.lookup.get(&id) {
                Some(data_source) => Ok(data_source),
                None => Err(RepoError::ReferencedEntityNotFound { id }),
            })
            .collect()
    }
}

impl ModelConverter for TaskConverter {
    type Entity = Task;
    type Model = TaskModel;

    fn to_model(&self, entity: &Task) -> TaskModel {
        TaskModel {
            id: entity.id.clone(),
            parent_id: entity.parent_id.clone(),
            config_name: entity.config_name.clone(),
            input_ids: entity.input.iter().map(|ds| ds.id.clone()).collect(),
            output_ids: entity.output.iter().map(|ds| ds.id.clone()).collect(),
            function_name: entity.function.name.clone(),
            function_module: entity.function.module.clone(),
        }
    }

    fn from_model(&self, model: TaskModel) -> RepoResult<Task> {
        let input = self.resolve(model.input_ids)?;
        let output = self.resolve(model.output_ids)?;

        Ok(Task {
            id: model.id,
            parent_id: model.parent_id,
            config_name: model.config_name,
            input,
            output,
            function: TaskFunction {
                name: model.function_name,
                module: model.function_module,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TaskConverter;
    use crate::convert::ModelConverter;
    use crate::error::RepoError;
    use crate::model::data_source::{DataSource, Scope};
    use crate::model::task::{Task, TaskFunction, TaskModel};
    use crate::registry::DataSourceRegistry;
    use std::sync::Arc;

    fn expected_model() -> TaskModel {
        TaskModel {
            id: "id".to_string(),
            parent_id: Some("parent_id".to_string()),
            config_name: "config_name".to_string(),
            input_ids: vec!["ds_id".to_string()],
            output_ids: vec![],
            function_name: "print".to_string(),
            function_module: "builtins".to_string(),
        }
    }

    #[test]
    fn to_model_flattens_references_and_from_model_resolves_them() {
        let registry = Arc::new(DataSourceRegistry::new());
        let converter = TaskConverter::new(registry.clone());
        let source = Arc::new(DataSource::new("ds_id", "test_data_source", Scope::Pipeline, "csv"));
        let task = Task::new(
            "id",
            "config_name",
            vec![source.clone()],
            vec![],
            TaskFunction::new("print", "builtins"),
        )
        .with_parent("parent_id");

        assert_eq!(converter.to_model(&task), expected_model());

        let err = converter.from_model(expected_model()).unwrap_err();
        assert!(matches!(err, RepoError::ReferencedEntityNotFound { ref id } if id == "ds_id"));

        registry.set((*source).clone());
        assert_eq!(converter.from_model(expected_model()).unwrap(), task);
    }

    #[test]
    fn missing_output_fails_even_when_inputs_resolve() {
        let registry = Arc::new(DataSourceRegistry::new());
        registry.set(DataSource::new("ds_id", "in", Scope::Pipeline, "csv"));
        let converter = TaskConverter::new(registry);

        let mut model = expected_model();
        model.output_ids = vec!["ds_out".to_string()];

        let err = converter.from_model(model).unwrap_err();
        assert!(matches!(err, RepoError::ReferencedEntityNotFound { ref id } if id == "ds_out"));
    }
}
