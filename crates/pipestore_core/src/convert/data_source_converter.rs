//! Data-source conversion.
//!
//! `scope` is flattened to its lowercase name; an unknown name on load is
//! reported as `InvalidData`.

use crate::convert::ModelConverter;
use crate::error::{RepoError, RepoResult};
use crate::model::data_source::{DataSource, DataSourceModel, Scope};

#[derive(Debug, Clone, Copy, Default)]
pub struct DataSourceConverter;

impl ModelConverter for DataSourceConverter {
    type Entity = DataSource;
    type Model = DataSourceModel;

    fn to_model(&self, entity: &DataSource) -> DataSourceModel {
        DataSourceModel {
            id: entity.id.clone(),
            config_name: entity.config_name.clone(),
            scope: entity.scope.as_str().to_string(),
            parent_id: entity.parent_id.clone(),
            storage_type: entity.storage_type.clone(),
            properties: entity.properties.clone(),
            last_edit_date: entity.last_edit_date,
        }
    }

    fn from_model(&self, model: DataSourceModel) -> RepoResult<DataSource> {
        let scope = Scope::parse(&model.scope).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid scope `{}` in data_source `{}`",
                model.scope, model.id
            ))
        })?;

        Ok(DataSource {
            id: model.id,
            config_name: model.config_name,
            scope,
            parent_id: model.parent_id,
            storage_type: model.storage_type,
            properties: model.properties,
            last_edit_date: model.last_edit_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DataSourceConverter;
    use crate::convert::ModelConverter;
    use crate::error::RepoError;
    use crate::model::data_source::{DataSource, Scope};

    #[test]
    fn scope_is_stored_by_name() {
        let converter = DataSourceConverter;
        let mut source = DataSource::new("ds_1", "raw", Scope::Scenario, "csv");
        source.properties.insert("path".to_string(), "/tmp/raw.csv".to_string());

        let model = converter.to_model(&source);
        assert_eq!(model.scope, "scenario");
        assert_eq!(converter.from_model(model).unwrap(), source);
    }

    #[test]
    fn unknown_scope_is_invalid_data() {
        let converter = DataSourceConverter;
        let mut model = converter.to_model(&DataSource::new("ds_1", "raw", Scope::Global, "csv"));
        model.scope = "cycle".to_string();

        let err = converter.from_model(model).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
