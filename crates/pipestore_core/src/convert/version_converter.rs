//! Version conversion. Versions hold no references, so both directions are
//! plain field copies.

use crate::convert::ModelConverter;
use crate::error::RepoResult;
use crate::model::version::{Version, VersionModel};

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionConverter;

impl ModelConverter for VersionConverter {
    type Entity = Version;
    type Model = VersionModel;

    fn to_model(&self, entity: &Version) -> VersionModel {
        VersionModel {
            id: entity.id.clone(),
            name: entity.name.clone(),
            config: entity.config.clone(),
            creation_date: entity.creation_date,
        }
    }

    fn from_model(&self, model: VersionModel) -> RepoResult<Version> {
        Ok(Version {
            id: model.id,
            name: model.name,
            config: model.config,
            creation_date: model.creation_date,
        })
    }
}
