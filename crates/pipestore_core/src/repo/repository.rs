use crate::convert::{DataSourceConverter, ModelConverter, TaskConverter, VersionConverter};
use crate::error::RepoResult;
use crate::model::data_source::DataSourceModel;
use crate::model::task::TaskModel;
use crate::model::version::VersionModel;
use crate::store::{AnyStore, Filter, ModelStore, Storage};
use std::path::Path;

pub type VersionRepository<'s> = Repository<VersionConverter, AnyStore<'s, VersionModel>>;
pub type DataSourceRepository<'s> =
    Repository<DataSourceConverter, AnyStore<'s, DataSourceModel>>;
pub type TaskRepository<'s> = Repository<TaskConverter, AnyStore<'s, TaskModel>>;

/// Converter + store composition.
///
/// `load` can fail for two distinct reasons: the record is missing
/// (`ModelNotFound`) or one of its references no longer resolves
/// (`ReferencedEntityNotFound`).
pub struct Repository<C, S> {
    converter: C,
    store: S,
}

impl<C, S> Repository<C, S>
where
    C: ModelConverter,
    S: ModelStore<C::Model>,
{
    pub fn new(converter: C, store: S) -> Self {
        Self { converter, store }
    }

    /// Underlying flat-model store, for callers that need raw records.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn to_model(&self, entity: &C::Entity) -> C::Model {
        self.converter.to_model(entity)
    }

    pub fn from_model(&self, model: C::Model) -> RepoResult<C::Entity> {
        self.converter.from_model(model)
    }

    /// Upserts `entity`.
    pub fn save(&self, entity: &C::Entity) -> RepoResult<()> {
        self.store.save(&self.converter.to_model(entity))
    }

    pub fn load(&self, id: &str) -> RepoResult<C::Entity> {
        self.converter.from_model(self.store.load(id)?)
    }

    pub fn exists(&self, id: &str) -> RepoResult<bool> {
        self.store.exists(id)
    }

    /// Loads every entity matching all `filters`; fails if any one of them
    /// cannot be converted.
    pub fn load_all(&self, filters: &[Filter]) -> RepoResult<Vec<C::Entity>> {
        self.store
            .load_all(filters)?
            .into_iter()
            .map(|model| self.converter.from_model(model))
            .collect()
    }

    pub fn search(
        &self,
        field: &str,
        value: impl Into<serde_json::Value>,
    ) -> RepoResult<Vec<C::Entity>> {
        self.load_all(&[Filter::eq(field, value)])
    }

    pub fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(id)
    }

    pub fn delete_all(&self) -> RepoResult<()> {
        self.store.delete_all()
    }

    /// Removes each existing id; ids already gone are skipped.
    pub fn delete_many(&self, ids: &[&str]) -> RepoResult<usize> {
        self.store.delete_many(ids)
    }

    pub fn export(&self, id: &str, target_dir: impl AsRef<Path>) -> RepoResult<()> {
        self.store.export(id, target_dir.as_ref())
    }
}

impl Storage {
    /// Builds a repository for `converter` on this backend.
    pub fn repository<C: ModelConverter>(
        &self,
        converter: C,
    ) -> Repository<C, AnyStore<'_, C::Model>> {
        Repository::new(converter, self.store::<C::Model>())
    }
}
