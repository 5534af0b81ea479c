//! File-backed store: one `<id>.json` document per record.
//!
//! # Invariants
//! - Records of a model live under `<base_path>/<collection>/`.
//! - Writes are atomic per file; there is no cross-record transaction.
//! - Files not ending in `.json` (temp files included) are ignored on scan.

use crate::error::{RepoError, RepoResult};
use crate::store::json_file::{model_file_name, read_model, write_model, JSON_EXTENSION};
use crate::store::{is_valid_model_id, validate_model_id, Filter, ModelStore, StoredModel};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub struct FsStore<M> {
    dir_path: PathBuf,
    _model: PhantomData<fn() -> M>,
}

impl<M: StoredModel> FsStore<M> {
    /// Creates a store rooted at `base_path`.
    ///
    /// The collection directory is created lazily on first save.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            dir_path: base_path.as_ref().join(M::collection()),
            _model: PhantomData,
        }
    }

    /// Directory holding this collection's documents.
    pub fn dir_path(&self) -> &Path {
        &self.dir_path
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir_path.join(model_file_name(id))
    }

    fn not_found(id: &str) -> RepoError {
        RepoError::ModelNotFound {
            collection: M::collection(),
            id: id.to_string(),
        }
    }

    fn record_paths(&self) -> RepoResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir_path) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            // Temp files start with `.`, which no valid id does.
            let is_record = path.is_file()
                && path.extension().is_some_and(|ext| ext == JSON_EXTENSION)
                && !path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if is_record {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

impl<M: StoredModel> ModelStore<M> for FsStore<M> {
    fn save(&self, model: &M) -> RepoResult<()> {
        validate_model_id(model.id())?;
        write_model(&self.record_path(model.id()), model)?;
        debug!(
            "event=store_save module=store backend=fs status=ok collection={} id={}",
            M::collection(),
            model.id()
        );
        Ok(())
    }

    fn load(&self, id: &str) -> RepoResult<M> {
        if !is_valid_model_id(id) {
            return Err(Self::not_found(id));
        }
        match read_model(&self.record_path(id)) {
            Err(RepoError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Err(Self::not_found(id))
            }
            other => other,
        }
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        Ok(is_valid_model_id(id) && self.record_path(id).is_file())
    }

    fn load_all(&self, filters: &[Filter]) -> RepoResult<Vec<M>> {
        let mut models = Vec::new();
        for path in self.record_paths()? {
            let document: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
            if !matches_filters(&document, filters) {
                continue;
            }
            models.push(serde_json::from_value::<M>(document)?);
        }
        models.sort_by(|left, right| left.id().cmp(right.id()));
        debug!(
            "event=store_load_all module=store backend=fs status=ok collection={} filters={} count={}",
            M::collection(),
            filters.len(),
            models.len()
        );
        Ok(models)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        if !is_valid_model_id(id) {
            return Err(Self::not_found(id));
        }
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {
                debug!(
                    "event=store_delete module=store backend=fs status=ok collection={} id={}",
                    M::collection(),
                    id
                );
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Self::not_found(id)),
            Err(err) => Err(err.into()),
        }
    }

    fn delete_all(&self) -> RepoResult<()> {
        match fs::remove_dir_all(&self.dir_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn export(&self, id: &str, target_dir: &Path) -> RepoResult<()> {
        let model = self.load(id)?;
        write_model(&target_dir.join(model_file_name(id)), &model)
    }
}

fn matches_filters(document: &serde_json::Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|filter| document.get(&filter.field) == Some(&filter.value))
}
