//! JSON document helpers shared by the file backend and exports.
//!
//! Writes go to a uniquely named temp file in the target directory and are
//! renamed into place, so readers never observe a partial document.

use crate::error::RepoResult;
use crate::store::StoredModel;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub(crate) const JSON_EXTENSION: &str = "json";

pub(crate) fn model_file_name(id: &str) -> String {
    format!("{id}.{JSON_EXTENSION}")
}

/// Serializes `model` and atomically writes it to `path`.
pub(crate) fn write_model<M: StoredModel>(path: &Path, model: &M) -> RepoResult<()> {
    let body = serde_json::to_vec_pretty(model)?;
    atomic_write(path, &body)
}

pub(crate) fn read_model<M: StoredModel>(path: &Path) -> RepoResult<M> {
    let body = fs::read(path)?;
    Ok(serde_json::from_slice(&body)?)
}

fn atomic_write(target: &Path, content: &[u8]) -> RepoResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp = temp_path_for(target);
    if let Err(err) = fs::write(&temp, content) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&temp, target) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    Ok(())
}

/// Temp names depend only on a fresh uuid, so they never outgrow the
/// record file name they replace.
fn temp_path_for(target: &Path) -> PathBuf {
    target.with_file_name(format!(".{}.tmp", Uuid::new_v4().simple()))
}
