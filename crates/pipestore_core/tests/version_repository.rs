use pipestore_core::db::open_db_in_memory;
use pipestore_core::{
    Filter, ModelStore, RepoError, Storage, Version, VersionConverter, VersionModel,
};
use std::path::Path;

fn backends(root: &Path) -> Vec<Storage> {
    vec![
        Storage::filesystem(root.join("fs")),
        Storage::sqlite(open_db_in_memory().unwrap()),
    ]
}

fn version(id: &str, name: &str) -> Version {
    let mut version = Version::new(id, name, 1_697_000_000_000);
    version.config.insert("mode".to_string(), "development".to_string());
    version
}

fn save_numbered(storage: &Storage, count: usize) {
    let repo = storage.repository(VersionConverter);
    for i in 0..count {
        let id = format!("_version_{i}");
        repo.save(&version(&id, &id)).unwrap();
    }
}

#[test]
fn save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        let original = version("v1", "nightly");

        repo.save(&original).unwrap();
        let loaded = repo.load("v1").unwrap();

        assert_eq!(loaded, original, "backend {}", storage.backend_name());
    }
}

#[test]
fn save_overwrites_existing_id() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        repo.save(&version("v1", "first")).unwrap();

        let mut renamed = version("v1", "second");
        renamed.config.insert("extra".to_string(), "yes".to_string());
        repo.save(&renamed).unwrap();

        assert_eq!(repo.load("v1").unwrap(), renamed);
        assert_eq!(repo.load_all(&[]).unwrap().len(), 1);
    }
}

#[test]
fn exists_tracks_saved_and_deleted_ids() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        repo.save(&version("v1", "nightly")).unwrap();

        assert!(repo.exists("v1").unwrap());
        assert!(!repo.exists("not-existed-version").unwrap());
        assert!(!repo.exists("").unwrap());

        repo.delete("v1").unwrap();
        assert!(!repo.exists("v1").unwrap());
    }
}

#[test]
fn load_all_returns_every_record_in_id_order() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        save_numbered(&storage, 10);
        let repo = storage.repository(VersionConverter);

        let all = repo.load_all(&[]).unwrap();
        assert_eq!(all.len(), 10);

        let ids: Vec<&str> = all.iter().map(|v| v.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(repo.load_all(&[]).unwrap(), all);
    }
}

#[test]
fn load_all_with_filters_is_conjunctive() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        save_numbered(&storage, 10);
        let repo = storage.repository(VersionConverter);

        let by_id = repo.load_all(&[Filter::eq("id", "_version_2")]).unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, "_version_2");

        let both = repo
            .load_all(&[
                Filter::eq("id", "_version_2"),
                Filter::eq("name", "_version_3"),
            ])
            .unwrap();
        assert!(both.is_empty());

        let by_date = repo
            .load_all(&[Filter::eq("creation_date", 1_697_000_000_000_i64)])
            .unwrap();
        assert_eq!(by_date.len(), 10);
    }
}

#[test]
fn filters_on_unknown_fields_or_mismatched_types_match_nothing() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        save_numbered(&storage, 3);
        let repo = storage.repository(VersionConverter);

        assert!(repo.search("owner", "_version_1").unwrap().is_empty());
        assert!(repo.search("creation_date", "1697000000000").unwrap().is_empty());
    }
}

#[test]
fn search_returns_exact_subset() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        for i in 0..6 {
            let name = if i % 2 == 0 { "even" } else { "odd" };
            repo.save(&version(&format!("v{i}"), name)).unwrap();
        }

        let even = repo.search("name", "even").unwrap();
        let ids: Vec<&str> = even.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v0", "v2", "v4"]);

        let single = repo.search("id", "v3").unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name, "odd");
    }
}

#[test]
fn search_on_json_field_matches_whole_value() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        repo.save(&version("v1", "a")).unwrap();
        repo.save(&Version::new("v2", "b", 0)).unwrap();

        let found = repo
            .search("config", serde_json::json!({"mode": "development"}))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "v1");
    }
}

#[test]
fn delete_then_load_fails_with_model_not_found() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        repo.save(&version("v1", "nightly")).unwrap();

        repo.delete("v1").unwrap();

        let err = repo.load("v1").unwrap_err();
        assert!(
            matches!(err, RepoError::ModelNotFound { collection: "version", ref id } if id == "v1")
        );
        assert!(repo.delete("v1").unwrap_err().is_not_found());
    }
}

#[test]
fn delete_all_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        repo.delete_all().unwrap();

        save_numbered(&storage, 10);
        assert_eq!(repo.load_all(&[]).unwrap().len(), 10);

        repo.delete_all().unwrap();
        assert_eq!(repo.load_all(&[]).unwrap().len(), 0);
        repo.delete_all().unwrap();
        assert_eq!(repo.load_all(&[]).unwrap().len(), 0);
    }
}

#[test]
fn delete_many_removes_listed_ids_and_skips_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        save_numbered(&storage, 10);
        let repo = storage.repository(VersionConverter);

        let all = repo.load_all(&[]).unwrap();
        let ids: Vec<&str> = all.iter().take(3).map(|v| v.id.as_str()).collect();
        assert_eq!(repo.delete_many(&ids).unwrap(), 3);
        assert_eq!(repo.load_all(&[]).unwrap().len(), 7);

        let removed = repo
            .delete_many(&["_version_5", "already-gone", "_version_0"])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.load_all(&[]).unwrap().len(), 6);
    }
}

#[test]
fn invalid_ids_are_rejected_on_save() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        for bad in ["", "../escape", ".hidden"] {
            let err = repo.save(&version(bad, "bad")).unwrap_err();
            assert!(matches!(err, RepoError::InvalidId(_)), "id `{bad}`");
        }
        assert!(repo.load_all(&[]).unwrap().is_empty());
    }
}

#[test]
fn long_ids_roundtrip_on_every_backend() {
    let dir = tempfile::tempdir().unwrap();
    let long_id = "a".repeat(230);
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        let original = Version::new(long_id.clone(), "n", 0);

        repo.save(&original).unwrap();
        repo.save(&original).unwrap();

        assert_eq!(
            repo.load(&long_id).unwrap(),
            original,
            "backend {}",
            storage.backend_name()
        );
        assert!(repo.exists(&long_id).unwrap());
        assert_eq!(repo.load_all(&[]).unwrap().len(), 1);
    }
}

#[test]
fn export_writes_standalone_copy_of_flat_model() {
    let dir = tempfile::tempdir().unwrap();
    let export_dir = tempfile::tempdir().unwrap();

    let fs_storage = Storage::filesystem(dir.path());
    let fs_repo = fs_storage.repository(VersionConverter);
    fs_repo.save(&version("v1", "nightly")).unwrap();
    fs_repo.export("v1", export_dir.path().join("fs")).unwrap();

    let sql_storage = Storage::sqlite(open_db_in_memory().unwrap());
    let sql_repo = sql_storage.repository(VersionConverter);
    sql_repo.save(&version("v1", "nightly")).unwrap();
    sql_repo.export("v1", export_dir.path().join("sql")).unwrap();

    let fs_export = export_dir.path().join("fs").join("v1.json");
    let sql_export = export_dir.path().join("sql").join("version").join("v1.json");

    for (path, stored) in [
        (fs_export, fs_repo.store().load("v1").unwrap()),
        (sql_export, sql_repo.store().load("v1").unwrap()),
    ] {
        let body = std::fs::read(&path).unwrap();
        let exported: VersionModel = serde_json::from_slice(&body).unwrap();
        assert_eq!(exported, stored, "export at {}", path.display());
    }
}

#[test]
fn export_of_missing_record_fails() {
    let dir = tempfile::tempdir().unwrap();
    for storage in backends(dir.path()) {
        let repo = storage.repository(VersionConverter);
        let err = repo.export("missing", dir.path().join("out")).unwrap_err();
        assert!(err.is_not_found());
    }
}
