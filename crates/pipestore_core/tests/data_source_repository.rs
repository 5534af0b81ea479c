use pipestore_core::db::open_db;
use pipestore_core::{
    CoreConfig, DataSource, DataSourceConverter, DataSourceRepository, Scope, Storage,
    StorageConfig,
};

fn sample(id: &str, scope: Scope) -> DataSource {
    let mut source = DataSource::new(id, "sales_history", scope, "csv");
    source.properties.insert("path".to_string(), format!("/data/{id}.csv"));
    source
}

fn exercise(repo: &DataSourceRepository<'_>) {
    repo.save(&sample("ds_1", Scope::Pipeline)).unwrap();
    repo.save(&sample("ds_2", Scope::Global)).unwrap();
    repo.save(&sample("ds_3", Scope::Global)).unwrap();

    assert_eq!(repo.load("ds_2").unwrap(), sample("ds_2", Scope::Global));
    assert_eq!(repo.search("scope", "global").unwrap().len(), 2);
    assert_eq!(repo.search("last_edit_date", serde_json::Value::Null).unwrap().len(), 3);
}

#[test]
fn configured_filesystem_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::from_json_str(&format!(
        r#"{{"storage": {{"backend": "filesystem", "base_path": {}}}}}"#,
        serde_json::to_string(dir.path()).unwrap()
    ))
    .unwrap();

    {
        let storage = Storage::open(&config.storage).unwrap();
        exercise(&storage.repository(DataSourceConverter));
    }

    let reopened = Storage::open(&config.storage).unwrap();
    let repo = reopened.repository(DataSourceConverter);
    assert_eq!(repo.load_all(&[]).unwrap().len(), 3);
    assert!(dir.path().join("data_source").join("ds_1.json").is_file());
}

#[test]
fn configured_sqlite_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("pipestore.db");
    let config = StorageConfig::Sqlite {
        db_path: Some(db_path.clone()),
    };

    {
        let storage = Storage::open(&config).unwrap();
        assert_eq!(storage.backend_name(), "sqlite");
        exercise(&storage.repository(DataSourceConverter));
    }

    let storage = Storage::sqlite(open_db(&db_path).unwrap());
    let repo = storage.repository(DataSourceConverter);
    assert_eq!(repo.load_all(&[]).unwrap().len(), 3);
}

#[test]
fn in_memory_sqlite_config_starts_empty() {
    let storage = Storage::open(&StorageConfig::Sqlite { db_path: None }).unwrap();
    let repo = storage.repository(DataSourceConverter);
    assert!(repo.load_all(&[]).unwrap().is_empty());
}
