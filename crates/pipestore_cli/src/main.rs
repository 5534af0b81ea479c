//! Command-line probe for a configured pipestore backend.
//!
//! Usage:
//! - `pipestore_cli <config.json> count`
//! - `pipestore_cli <config.json> export <collection> <id> <target_dir>`

use pipestore_core::{
    init_logging_from_config, CoreConfig, DataSourceModel, EntityKind, ModelStore, Storage,
    StoredModel, TaskModel, VersionModel,
};
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: pipestore_cli <config.json> count\n       pipestore_cli <config.json> export <collection> <id> <target_dir>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("event=cli_run module=cli status=error error={message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (config_path, command) = match args {
        [config_path, command, ..] => (config_path, command.as_str()),
        _ => return Err(USAGE.to_string()),
    };

    let config = CoreConfig::from_path(config_path).map_err(|err| err.to_string())?;
    if let Some(logging) = &config.logging {
        init_logging_from_config(logging)?;
    }
    let storage = Storage::open(&config.storage).map_err(|err| err.to_string())?;
    println!("pipestore_core version={}", pipestore_core::core_version());
    println!("backend={}", storage.backend_name());

    match (command, &args[2..]) {
        ("count", []) => {
            for kind in EntityKind::ALL {
                let count = count_records(&storage, kind).map_err(|err| err.to_string())?;
                println!("{}={count}", kind.collection());
            }
            Ok(())
        }
        ("export", [collection, id, target_dir]) => {
            let kind = EntityKind::from_collection(collection)
                .ok_or_else(|| format!("unknown collection `{collection}`"))?;
            export_record(&storage, kind, id, Path::new(target_dir))
                .map_err(|err| err.to_string())?;
            println!("exported {collection}/{id} to {target_dir}");
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn count_records(storage: &Storage, kind: EntityKind) -> pipestore_core::RepoResult<usize> {
    match kind {
        EntityKind::Version => count_with::<VersionModel>(storage),
        EntityKind::DataSource => count_with::<DataSourceModel>(storage),
        EntityKind::Task => count_with::<TaskModel>(storage),
    }
}

fn count_with<M: StoredModel>(storage: &Storage) -> pipestore_core::RepoResult<usize> {
    Ok(storage.store::<M>().load_all(&[])?.len())
}

fn export_record(
    storage: &Storage,
    kind: EntityKind,
    id: &str,
    target_dir: &Path,
) -> pipestore_core::RepoResult<()> {
    match kind {
        EntityKind::Version => storage.store::<VersionModel>().export(id, target_dir),
        EntityKind::DataSource => storage.store::<DataSourceModel>().export(id, target_dir),
        EntityKind::Task => storage.store::<TaskModel>().export(id, target_dir),
    }
}
