use std::path::{Path, PathBuf};
use namebook::config::{self, NamebookConfig};
use namebook::exchange::{self, CopyShare, DocumentPicker, ImportOutcome, PresetPicker, PromptPicker};
use namebook::output::{emit_success, OutputMode};
use namebook::ui::{self, Icons, Spinner};
use namebook::{Coordinator, StoreLocation, StoreService};

pub fn run_init(mode: OutputMode, config_path: &Path, force: bool) -> anyhow::Result<()> {
    let settings = NamebookConfig {
        document_root: Some(config::DEFAULT_DOCUMENT_ROOT.to_string()),
        db_subdir: Some(StoreLocation::DEFAULT_SUBDIR.to_string()),
        db_filename: Some(StoreLocation::DEFAULT_NAME.to_string()),
        port: Some(config::DEFAULT_PORT),
        exchange_dir: None,
    };
    config::write_config(config_path, &settings, force)?;

    if mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
    }
    emit_success(mode, "init", serde_json::json!({ "config": config_path }))?;
    Ok(())
}

pub fn run_list(mode: OutputMode, location: StoreLocation) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let records = coordinator.list_all()?;
    if mode.is_human() {
        ui::header(&format!("{} names", records.len()));
        println!("{}", ui::names_table(&records));
    }
    emit_success(mode, "list", &records)?;
    coordinator.teardown()?;
    Ok(())
}

pub fn run_add(mode: OutputMode, location: StoreLocation, name: &str) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let record = coordinator.insert(name)?;
    if mode.is_human() {
        ui::success(&format!("Added #{} {}", record.id, record.display_name()));
    }
    finish_mutation(mode, "add", coordinator, serde_json::json!({ "record": record }))
}

pub fn run_update(mode: OutputMode, location: StoreLocation, id: i64, name: &str) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let updated = coordinator.update(id, name)?;
    if mode.is_human() {
        if updated {
            ui::success(&format!("Renamed #{} to {}", id, name));
        } else {
            ui::warn(&format!("No name with id {}", id));
        }
    }
    finish_mutation(mode, "update", coordinator, serde_json::json!({ "id": id, "updated": updated }))
}

pub fn run_delete(mode: OutputMode, location: StoreLocation, id: i64) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let deleted = coordinator.delete(id)?;
    if mode.is_human() {
        if deleted {
            ui::success(&format!("Deleted #{}", id));
        } else {
            ui::warn(&format!("No name with id {}", id));
        }
    }
    finish_mutation(mode, "delete", coordinator, serde_json::json!({ "id": id, "deleted": deleted }))
}

/// Re-query the store after a mutation so what is shown is what is stored
fn finish_mutation(
    mode: OutputMode,
    command: &str,
    mut coordinator: Coordinator,
    mut data: serde_json::Value,
) -> anyhow::Result<()> {
    let records = coordinator.list_all()?;
    if mode.is_human() {
        ui::name_list(&records);
    }
    data["names"] = serde_json::to_value(&records)?;
    emit_success(mode, command, data)?;
    coordinator.teardown()?;
    Ok(())
}

pub fn run_export(mode: OutputMode, location: StoreLocation, to: PathBuf) -> anyhow::Result<()> {
    // Export only reads the backing file; no handle is opened, so a store
    // that was never written reports file-not-found.
    let exchanger = namebook::SnapshotExchanger::new(location);
    let receipt = exchanger.export_snapshot(&CopyShare::new(to))?;

    if mode.is_human() {
        ui::success("Exported snapshot");
        ui::info("From", &receipt.source.display().to_string());
        ui::info("To", &receipt.destination);
        ui::info("Size", &format!("{} bytes", receipt.bytes));
        ui::info("blake3", &receipt.digest);
    }
    emit_success(mode, "export", &receipt)?;
    Ok(())
}

pub fn run_import(mode: OutputMode, location: StoreLocation, from: Option<PathBuf>) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let picker: Box<dyn DocumentPicker> = match from {
        Some(path) => Box::new(PresetPicker::new(Some(path))),
        None if mode.is_human() && console::Term::stderr().is_term() => Box::new(PromptPicker::new()),
        None => anyhow::bail!("--from is required when not running interactively"),
    };

    let Some(source) = exchange::pick_source(picker.as_ref())? else {
        if mode.is_human() {
            ui::warn("Import cancelled, nothing changed");
        }
        emit_success(mode, "import", ImportOutcome::Cancelled)?;
        coordinator.teardown()?;
        return Ok(());
    };

    let spinner = Spinner::new(&format!("Importing {}...", source.display()));
    let imported = coordinator.import_from(&source);
    spinner.finish_and_clear();
    let receipt = imported?;

    if mode.is_human() {
        ui::success("Imported snapshot");
        ui::info("From", &receipt.source.display().to_string());
        ui::info("Size", &format!("{} bytes", receipt.bytes));
        ui::info("blake3", &receipt.digest);
    }
    let data = serde_json::to_value(ImportOutcome::Imported(receipt))?;
    finish_mutation(mode, "import", coordinator, data)
}

pub fn run_stats(mode: OutputMode, location: StoreLocation) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::init(location)?;
    let stats = coordinator.stats()?;

    if mode.is_human() {
        ui::section(&format!("{} Namebook Statistics", Icons::STATS));
        println!("{}", ui::stats_table(&stats));
    }
    emit_success(mode, "stats", &stats)?;
    coordinator.teardown()?;
    Ok(())
}

pub fn run_serve(
    mode: OutputMode,
    location: StoreLocation,
    port: u16,
    exchange_dir: PathBuf,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::init(location)?;
    let (service, worker) = StoreService::spawn(coordinator)?;

    if mode.is_human() {
        ui::header(&format!("{} Serving names at http://127.0.0.1:{}", Icons::GLOBE, port));
        ui::info("Database", &format!("{} {}", Icons::DATABASE, show_path(&service)?));
        ui::info("Snapshots", &exchange_dir.display().to_string());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(namebook::server::start_server(port, service, exchange_dir))?;
    drop(runtime);

    // Every service clone is gone once the server returns.
    let coordinator = worker.join()?;
    coordinator.teardown()?;
    Ok(())
}

fn show_path(service: &StoreService) -> anyhow::Result<String> {
    Ok(service.stats()?.backing_path.display().to_string())
}
