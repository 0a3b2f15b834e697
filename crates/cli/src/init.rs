//! `topicorder init` — write a config whose order is the document's
//! current order, as a starting point for editing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use topicorder_reorder::{load_document, OrderConfig};

use crate::CliError;

/// Config for `document` listing its ids in current order (first occurrence wins).
pub fn config_from_document(document: &Path, stored_path: PathBuf) -> Result<OrderConfig, CliError> {
    let defaults = OrderConfig::default();
    let records = load_document(document, &defaults.fields.id)?;

    let mut seen = HashSet::new();
    let order: Vec<String> = records
        .iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .map(|r| r.id.clone())
        .collect();

    if order.is_empty() {
        return Err(CliError::args(format!("{} has no records", document.display()))
            .with_hint("init needs at least one record to capture an order"));
    }

    Ok(OrderConfig {
        document: stored_path,
        order,
        ..defaults
    })
}

/// Path to record in the config so it resolves from the config's directory.
fn stored_document_path(document: &Path, output: &Path) -> Result<PathBuf, CliError> {
    let config_dir = output.parent().filter(|p| !p.as_os_str().is_empty());
    match config_dir {
        Some(_) if document.is_relative() => std::fs::canonicalize(document)
            .map_err(|e| CliError::io(format!("{}: {}", document.display(), e))),
        _ => Ok(document.to_path_buf()),
    }
}

pub fn cmd_init(document: PathBuf, output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(CliError::args(format!("{} already exists", output.display()))
            .with_hint("pass --force to overwrite it"));
    }

    let stored = stored_document_path(&document, &output)?;
    let config = config_from_document(&document, stored)?;
    let text = config.to_toml()?;

    std::fs::write(&output, text)
        .map_err(|e| CliError::io(format!("failed to write {}: {}", output.display(), e)))?;

    log::info!("wrote {} with {} id(s)", output.display(), config.order.len());
    eprintln!("Wrote {} ({} ids from {})", output.display(), config.order.len(), document.display());
    Ok(())
}
