//! `topicorder apply` / `topicorder check` — reorder a document by the
//! configured id list, writing it back or only reporting.

use std::path::{Path, PathBuf};

use topicorder_reorder::config::DEFAULT_CONFIG_FILE;
use topicorder_reorder::{
    check_policy, load_document, reorder, save_document, MismatchPolicy, OrderConfig,
    ReorderOutcome, SaveOptions,
};

use crate::exit_codes::EXIT_CHECK_UNSORTED;
use crate::util::quoted_list;
use crate::{print_json, CliError};

// ── Config resolution ───────────────────────────────────────────────

/// Command-line choices that select and override an [`OrderConfig`].
#[derive(Debug, Default)]
pub struct Selection {
    pub config: Option<PathBuf>,
    pub document: Option<PathBuf>,
    pub order: Vec<String>,
    pub on_mismatch: Option<MismatchPolicy>,
    pub backup: bool,
}

/// Split repeatable, comma-separated `--order` values into ids.
pub fn parse_order_args(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|s| s.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `--config`, else `./topicorder.toml` if present, else the built-in
/// defaults; then flag overrides on top.
pub fn resolve_config(selection: &Selection) -> Result<OrderConfig, CliError> {
    let mut config = match &selection.config {
        Some(path) => OrderConfig::load(path)?,
        None => {
            let local = Path::new(DEFAULT_CONFIG_FILE);
            if local.is_file() {
                OrderConfig::load(local)?
            } else {
                log::info!("no {} found, using built-in order", DEFAULT_CONFIG_FILE);
                OrderConfig::default()
            }
        }
    };

    if let Some(document) = &selection.document {
        config.document = document.clone();
    }

    if !selection.order.is_empty() {
        let order = parse_order_args(&selection.order);
        if order.is_empty() {
            return Err(CliError::args("--order given but no ids listed"));
        }
        config.order = order;
    }

    if let Some(policy) = selection.on_mismatch {
        config.on_mismatch = policy;
    }
    if selection.backup {
        config.backup = true;
    }

    config.validate()?;
    log::info!(
        "document {} with {} ordered id(s), on_mismatch={}",
        config.document.display(),
        config.order.len(),
        config.on_mismatch
    );
    Ok(config)
}

fn load_and_reorder(config: &OrderConfig) -> Result<(usize, ReorderOutcome), CliError> {
    let records = load_document(&config.document, &config.fields.id).map_err(|e| {
        let not_found = matches!(e, topicorder_reorder::ReorderError::Io(_))
            && !config.document.exists();
        let err = CliError::reorder(e);
        if not_found {
            err.with_hint("run from the project root, or pass --document / --config")
        } else {
            err
        }
    })?;
    let input_len = records.len();
    Ok((input_len, reorder(records, &config.order)))
}

// ── apply ───────────────────────────────────────────────────────────

pub fn cmd_apply(selection: &Selection, dry_run: bool, json: bool, quiet: bool) -> Result<(), CliError> {
    let config = resolve_config(selection)?;
    let (input_len, outcome) = load_and_reorder(&config)?;

    // Policy is checked before anything is written.
    let notices = check_policy(&outcome, config.on_mismatch)?;
    if !json && !quiet {
        for notice in &notices {
            eprintln!("warning: {}", notice);
        }
    }

    let report = if dry_run {
        None
    } else {
        let options = SaveOptions {
            indent: config.indent,
            backup: config.backup,
        };
        Some(save_document(&config.document, &outcome.records, &options)?)
    };

    let titles = outcome.titles(&config.fields.title);

    if json {
        let result = serde_json::json!({
            "status": "ok",
            "document": config.document.display().to_string(),
            "dry_run": dry_run,
            "written": report.as_ref().map(|r| r.written).unwrap_or(false),
            "backup": report.as_ref().and_then(|r| r.backup.as_ref()).map(|p| p.display().to_string()),
            "records_in": input_len,
            "records_out": outcome.records.len(),
            "changed": outcome.changed,
            "order": outcome.ids(),
            "titles": titles,
            "dropped": outcome.dropped,
            "missing": outcome.missing,
            "shadowed": outcome.shadowed,
            "repeated": outcome.repeated,
            "warnings": notices.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
        });
        return print_json(&result);
    }

    match &report {
        None => println!("Dry run: {} not modified", config.document.display()),
        Some(_) => println!("Topics reordered successfully!"),
    }
    println!("New order: {}", quoted_list(&titles));

    if !quiet {
        if let Some(report) = &report {
            if !report.written {
                eprintln!("note: {} already in this order, nothing written", config.document.display());
            }
            if let Some(backup) = &report.backup {
                eprintln!("Backup: {}", backup.display());
            }
        }
    }

    Ok(())
}

// ── check ───────────────────────────────────────────────────────────

pub fn cmd_check(selection: &Selection, json: bool, quiet: bool) -> Result<(), CliError> {
    let config = resolve_config(selection)?;
    let (input_len, outcome) = load_and_reorder(&config)?;
    let in_order = !outcome.changed && outcome.is_exact();

    if json {
        let result = serde_json::json!({
            "in_order": in_order,
            "document": config.document.display().to_string(),
            "records": input_len,
            "expected": outcome.ids(),
            "dropped": outcome.dropped,
            "missing": outcome.missing,
            "shadowed": outcome.shadowed,
            "repeated": outcome.repeated,
        });
        print_json(&result)?;
    } else if !quiet {
        if in_order {
            println!("{}: in order ({} records)", config.document.display(), input_len);
        } else {
            println!("{}: not in order", config.document.display());
            if outcome.changed {
                println!("  expected: {}", outcome.ids().join(", "));
            }
            for (label, ids) in [
                ("not listed", &outcome.dropped),
                ("not found", &outcome.missing),
                ("duplicated", &outcome.shadowed),
            ] {
                if !ids.is_empty() {
                    println!("  {}: {}", label, ids.join(", "));
                }
            }
        }
    }

    if in_order {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_CHECK_UNSORTED))
    }
}
