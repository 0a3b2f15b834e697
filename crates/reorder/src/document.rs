//! JSON document codec and persistence.
//!
//! A document is a JSON array of objects. Reading keeps each object's key
//! order (serde_json `preserve_order`); writing uses a configurable indent,
//! leaves non-ASCII text unescaped and ends without a trailing newline.
//!
//! Writes are atomic: the new contents go to a sibling `.<name>.tmp` file
//! which is synced and then renamed over the target.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::ReorderError;
use crate::model::Record;

// ── Reading ─────────────────────────────────────────────────────────

/// Parse document text into records, reading identifiers from `id_field`.
pub fn parse_document(text: &str, id_field: &str) -> Result<Vec<Record>, ReorderError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ReorderError::Parse(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ReorderError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let fields = match item {
            Value::Object(fields) => fields,
            _ => return Err(ReorderError::RecordNotObject { index }),
        };
        let id = match fields.get(id_field) {
            None => {
                return Err(ReorderError::MissingId {
                    index,
                    field: id_field.to_string(),
                })
            }
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(ReorderError::IdNotString {
                    index,
                    field: id_field.to_string(),
                })
            }
        };
        records.push(Record { id, fields });
    }
    Ok(records)
}

/// Read and parse a document from disk.
pub fn load_document(path: &Path, id_field: &str) -> Result<Vec<Record>, ReorderError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ReorderError::Io(format!("{}: {e}", path.display())))?;
    let records = parse_document(&text, id_field)?;
    log::debug!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Writing ─────────────────────────────────────────────────────────

/// Serialize records as a JSON array indented by `indent` spaces.
pub fn render_document(records: &[Record], indent: usize) -> Result<String, ReorderError> {
    let indent_str = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| ReorderError::Parse(format!("failed to serialize document: {e}")))?;
    String::from_utf8(buf).map_err(|e| ReorderError::Parse(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub indent: usize,
    /// Copy the previous contents to `<name>.bak` before replacing them.
    pub backup: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { indent: 4, backup: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// False when the file already held exactly these bytes.
    pub written: bool,
    pub backup: Option<PathBuf>,
    pub bytes: usize,
}

/// Atomically replace `path` with `records`.
///
/// Nothing touches the target until the temp file is complete and synced,
/// so a failure leaves the previous contents in place. A symlinked `path`
/// is resolved first: the file it points to is replaced and the link stays.
/// The replacement keeps the previous file's permissions.
pub fn save_document(
    path: &Path,
    records: &[Record],
    options: &SaveOptions,
) -> Result<SaveReport, ReorderError> {
    let rendered = render_document(records, options.indent)?;

    let existing = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(ReorderError::Io(format!("{}: {e}", path.display()))),
    };

    if existing.as_deref() == Some(rendered.as_bytes()) {
        log::info!("{} already up to date", path.display());
        return Ok(SaveReport {
            written: false,
            backup: None,
            bytes: rendered.len(),
        });
    }

    let target = if existing.is_some() {
        fs::canonicalize(path)
            .map_err(|e| ReorderError::Io(format!("{}: {e}", path.display())))?
    } else {
        path.to_path_buf()
    };
    if target != path {
        log::debug!("{} resolves to {}", path.display(), target.display());
    }

    let tmp_path = sibling_path(&target, |name| format!(".{name}.tmp"))?;
    if let Err(e) = write_synced(&tmp_path, rendered.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ReorderError::Io(format!(
            "failed to write temp file {}: {e}",
            tmp_path.display()
        )));
    }

    if existing.is_some() {
        let kept = fs::metadata(&target).and_then(|m| fs::set_permissions(&tmp_path, m.permissions()));
        if let Err(e) = kept {
            let _ = fs::remove_file(&tmp_path);
            return Err(ReorderError::Io(format!(
                "failed to copy permissions of {}: {e}",
                target.display()
            )));
        }
    }

    let backup = if options.backup && existing.is_some() {
        let bak_path = sibling_path(&target, |name| format!("{name}.bak"))?;
        if let Err(e) = fs::copy(&target, &bak_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ReorderError::Io(format!(
                "failed to write backup {}: {e}",
                bak_path.display()
            )));
        }
        log::info!("backed up {} to {}", target.display(), bak_path.display());
        Some(bak_path)
    } else {
        None
    };

    if let Err(e) = fs::rename(&tmp_path, &target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ReorderError::Io(format!(
            "failed to rename {} to {}: {e}",
            tmp_path.display(),
            target.display()
        )));
    }

    log::info!("wrote {} record(s) to {}", records.len(), target.display());
    Ok(SaveReport {
        written: true,
        backup,
        bytes: rendered.len(),
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Path next to `path` whose file name is derived from `path`'s.
fn sibling_path(path: &Path, name: impl Fn(&str) -> String) -> Result<PathBuf, ReorderError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReorderError::Io(format!("invalid document path {}", path.display())))?;
    Ok(path.with_file_name(name(file_name)))
}
