use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReorderError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "topicorder.toml";

/// Document rewritten by the built-in configuration.
pub const DEFAULT_DOCUMENT: &str = "src/data/topics.json";

/// Module order used by the built-in configuration.
pub const DEFAULT_ORDER: &[&str] = &[
    "singapore-p3",
    "singapore-p4",
    "bar-model-level-1",
    "bar-model-level-2",
    "bar-model-level-3",
    "singapore-p5",
    "singapore-p6",
    "hiroo",
    "mita",
    "ultimate-prep",
];

const MAX_INDENT: usize = 16;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfig {
    pub document: PathBuf,
    pub order: Vec<String>,
    #[serde(default)]
    pub on_mismatch: MismatchPolicy,
    #[serde(default)]
    pub backup: bool,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub fields: FieldNames,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            order: DEFAULT_ORDER.iter().map(|s| s.to_string()).collect(),
            on_mismatch: MismatchPolicy::default(),
            backup: false,
            indent: default_indent(),
            fields: FieldNames::default(),
        }
    }
}

fn default_indent() -> usize {
    4
}

// ---------------------------------------------------------------------------
// Mismatch policy
// ---------------------------------------------------------------------------

/// What to do when the order list and the document do not line up 1:1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Leave unlisted records out without a word.
    Drop,
    /// Proceed, reporting what was dropped or not found.
    #[default]
    Warn,
    /// Refuse to write.
    Fail,
}

impl std::fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_id_field")]
    pub id: String,
    #[serde(default = "default_title_field")]
    pub title: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: default_id_field(),
            title: default_title_field(),
        }
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_title_field() -> String {
    "title".to_string()
}

// ---------------------------------------------------------------------------
// Loading + validation
// ---------------------------------------------------------------------------

impl OrderConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReorderError> {
        let config: OrderConfig =
            toml::from_str(input).map_err(|e| ReorderError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. A relative `document` is resolved against the
    /// directory holding the config file.
    pub fn load(path: &Path) -> Result<Self, ReorderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReorderError::Io(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&text)?;
        if config.document.is_relative() {
            if let Some(dir) = path.parent() {
                config.document = dir.join(&config.document);
            }
        }
        log::debug!("loaded config {} (document {})", path.display(), config.document.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReorderError> {
        toml::to_string_pretty(self).map_err(|e| ReorderError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReorderError> {
        if self.order.is_empty() {
            return Err(ReorderError::ConfigValidation("order must list at least one id".into()));
        }

        if let Some(pos) = self.order.iter().position(|id| id.trim().is_empty()) {
            return Err(ReorderError::ConfigValidation(format!(
                "order entry {} is empty",
                pos + 1
            )));
        }

        if self.indent > MAX_INDENT {
            return Err(ReorderError::ConfigValidation(format!(
                "indent must be at most {MAX_INDENT}, got {}",
                self.indent
            )));
        }

        if self.fields.id.is_empty() || self.fields.title.is_empty() {
            return Err(ReorderError::ConfigValidation("field names must not be empty".into()));
        }

        if self.document.as_os_str().is_empty() {
            return Err(ReorderError::ConfigValidation("document path must not be empty".into()));
        }

        Ok(())
    }
}
