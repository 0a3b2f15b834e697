use std::fmt;

#[derive(Debug)]
pub enum ReorderError {
    /// IO error (read, temp write, rename, backup copy).
    Io(String),
    /// Document is not well-formed JSON.
    Parse(String),
    /// Document parsed, but the top-level value is not an array.
    NotAnArray { found: &'static str },
    /// An array element is not a JSON object.
    RecordNotObject { index: usize },
    /// A record lacks the identifier field.
    MissingId { index: usize, field: String },
    /// The identifier field is present but not a string.
    IdNotString { index: usize, field: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty order, bad indent, etc.).
    ConfigValidation(String),
    /// Order and document are not in 1:1 correspondence under the `fail` policy.
    Mismatch {
        dropped: Vec<String>,
        missing: Vec<String>,
        shadowed: Vec<String>,
    },
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "JSON parse error: {msg}"),
            Self::NotAnArray { found } => {
                write!(f, "document must be a JSON array of records, found {found}")
            }
            Self::RecordNotObject { index } => {
                write!(f, "record {index}: expected a JSON object")
            }
            Self::MissingId { index, field } => {
                write!(f, "record {index}: missing identifier field '{field}'")
            }
            Self::IdNotString { index, field } => {
                write!(f, "record {index}: identifier field '{field}' must be a string")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Mismatch { dropped, missing, shadowed } => {
                let mut parts = Vec::new();
                if !dropped.is_empty() {
                    parts.push(format!("{} record(s) not in order: {}", dropped.len(), dropped.join(", ")));
                }
                if !missing.is_empty() {
                    parts.push(format!("{} id(s) not in document: {}", missing.len(), missing.join(", ")));
                }
                if !shadowed.is_empty() {
                    parts.push(format!("{} duplicate id(s) in document: {}", shadowed.len(), shadowed.join(", ")));
                }
                write!(f, "order does not match document: {}", parts.join("; "))
            }
        }
    }
}

impl std::error::Error for ReorderError {}
