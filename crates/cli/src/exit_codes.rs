//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Domain    | Description                                      |
//! |------|-----------|--------------------------------------------------|
//! | 0    | Universal | Success                                          |
//! | 1    | check     | Document not in configured order (like diff(1))  |
//! | 2    | Universal | CLI usage error (bad args)                       |
//! | 3    | io        | Read, write, rename or backup failed             |
//! | 4    | document  | Malformed JSON or top level is not an array      |
//! | 5    | document  | Record is not an object, or its id is missing    |
//! | 6    | reorder   | Order/document mismatch under `--on-mismatch fail` |
//! | 7    | config    | Config file parse or validation error            |

use topicorder_reorder::ReorderError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `check` found the document out of order or not 1:1 with the order list.
pub const EXIT_CHECK_UNSORTED: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

/// IO error reading or writing the document, config or backup.
pub const EXIT_IO: u8 = 3;

/// Document is not well-formed JSON, or not an array.
pub const EXIT_PARSE: u8 = 4;

/// A record is not an object, or lacks a string identifier.
pub const EXIT_RECORD: u8 = 5;

/// Order list and document disagree and the policy is `fail`.
pub const EXIT_MISMATCH: u8 = 6;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 7;

/// Map an engine error to its exit code.
pub fn reorder_exit_code(err: &ReorderError) -> u8 {
    match err {
        ReorderError::Io(_) => EXIT_IO,
        ReorderError::Parse(_) | ReorderError::NotAnArray { .. } => EXIT_PARSE,
        ReorderError::RecordNotObject { .. }
        | ReorderError::MissingId { .. }
        | ReorderError::IdNotString { .. } => EXIT_RECORD,
        ReorderError::Mismatch { .. } => EXIT_MISMATCH,
        ReorderError::ConfigParse(_) | ReorderError::ConfigValidation(_) => EXIT_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_distinct_codes() {
        assert_eq!(reorder_exit_code(&ReorderError::Io("x".into())), EXIT_IO);
        assert_eq!(reorder_exit_code(&ReorderError::Parse("x".into())), EXIT_PARSE);
        assert_eq!(reorder_exit_code(&ReorderError::NotAnArray { found: "null" }), EXIT_PARSE);
        assert_eq!(
            reorder_exit_code(&ReorderError::MissingId { index: 0, field: "id".into() }),
            EXIT_RECORD
        );
        assert_eq!(
            reorder_exit_code(&ReorderError::Mismatch {
                dropped: vec![],
                missing: vec!["z".into()],
                shadowed: vec![],
            }),
            EXIT_MISMATCH
        );
        assert_eq!(reorder_exit_code(&ReorderError::ConfigValidation("x".into())), EXIT_CONFIG);
    }
}
