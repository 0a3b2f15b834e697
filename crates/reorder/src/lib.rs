//! `topicorder-reorder` — reorder a JSON array of topic records by identifier.
//!
//! Pure engine plus the document codec: receives records and an order list,
//! returns the reordered records with a correspondence report. The only
//! filesystem access lives in [`document`].

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod model;

pub use config::{FieldNames, MismatchPolicy, OrderConfig};
pub use document::{load_document, parse_document, render_document, save_document, SaveOptions, SaveReport};
pub use engine::{check_policy, reorder, PolicyNotice};
pub use error::ReorderError;
pub use model::{Record, ReorderOutcome};
