//! Ingestion of description files: line splitting, blank-line skipping, and diagnostics that
//! point back at the offending line.

pub mod catalog;
pub mod error;
mod reader;

pub use catalog::{FormatCatalog, FormatEntry, sort_by_word};
pub use error::LoadError;
pub use reader::{DescriptionLoader, LoaderOptions, parse_descriptions};
