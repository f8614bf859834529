//! Configuration layers outside the selector
//!
//! - Built-in project layout
//! - Fragment files appended after the selected parts
//! - The resolved envelope handed to the bundler

mod defaults;
mod file;
mod resolved;

pub use defaults::Layout;
pub use file::{FileFormat, FragmentFile, FragmentFileError};
pub use resolved::{ResolvedConfig, SourceKind, SourceRecord, SCHEMA_ID, SCHEMA_VERSION};
