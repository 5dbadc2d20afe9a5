//! Schema description loaders.
//!
//! Both formats produce the same [`SchemaMapping`](crate::domain::model::SchemaMapping)
//! and are picked by file extension through
//! [`SchemaLoader::supports`](crate::domain::ports::SchemaLoader::supports).

pub mod bini;
pub mod xml;

pub use bini::BiniSchemaLoader;
pub use xml::XmlSchemaLoader;

use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

pub(crate) fn read_schema_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| EtlError::from_open_error(path, source))
}
