use crate::domain::model::{Dataset, FormatOptions, Row, SchemaMapping};
use crate::utils::error::Result;
use serde_json::Value;
use std::path::Path;

/// Reads a schema description file into a [`SchemaMapping`].
pub trait SchemaLoader: Send + Sync {
    /// Decided on the file extension only.
    fn supports(&self, path: &Path) -> bool;
    fn load(&self, path: &Path) -> Result<SchemaMapping>;
}

/// Checks raw values for one family of type tags.
pub trait TypeValidator: Send + Sync {
    fn supports(&self, type_tag: &str) -> bool;
    fn validate(&self, value: &Value) -> bool;
}

/// Serializes a dataset into an output document.
pub trait Formatter: Send + Sync {
    fn supports(&self, format: &str) -> bool;
    fn format(&self, data: &Dataset, options: &FormatOptions) -> Result<String>;
}

/// Resolved options for one conversion run.
pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &Path;
    /// Requested fields; `None` extracts every header.
    fn fields(&self) -> Option<&[String]>;
    fn aggregate(&self) -> Option<&str>;
    fn desc(&self) -> Option<&Path>;
    fn format(&self) -> &str;
    fn pretty(&self) -> bool;
    fn delimiters(&self) -> &[char];
}

pub trait Pipeline {
    fn extract(&mut self) -> Result<Vec<Row>>;
    fn transform(&mut self, data: Vec<Row>) -> Result<Dataset>;
    fn load(&self, data: Dataset) -> Result<String>;
}
