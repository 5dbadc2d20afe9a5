use indexmap::IndexMap;
use serde::Serialize;

/// One parsed data record. Keys keep header order.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRequirement {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub optional: bool,
}

impl FieldRequirement {
    pub fn new(type_tag: impl Into<String>, optional: bool) -> Self {
        Self {
            type_tag: type_tag.into(),
            optional,
        }
    }
}

/// Field name to requirement, in declaration order.
pub type SchemaMapping = IndexMap<String, FieldRequirement>;

/// Aggregate key value to the rows sharing it, without the aggregate field.
pub type AggregatedRows = IndexMap<String, Vec<Row>>;

/// What a formatter receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    Flat(Vec<Row>),
    Grouped(AggregatedRows),
}

impl Dataset {
    pub fn is_grouped(&self) -> bool {
        matches!(self, Dataset::Grouped(_))
    }

    pub fn row_count(&self) -> usize {
        match self {
            Dataset::Flat(rows) => rows.len(),
            Dataset::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }
}

/// Options handed to formatters alongside the dataset. Whether the output
/// is grouped is carried by the [`Dataset`] variant itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub pretty: bool,
}
