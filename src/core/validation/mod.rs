//! Applies a loaded schema to extracted rows.
//!
//! The manager owns two ordered registries: schema loaders, tried by file
//! extension, and type validators, tried by type tag. In both, the first
//! entry whose `supports` answers `true` is used.

pub mod validators;

use crate::adapters::schema::{BiniSchemaLoader, XmlSchemaLoader};
use crate::domain::model::{Row, SchemaMapping};
use crate::domain::ports::{SchemaLoader, TypeValidator};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::path::Path;

#[derive(Default)]
pub struct ValidationManager {
    schema: SchemaMapping,
    validators: Vec<Box<dyn TypeValidator>>,
    loaders: Vec<Box<dyn SchemaLoader>>,
}

impl ValidationManager {
    /// An empty manager: no loaders, no validators, no schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Both schema formats and every built-in validator.
    pub fn with_defaults() -> Self {
        validators::default_validators().into_iter().fold(
            Self::new()
                .with_loader(BiniSchemaLoader::new())
                .with_loader(XmlSchemaLoader::new()),
            |manager, validator| manager.with_boxed_validator(validator),
        )
    }

    pub fn with_validator(self, validator: impl TypeValidator + 'static) -> Self {
        self.with_boxed_validator(Box::new(validator))
    }

    pub fn with_boxed_validator(mut self, validator: Box<dyn TypeValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_loader(mut self, loader: impl SchemaLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn schema(&self) -> &SchemaMapping {
        &self.schema
    }

    /// Replaces the current schema with the one described in `path`.
    pub fn load_schema(&mut self, path: &Path) -> Result<()> {
        let loader = self
            .loaders
            .iter()
            .find(|loader| loader.supports(path))
            .ok_or_else(|| EtlError::LoaderNotFound {
                path: path.display().to_string(),
            })?;

        self.schema = loader.load(path)?;
        tracing::info!(
            "Loaded {} field requirements from {}",
            self.schema.len(),
            path.display()
        );
        Ok(())
    }

    /// Checks every field of `row` against the schema and returns the
    /// normalized row. Empty optional values become `null`; fields without a
    /// requirement pass through untouched.
    pub fn apply_schema_to_row(&self, row: Row) -> Result<Row> {
        let mut validated = Row::new();

        for (field, value) in row {
            let Some(requirement) = self.schema.get(&field) else {
                validated.insert(field, value);
                continue;
            };

            let is_empty = value.as_str() == Some("");

            if is_empty && !requirement.optional {
                return Err(EtlError::validation(format!(
                    "The field '{}' can not be empty! Consider fixing your data or fixing the schema with: '{}=?{}'",
                    field, field, requirement.type_tag
                )));
            }

            if is_empty {
                validated.insert(field, Value::Null);
                continue;
            }

            let validator = self
                .validators
                .iter()
                .find(|validator| validator.supports(&requirement.type_tag))
                .ok_or_else(|| {
                    EtlError::validation(format!(
                        "No validator was found for type '{}'! Register one that supports it",
                        requirement.type_tag
                    ))
                })?;

            if !validator.validate(&value) {
                return Err(EtlError::validation(format!(
                    "The field '{}' with value '{}' does not match requirements type '{}'",
                    field,
                    display_value(&value),
                    requirement.type_tag
                )));
            }

            validated.insert(field, value);
        }

        Ok(validated)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
