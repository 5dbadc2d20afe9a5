use crate::adapters::schema::{has_extension, read_schema_file};
use crate::domain::model::{FieldRequirement, SchemaMapping};
use crate::domain::ports::SchemaLoader;
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Loader for `.bini` description files.
///
/// ```text
/// # comment
/// name = string
/// id=?int
/// ```
///
/// A leading `?` on the type marks the field optional.
#[derive(Debug, Default, Clone, Copy)]
pub struct BiniSchemaLoader;

impl BiniSchemaLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str, path: &Path) -> Result<SchemaMapping> {
        let mut mapping = SchemaMapping::new();

        for (index, line) in content.lines().enumerate() {
            if is_comment(line) {
                continue;
            }

            let (field, requirement) =
                parse_line(line).map_err(|reason| EtlError::ParsingMetadata {
                    message: format!("{} on line {} in file {}", reason, index + 1, path.display()),
                })?;

            tracing::debug!(
                "Schema field '{}' requires '{}' (optional: {})",
                field,
                requirement.type_tag,
                requirement.optional
            );
            mapping.insert(field, requirement);
        }

        Ok(mapping)
    }
}

impl SchemaLoader for BiniSchemaLoader {
    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "bini")
    }

    fn load(&self, path: &Path) -> Result<SchemaMapping> {
        let content = read_schema_file(path)?;
        self.parse(&content, path)
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn parse_line(line: &str) -> std::result::Result<(String, FieldRequirement), String> {
    let malformed = || format!("Line '{}' is not well formatted", line.trim());

    let (key, value) = line.trim().split_once('=').ok_or_else(malformed)?;
    let key = unquote(key.trim());
    let value = unquote(value.trim());

    if key.is_empty() || value.is_empty() || value.contains('=') {
        return Err(malformed());
    }

    let requirement = FieldRequirement::new(value.replace('?', ""), value.starts_with('?'));
    Ok((key.to_string(), requirement))
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
