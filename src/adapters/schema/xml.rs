use crate::adapters::schema::{has_extension, read_schema_file};
use crate::domain::model::{FieldRequirement, SchemaMapping};
use crate::domain::ports::SchemaLoader;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::path::Path;

/// Loader for `.xml` description files.
///
/// Every `<field id=".." type=".." optional=".."/>` element, at any depth,
/// declares one field.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlSchemaLoader;

/// Attribute text after the first coercion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    Text(String),
}

impl AttributeValue {
    /// `"true"` and `"false"` become booleans, anything else stays text.
    pub fn from_text(text: &str) -> Self {
        match text {
            "true" => AttributeValue::Bool(true),
            "false" => AttributeValue::Bool(false),
            other => AttributeValue::Text(other.to_string()),
        }
    }

    /// Text counts as set unless it is empty or `"0"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Bool(value) => *value,
            AttributeValue::Text(text) => !text.is_empty() && text != "0",
        }
    }
}

impl XmlSchemaLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str, path: &Path) -> Result<SchemaMapping> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut mapping = SchemaMapping::new();
        let mut depth = 0usize;
        let mut seen_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) => {
                    enter_element(&mut seen_root, depth, path)?;
                    depth += 1;
                    self.collect_field(&element, &mut mapping, path)?;
                }
                Ok(Event::Empty(element)) => {
                    enter_element(&mut seen_root, depth, path)?;
                    self.collect_field(&element, &mut mapping, path)?;
                }
                Ok(Event::End(_)) => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| malformed(path, "unexpected closing tag"))?;
                }
                Ok(Event::Text(_)) | Ok(Event::CData(_)) if depth == 0 => {
                    return Err(malformed(path, "text found outside of the root element"));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(malformed(path, err)),
            }
        }

        if !seen_root {
            return Err(malformed(path, "no root element"));
        }
        if depth != 0 {
            return Err(malformed(path, "unclosed element"));
        }

        Ok(mapping)
    }

    fn collect_field(
        &self,
        element: &BytesStart,
        mapping: &mut SchemaMapping,
        path: &Path,
    ) -> Result<()> {
        if element.name().as_ref() != b"field" {
            return Ok(());
        }

        let mut id = None;
        let mut type_tag = None;
        let mut optional = AttributeValue::Bool(false);

        for attribute in element.attributes() {
            let attribute = attribute.map_err(|err| malformed(path, err))?;
            let value = attribute
                .unescape_value()
                .map_err(|err| malformed(path, err))?;

            match attribute.key.as_ref() {
                b"id" => id = Some(value.into_owned()),
                b"type" => type_tag = Some(value.into_owned()),
                b"optional" => optional = AttributeValue::from_text(&value),
                _ => {}
            }
        }

        let (id, type_tag) = match (id, type_tag) {
            (Some(id), Some(type_tag)) => (id, type_tag),
            _ => {
                return Err(EtlError::ParsingMetadata {
                    message: format!(
                        "A <field> element in '{}' lacks its 'id' or 'type' attribute",
                        path.display()
                    ),
                })
            }
        };

        tracing::debug!("Schema field '{}' requires '{}'", id, type_tag);
        mapping.insert(id, FieldRequirement::new(type_tag, optional.is_truthy()));
        Ok(())
    }
}

impl SchemaLoader for XmlSchemaLoader {
    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "xml")
    }

    fn load(&self, path: &Path) -> Result<SchemaMapping> {
        let content = read_schema_file(path)?;
        self.parse(&content, path)
    }
}

fn enter_element(seen_root: &mut bool, depth: usize, path: &Path) -> Result<()> {
    if depth == 0 {
        if *seen_root {
            return Err(malformed(path, "more than one root element"));
        }
        *seen_root = true;
    }
    Ok(())
}

fn malformed(path: &Path, reason: impl Display) -> EtlError {
    EtlError::ParsingMetadata {
        message: format!(
            "The file '{}' does not contain valid XML and could not be read ({})",
            path.display(),
            reason
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<schema>
    <field id="name" type="string" />
    <field id="id" type="integer" optional="true" />
    <!-- Other comment -->
    <field id="date" type="datetime" />
</schema>"#;

    #[test]
    fn test_supports_only_xml_files() {
        let loader = XmlSchemaLoader::new();

        assert!(loader.supports(Path::new("example-desc.xml")));
        assert!(!loader.supports(Path::new("example-desc.ini")));
    }

    #[test]
    fn test_parse_well_formatted_document() {
        let mapping = XmlSchemaLoader::new()
            .parse(SCHEMA, Path::new("validation-schema.xml"))
            .unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping["name"], FieldRequirement::new("string", false));
        assert_eq!(mapping["id"], FieldRequirement::new("integer", true));
        assert_eq!(mapping["date"], FieldRequirement::new("datetime", false));
    }

    #[test]
    fn test_nested_fields_and_declaration() {
        let content = r#"<?xml version="1.0"?>
<schema><group><field id="price" type="float" optional="false"></field></group></schema>"#;

        let mapping = XmlSchemaLoader::new().parse(content, Path::new("a.xml")).unwrap();
        assert_eq!(mapping["price"], FieldRequirement::new("float", false));
    }

    #[test]
    fn test_optional_attribute_coercion() {
        assert!(AttributeValue::from_text("true").is_truthy());
        assert!(!AttributeValue::from_text("false").is_truthy());
        assert!(AttributeValue::from_text("yes").is_truthy());
        assert!(!AttributeValue::from_text("").is_truthy());
        assert!(!AttributeValue::from_text("0").is_truthy());
    }

    #[test]
    fn test_rejects_non_xml_content() {
        let result = XmlSchemaLoader::new().parse("# Comment line\nname\nid?integer\n", Path::new("bad.xml"));
        assert!(matches!(result, Err(EtlError::ParsingMetadata { .. })));
    }

    #[test]
    fn test_rejects_unclosed_and_mismatched_tags() {
        let loader = XmlSchemaLoader::new();

        assert!(loader.parse("<schema><field id=\"a\" type=\"int\"/>", Path::new("a.xml")).is_err());
        assert!(loader.parse("<schema></other>", Path::new("a.xml")).is_err());
    }

    #[test]
    fn test_field_without_type_is_rejected() {
        let result = XmlSchemaLoader::new().parse("<schema><field id=\"a\"/></schema>", Path::new("a.xml"));
        assert!(matches!(result, Err(EtlError::ParsingMetadata { .. })));
    }
}
