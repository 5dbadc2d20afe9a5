use crate::domain::model::{Dataset, FormatOptions, Row};
use crate::domain::ports::Formatter;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::Value;
use std::io::{Cursor, Write};

/// Writes rows as attributes of `<item>` elements under an `<export>` root.
///
/// Grouped datasets wrap the items of each group in `<group name="KEY">`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlFormatter;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

impl XmlFormatter {
    const ROOT: &'static str = "export";
    const INDENT: usize = 4;

    pub fn new() -> Self {
        Self
    }

    fn write_document(&self, writer: &mut XmlWriter, data: &Dataset, pretty: bool) -> Result<()> {
        write(writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;
        if !pretty {
            writer.get_mut().write_all(b"\n")?;
        }

        write(writer, Event::Start(BytesStart::new(Self::ROOT)))?;
        match data {
            Dataset::Flat(rows) => {
                for row in rows {
                    write_item(writer, row)?;
                }
            }
            Dataset::Grouped(groups) => {
                for (name, rows) in groups {
                    let group = BytesStart::new("group").with_attributes([("name", name.as_str())]);
                    write(writer, Event::Start(group))?;
                    for row in rows {
                        write_item(writer, row)?;
                    }
                    write(writer, Event::End(BytesEnd::new("group")))?;
                }
            }
        }
        write(writer, Event::End(BytesEnd::new(Self::ROOT)))
    }
}

impl Formatter for XmlFormatter {
    fn supports(&self, format: &str) -> bool {
        format == "xml"
    }

    fn format(&self, data: &Dataset, options: &FormatOptions) -> Result<String> {
        let mut writer = if options.pretty {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', Self::INDENT)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };

        self.write_document(&mut writer, data, options.pretty)?;

        String::from_utf8(writer.into_inner().into_inner()).map_err(|err| EtlError::Format {
            message: err.to_string(),
        })
    }
}

fn write_item(writer: &mut XmlWriter, row: &Row) -> Result<()> {
    let values = row
        .iter()
        .map(|(field, value)| {
            if !is_xml_name(field) {
                return Err(EtlError::Format {
                    message: format!(
                        "The field '{}' can not be written as an XML attribute name",
                        field
                    ),
                });
            }
            Ok((field.as_str(), attribute_text(value)))
        })
        .collect::<Result<Vec<(&str, String)>>>()?;

    let item = BytesStart::new("item")
        .with_attributes(values.iter().map(|(field, text)| (*field, text.as_str())));
    write(writer, Event::Empty(item))
}

/// The `Name` production of XML 1.0.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|err| EtlError::Format {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AggregatedRows;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_supports_xml_only() {
        assert!(XmlFormatter.supports("xml"));
        assert!(!XmlFormatter.supports("json"));
    }

    #[test]
    fn test_flat_rows_become_items() {
        let data = Dataset::Flat(rows(json!([
            {"id": "1", "name": "Lior"},
            {"id": "2", "name": null}
        ])));

        let output = XmlFormatter.format(&data, &FormatOptions::default()).unwrap();

        assert_eq!(
            output,
            "<?xml version=\"1.0\"?>\n<export><item id=\"1\" name=\"Lior\"/><item id=\"2\" name=\"\"/></export>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let data = Dataset::Flat(rows(json!([{"name": "Tom & \"Jerry\" <3"}])));
        let output = XmlFormatter.format(&data, &FormatOptions::default()).unwrap();

        assert!(output.contains(r#"name="Tom &amp; &quot;Jerry&quot; &lt;3""#));
    }

    #[test]
    fn test_grouped_rows_are_nested_by_name() {
        let mut groups = AggregatedRows::new();
        groups.insert("1".to_string(), rows(json!([{"name": "Lior"}, {"name": "Max"}])));

        let output = XmlFormatter
            .format(&Dataset::Grouped(groups), &FormatOptions::default())
            .unwrap();

        assert!(output.contains(
            r#"<group name="1"><item name="Lior"/><item name="Max"/></group>"#
        ));
    }

    #[test]
    fn test_invalid_attribute_names_are_rejected() {
        for header in ["first name", "", "1st"] {
            let mut row = Row::new();
            row.insert("id".to_string(), json!("1"));
            row.insert(header.to_string(), json!("x"));

            let err = XmlFormatter
                .format(&Dataset::Flat(vec![row]), &FormatOptions::default())
                .unwrap_err();
            match err {
                EtlError::Format { message } => {
                    assert!(message.contains(&format!("'{}'", header)), "{}", message)
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_name_production() {
        for name in ["id", "_x", "date-time", "a.b", "ns:id", "prénom", "x1"] {
            assert!(is_xml_name(name), "rejected {:?}", name);
        }
        for name in ["", "1st", "-x", ".x", "first name", "a\tb", "a=b", "a\"b"] {
            assert!(!is_xml_name(name), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_output_parses_back() {
        let mut groups = AggregatedRows::new();
        groups.insert("a&b".to_string(), rows(json!([{"name": "<Lior>", "age": null}])));

        for data in [Dataset::Flat(rows(json!([{"first_name": "Lior", "size": "5\""}]))), Dataset::Grouped(groups)] {
            for pretty in [false, true] {
                let output = XmlFormatter.format(&data, &FormatOptions { pretty }).unwrap();

                let mut reader = quick_xml::Reader::from_str(&output);
                loop {
                    match reader.read_event() {
                        Ok(Event::Eof) => break,
                        Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                            for attribute in element.attributes() {
                                attribute.unwrap();
                            }
                        }
                        Ok(_) => {}
                        Err(err) => panic!("output is not well-formed: {}\n{}", err, output),
                    }
                }
            }
        }
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let data = Dataset::Flat(rows(json!([{"id": "1"}])));
        let output = XmlFormatter
            .format(&data, &FormatOptions { pretty: true })
            .unwrap();

        assert!(output.starts_with("<?xml version=\"1.0\"?>\n<export>"));
        assert!(output.contains("\n    <item id=\"1\"/>\n</export>"));
    }
}
