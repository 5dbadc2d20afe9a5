use crate::domain::model::{Dataset, FormatOptions};
use crate::domain::ports::Formatter;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Flat datasets become an array of objects, grouped ones an object of arrays.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter;

impl JsonFormatter {
    const INDENT: &'static [u8] = b"    ";

    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn supports(&self, format: &str) -> bool {
        format == "json"
    }

    fn format(&self, data: &Dataset, options: &FormatOptions) -> Result<String> {
        if !options.pretty {
            return Ok(serde_json::to_string(data)?);
        }

        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(Self::INDENT));
        data.serialize(&mut serializer)?;

        String::from_utf8(buffer).map_err(|err| EtlError::Format {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AggregatedRows, Row};
    use serde_json::json;

    fn flat() -> Dataset {
        Dataset::Flat(
            serde_json::from_value(json!([
                {"id": "1", "name": "Lior", "date": "2012-01-02"},
                {"id": "2", "name": "Magali", "date": null}
            ]))
            .unwrap(),
        )
    }

    #[test]
    fn test_supports_json_only() {
        assert!(JsonFormatter.supports("json"));
        assert!(!JsonFormatter.supports("JSON"));
        assert!(!JsonFormatter.supports("xml"));
    }

    #[test]
    fn test_compact_flat_output() {
        let output = JsonFormatter.format(&flat(), &FormatOptions::default()).unwrap();

        assert_eq!(
            output,
            r#"[{"id":"1","name":"Lior","date":"2012-01-02"},{"id":"2","name":"Magali","date":null}]"#
        );
    }

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let data = Dataset::Flat(vec![serde_json::from_value::<Row>(json!({"id": "1"})).unwrap()]);
        let output = JsonFormatter
            .format(&data, &FormatOptions { pretty: true })
            .unwrap();

        assert_eq!(output, "[\n    {\n        \"id\": \"1\"\n    }\n]");
    }

    #[test]
    fn test_grouped_output_is_an_object() {
        let mut groups = AggregatedRows::new();
        groups.insert(
            "1".to_string(),
            serde_json::from_value(json!([{"name": "Lior"}, {"name": "Max"}])).unwrap(),
        );
        groups.insert("0".to_string(), Vec::new());

        let output = JsonFormatter
            .format(&Dataset::Grouped(groups), &FormatOptions::default())
            .unwrap();
        assert_eq!(output, r#"{"1":[{"name":"Lior"},{"name":"Max"}],"0":[]}"#);
    }
}
