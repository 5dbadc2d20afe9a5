use crate::domain::model::{AggregatedRows, Row};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Fails unless `field` is one of the extracted `fields`.
pub fn ensure_aggregatable(field: &str, fields: &[String]) -> Result<()> {
    if fields.iter().any(|candidate| candidate == field) {
        return Ok(());
    }

    Err(EtlError::Aggregation {
        field: field.to_string(),
        available: serde_json::to_string(fields)?,
    })
}

/// Groups `rows` by the value of `key`, dropping `key` from every row.
///
/// Buckets appear in first-seen order and keep the input row order.
pub fn aggregate(rows: Vec<Row>, key: &str) -> AggregatedRows {
    let mut grouped = AggregatedRows::new();

    for mut row in rows {
        let bucket = bucket_name(row.shift_remove(key));
        grouped.entry(bucket).or_default().push(row);
    }

    tracing::debug!("Aggregated on '{}' into {} groups", key, grouped.len());
    grouped
}

fn bucket_name(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rows_sharing_a_key_collapse() {
        let grouped = aggregate(
            rows(json!([{"id": "1", "name": "Lior"}, {"id": "1", "name": "Max"}])),
            "id",
        );

        assert_eq!(
            serde_json::to_value(&grouped).unwrap(),
            json!({"1": [{"name": "Lior"}, {"name": "Max"}]})
        );
    }

    #[test]
    fn test_bucket_and_field_order_is_kept() {
        let grouped = aggregate(
            rows(json!([
                {"zone": "b", "name": "x", "age": "1"},
                {"zone": "a", "name": "y", "age": "2"},
                {"zone": "b", "name": "z", "age": "3"}
            ])),
            "zone",
        );

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(grouped["b"].len(), 2);
        assert_eq!(grouped["b"][1]["name"], json!("z"));
        assert_eq!(grouped["b"][0].keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_null_and_missing_keys_share_the_empty_bucket() {
        let grouped = aggregate(
            rows(json!([{"id": null, "name": "a"}, {"name": "b"}, {"id": 3, "name": "c"}])),
            "id",
        );

        assert_eq!(grouped[""].len(), 2);
        assert_eq!(grouped["3"], rows(json!([{"name": "c"}])));
    }

    #[test]
    fn test_unknown_aggregate_field_lists_available_fields() {
        let fields = vec!["id".to_string(), "name".to_string()];

        assert!(ensure_aggregatable("id", &fields).is_ok());

        let err = ensure_aggregatable("date", &fields).unwrap_err();
        match &err {
            EtlError::Aggregation { field, available } => {
                assert_eq!(field, "date");
                assert_eq!(available, r#"["id","name"]"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
