//! Built-in type validators.
//!
//! Every validator is a pure predicate over a `serde_json::Value`. Extracted
//! CSV values are always strings, but the checks also accept the JSON scalar
//! that a string stands for (`Number(1)` for `integer`, `Bool(true)` for
//! `boolean`), so they can be reused on typed data.

use crate::domain::ports::TypeValidator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const DATE_PATTERN: &str = r"[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])";
// Minutes only go up to 31. See `test_time_minutes_stop_at_31`.
const TIME_PATTERN: &str = r"(0[0-9]|1[0-9]|2[0-3]):(0[0-9]|1[0-9]|2[0-9]|3[0-1]):([0-5][0-9])";

static DATE_RE: Lazy<Regex> = Lazy::new(|| anchored(DATE_PATTERN));
static TIME_RE: Lazy<Regex> = Lazy::new(|| anchored(TIME_PATTERN));
static DATETIME_RE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{} {}", DATE_PATTERN, TIME_PATTERN)));
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    anchored(r"[ \t\n\r\v\f]*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[ \t\n\r\v\f]*")
});

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).expect("built-in validator pattern is valid")
}

fn matches_string(re: &Regex, value: &Value) -> bool {
    value.as_str().is_some_and(|text| re.is_match(text))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StringValidator;

impl TypeValidator for StringValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "string"
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|text| !text.is_empty())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerValidator;

impl TypeValidator for IntegerValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "int" || type_tag == "integer"
    }

    /// Integers, or strings made only of decimal digits (no sign).
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Number(number) => number.is_i64() || number.is_u64(),
            Value::String(text) => !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FloatValidator;

impl TypeValidator for FloatValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "float"
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Number(_) => true,
            Value::String(text) => NUMERIC_RE.is_match(text),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanValidator;

impl BooleanValidator {
    const ACCEPTED_TEXT: [&'static str; 8] = ["true", "1", "on", "yes", "false", "0", "off", "no"];
}

impl TypeValidator for BooleanValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "bool" || type_tag == "boolean"
    }

    /// Strict membership: `true`, `false`, the integers `0` and `1`, and the
    /// strings "true", "1", "on", "yes", "false", "0", "off", "no".
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Bool(_) => true,
            Value::Number(number) => matches!(number.as_i64(), Some(0) | Some(1)),
            Value::String(text) => Self::ACCEPTED_TEXT.contains(&text.as_str()),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DateValidator;

impl TypeValidator for DateValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "date"
    }

    /// `YYYY-MM-DD`, pattern only: 2023-02-31 passes.
    fn validate(&self, value: &Value) -> bool {
        matches_string(&DATE_RE, value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TimeValidator;

impl TypeValidator for TimeValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "time"
    }

    fn validate(&self, value: &Value) -> bool {
        matches_string(&TIME_RE, value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeValidator;

impl TypeValidator for DateTimeValidator {
    fn supports(&self, type_tag: &str) -> bool {
        type_tag == "datetime"
    }

    fn validate(&self, value: &Value) -> bool {
        matches_string(&DATETIME_RE, value)
    }
}

/// The built-in validators, in registration order.
pub fn default_validators() -> Vec<Box<dyn TypeValidator>> {
    vec![
        Box::new(StringValidator),
        Box::new(DateValidator),
        Box::new(IntegerValidator),
        Box::new(FloatValidator),
        Box::new(BooleanValidator),
        Box::new(DateTimeValidator),
        Box::new(TimeValidator),
    ]
}
