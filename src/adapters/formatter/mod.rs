//! Output formatters, picked by format name.

pub mod json;
pub mod xml;

pub use json::JsonFormatter;
pub use xml::XmlFormatter;

use crate::domain::ports::Formatter;

/// JSON first, then XML.
pub fn default_formatters() -> Vec<Box<dyn Formatter>> {
    vec![Box::new(JsonFormatter::new()), Box::new(XmlFormatter::new())]
}
