//! Concrete implementations behind the domain ports: CSV reading, schema
//! loaders and output formatters.

pub mod csv;
pub mod formatter;
pub mod schema;
