//! CSV to JSON/XML conversion with optional schema validation and grouping.
//!
//! ```no_run
//! use csv_export::{convert, ConversionOptions};
//!
//! let options = ConversionOptions::new("data.csv")
//!     .with_desc("schema.bini")
//!     .with_format("xml");
//! println!("{}", convert(options)?);
//! # Ok::<(), csv_export::EtlError>(())
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{ConversionOptions, FileConfig};
pub use core::{etl::EtlEngine, pipeline::CsvPipeline, validation::ValidationManager};
pub use domain::model::{Dataset, FieldRequirement, Row, SchemaMapping};
pub use utils::error::{EtlError, Result};

use utils::validation::Validate;

/// Validates `options`, then runs one conversion with the built-in loaders,
/// validators and formatters.
pub fn convert(options: ConversionOptions) -> Result<String> {
    options.validate()?;
    EtlEngine::new(CsvPipeline::new(options)).run()
}
