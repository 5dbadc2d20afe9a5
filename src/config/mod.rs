#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::FileConfig;

use crate::adapters::csv::DEFAULT_DELIMITERS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use std::path::{Path, PathBuf};

pub const DEFAULT_FORMAT: &str = "json";

/// Everything one conversion needs, after merging the configuration file
/// and the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub input: PathBuf,
    pub fields: Option<Vec<String>>,
    pub aggregate: Option<String>,
    pub desc: Option<PathBuf>,
    pub format: String,
    pub pretty: bool,
    pub delimiters: Vec<char>,
}

impl ConversionOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            fields: None,
            aggregate: None,
            desc: None,
            format: DEFAULT_FORMAT.to_string(),
            pretty: false,
            delimiters: DEFAULT_DELIMITERS.to_vec(),
        }
    }

    /// Starts from the built-in defaults and applies every key the file sets.
    pub fn from_file_config(input: impl Into<PathBuf>, file: &FileConfig) -> Result<Self> {
        file.validate()?;

        let mut options = Self::new(input);
        if let Some(delimiters) = file.delimiter_chars()? {
            options.delimiters = delimiters;
        }
        if let Some(fields) = &file.input.fields {
            options.fields = Some(clean_field_names(fields));
        }
        options.desc = file.schema.desc.as_ref().map(PathBuf::from);
        options.aggregate = file.output.aggregate.clone();
        if let Some(format) = &file.output.format {
            options.format = format.clone();
        }
        options.pretty = file.output.pretty.unwrap_or(false);

        Ok(options)
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(clean_field_names(&fields));
        self
    }

    pub fn with_aggregate(mut self, field: impl Into<String>) -> Self {
        self.aggregate = Some(field.into());
        self
    }

    pub fn with_desc(mut self, desc: impl Into<PathBuf>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_delimiters(mut self, delimiters: Vec<char>) -> Self {
        self.delimiters = delimiters;
        self
    }
}

fn clean_field_names(fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

fn path_text<'a>(field: &str, path: &'a Path) -> Result<std::borrow::Cow<'a, str>> {
    let text = path.to_string_lossy();
    validate_path(field, &text)?;
    Ok(text)
}

impl Validate for ConversionOptions {
    fn validate(&self) -> Result<()> {
        path_text("input", &self.input)?;
        if let Some(desc) = &self.desc {
            path_text("desc", desc)?;
        }
        validate_non_empty_string("format", &self.format)?;

        if self.delimiters.is_empty() {
            return Err(EtlError::Config {
                message: "At least one delimiter candidate is required".to_string(),
            });
        }
        if let Some(delimiter) = self.delimiters.iter().find(|c| !c.is_ascii()) {
            return Err(EtlError::Config {
                message: format!("Delimiter {:?} is not a single ASCII character", delimiter),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ConversionOptions {
    fn input_path(&self) -> &Path {
        &self.input
    }

    fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    fn aggregate(&self) -> Option<&str> {
        self.aggregate.as_deref()
    }

    fn desc(&self) -> Option<&Path> {
        self.desc.as_deref()
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn pretty(&self) -> bool {
        self.pretty
    }

    fn delimiters(&self) -> &[char] {
        &self.delimiters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConversionOptions::new("data.csv");

        assert_eq!(options.format(), "json");
        assert!(!options.pretty());
        assert_eq!(options.fields(), None);
        assert_eq!(options.delimiters(), &DEFAULT_DELIMITERS);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_file_config() {
        let file = FileConfig::from_toml_str(
            "[input]\ndelimiters = [\"|\"]\nfields = [\" id \", \"\", \"name\"]\n[schema]\ndesc = \"s.xml\"\n[output]\nformat = \"xml\"\npretty = true\naggregate = \"id\"\n",
        )
        .unwrap();

        let options = ConversionOptions::from_file_config("data.csv", &file).unwrap();

        assert_eq!(options.delimiters, vec!['|']);
        assert_eq!(options.fields, Some(vec!["id".to_string(), "name".to_string()]));
        assert_eq!(options.desc, Some(PathBuf::from("s.xml")));
        assert_eq!(options.aggregate.as_deref(), Some("id"));
        assert_eq!(options.format, "xml");
        assert!(options.pretty);
    }

    #[test]
    fn test_invalid_file_config_is_reported_before_use() {
        let file = FileConfig::from_toml_str("[input]\ndelimiters = [\"ab\"]\n").unwrap();

        assert!(ConversionOptions::from_file_config("data.csv", &file).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ConversionOptions::new("data.csv")
            .with_delimiters(Vec::new())
            .validate()
            .is_err());
        assert!(ConversionOptions::new("data.csv")
            .with_delimiters(vec!['§'])
            .validate()
            .is_err());
        assert!(ConversionOptions::new("data.csv").with_format("").validate().is_err());
        assert!(ConversionOptions::new("bad\0path.csv").validate().is_err());
    }
}
