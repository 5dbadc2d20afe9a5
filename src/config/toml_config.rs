use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_delimiters, validate_non_empty_string, validate_path, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("environment placeholder pattern is valid"));

/// Defaults read from a `--config` TOML file. Every key is optional.
///
/// ```toml
/// [input]
/// delimiters = [",", ";"]
/// fields = ["id", "name"]
///
/// [schema]
/// desc = "schema.bini"
///
/// [output]
/// format = "xml"
/// pretty = true
/// aggregate = "id"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub delimiters: Option<Vec<String>>,
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub pretty: Option<bool>,
    pub aggregate: Option<String>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| EtlError::Config {
            message: format!("Could not read '{}': {}", path.display(), err),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|err| EtlError::Config {
            message: format!("TOML parsing error: {}", err),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unknown variables are
    /// left in place.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    /// Delimiter candidates as characters, if the file overrides them.
    pub fn delimiter_chars(&self) -> Result<Option<Vec<char>>> {
        self.input
            .delimiters
            .as_deref()
            .map(|delimiters| validate_delimiters("input.delimiters", delimiters))
            .transpose()
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        self.delimiter_chars()?;

        if let Some(desc) = &self.schema.desc {
            validate_path("schema.desc", desc)?;
        }
        if let Some(format) = &self.output.format {
            validate_non_empty_string("output.format", format)?;
        }
        if let Some(aggregate) = &self.output.aggregate {
            validate_non_empty_string("output.aggregate", aggregate)?;
        }

        Ok(())
    }
}
