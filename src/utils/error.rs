use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLineErrorKind {
    MissingArgument,
    UnknownOption,
    MissingValue,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Schema,
    Data,
    Output,
    CommandLine,
    Config,
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("No file was found located in '{path}'")]
    FileNotFound { path: String },

    #[error("Could not open '{path}' even though it exists: {source}")]
    FileNotReadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV file format error: {message}")]
    CsvFileFormat { message: String },

    #[error("Schema parsing error: {message}")]
    ParsingMetadata { message: String },

    #[error("No loader was found to analyse '{path}'")]
    LoaderNotFound { path: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("On line {line} of your CSV data: {source}")]
    CsvInvalidValue {
        line: usize,
        #[source]
        source: Box<EtlError>,
    },

    #[error("Aggregation is impossible with '{field}' which is not part of extracted fields ({available})")]
    Aggregation { field: String, available: String },

    #[error("No formatter supports the '{format}' output format")]
    FormatterNotFound { format: String },

    #[error("{message}")]
    CommandLine {
        kind: CommandLineErrorKind,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {message}")]
    Format { message: String },
}

impl EtlError {
    /// Maps a failed open of `path`: a missing file is `FileNotFound`,
    /// anything else is `FileNotReadable`.
    pub fn from_open_error(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => EtlError::FileNotFound { path },
            _ => EtlError::FileNotReadable { path, source },
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EtlError::Validation {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FileNotFound { .. }
            | EtlError::FileNotReadable { .. }
            | EtlError::CsvFileFormat { .. }
            | EtlError::Csv(_)
            | EtlError::Io(_) => ErrorCategory::Input,
            EtlError::ParsingMetadata { .. } | EtlError::LoaderNotFound { .. } => {
                ErrorCategory::Schema
            }
            EtlError::Validation { .. }
            | EtlError::CsvInvalidValue { .. }
            | EtlError::Aggregation { .. } => ErrorCategory::Data,
            EtlError::FormatterNotFound { .. }
            | EtlError::Serialization(_)
            | EtlError::Format { .. } => ErrorCategory::Output,
            EtlError::CommandLine { .. } => ErrorCategory::CommandLine,
            EtlError::Config { .. } | EtlError::InvalidConfigValue { .. } => ErrorCategory::Config,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FileNotFound { .. } => "Check the given path, it is resolved from the current directory",
            EtlError::FileNotReadable { .. } => "Make sure you have read rights on the file",
            EtlError::CsvFileFormat { .. } | EtlError::Csv(_) => {
                "Make sure the file is not empty and its first line holds the headers"
            }
            EtlError::ParsingMetadata { .. } => {
                "Each schema line must look like 'field=type' or 'field=?type'"
            }
            EtlError::LoaderNotFound { .. } => "Schema files must use the .bini or .xml extension",
            EtlError::Validation { .. } | EtlError::CsvInvalidValue { .. } => {
                "Fix the data or relax the schema (prefix the type with '?' for optional fields)"
            }
            EtlError::Aggregation { .. } => "Add the aggregate field to --fields or pick another field",
            EtlError::FormatterNotFound { .. } => "Use --format json or --format xml",
            EtlError::CommandLine { .. } => {
                "Usage: csv-export <FILE> [--fields a,b] [--aggregate field] [--desc schema] [--format json|xml] [--pretty]"
            }
            EtlError::Config { .. } | EtlError::InvalidConfigValue { .. } => {
                "Check the configuration file and command-line options"
            }
            EtlError::Io(_) | EtlError::Serialization(_) | EtlError::Format { .. } => {
                "Run again with --verbose for more details"
            }
        }
    }

    /// Single-line message printed by the binary.
    pub fn user_friendly_message(&self) -> String {
        format!("An error occurred: {}", self)
            .lines()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_invalid_value_keeps_inner_validation_error() {
        let err = EtlError::CsvInvalidValue {
            line: 3,
            source: Box::new(EtlError::validation("The field 'id' can not be empty")),
        };

        assert_eq!(
            err.to_string(),
            "On line 3 of your CSV data: The field 'id' can not be empty"
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "The field 'id' can not be empty");
        assert_eq!(err.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_open_errors_split_on_not_found() {
        let path = std::path::Path::new("input.csv");

        let missing = EtlError::from_open_error(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(missing, EtlError::FileNotFound { ref path } if path == "input.csv"));

        let denied = EtlError::from_open_error(path, std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, EtlError::FileNotReadable { .. }));
    }

    #[test]
    fn test_user_friendly_message_is_single_line() {
        let err = EtlError::ParsingMetadata {
            message: "Line 'name\n' is not well formatted on line 2 in file a.bini".to_string(),
        };

        assert!(!err.user_friendly_message().contains('\n'));
        assert!(err.user_friendly_message().starts_with("An error occurred: "));
    }
}
