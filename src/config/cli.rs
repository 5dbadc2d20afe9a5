use crate::adapters::csv::parse_field_list;
use crate::config::{ConversionOptions, FileConfig};
use crate::utils::error::{CommandLineErrorKind, EtlError, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "csv-export", version)]
#[command(about = "Converts CSV files into JSON or XML, with optional schema validation")]
pub struct CliConfig {
    /// Delimited text file to convert
    pub file: PathBuf,

    #[arg(long, help = "Fields to extract, e.g. \"id,name\" (any detected delimiter)")]
    pub fields: Option<String>,

    #[arg(long, help = "Group rows by the value of this field")]
    pub aggregate: Option<String>,

    #[arg(long, help = "Indent the output")]
    pub pretty: bool,

    #[arg(long, help = "Schema description file (.bini or .xml)")]
    pub desc: Option<PathBuf>,

    #[arg(long, help = "Output format: json or xml [default: json]")]
    pub format: Option<String>,

    #[arg(long, help = "TOML file with default options")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Parses `args` (program name first) into a configuration.
    ///
    /// `--help` and `--version` come back as the raw clap error so the caller
    /// can print them and exit successfully.
    pub fn parse_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Merges the optional configuration file with the flags given here.
    /// Flags win.
    pub fn to_options(&self) -> Result<ConversionOptions> {
        let mut options = match &self.config {
            Some(path) => ConversionOptions::from_file_config(&self.file, &FileConfig::from_file(path)?)?,
            None => ConversionOptions::new(&self.file),
        };

        if let Some(raw) = &self.fields {
            options = options.with_fields(parse_field_list(raw)?);
        }
        if let Some(aggregate) = &self.aggregate {
            options = options.with_aggregate(aggregate.clone());
        }
        if let Some(desc) = &self.desc {
            options = options.with_desc(desc.clone());
        }
        if let Some(format) = &self.format {
            options = options.with_format(format.clone());
        }
        if self.pretty {
            options = options.with_pretty(true);
        }

        Ok(options)
    }
}

/// True for the clap outcomes that are not failures.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

impl From<clap::Error> for EtlError {
    fn from(err: clap::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::MissingRequiredArgument => CommandLineErrorKind::MissingArgument,
            ErrorKind::UnknownArgument => CommandLineErrorKind::UnknownOption,
            ErrorKind::InvalidValue | ErrorKind::NoEquals => CommandLineErrorKind::MissingValue,
            _ => CommandLineErrorKind::Invalid,
        };

        let rendered = err.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();

        EtlError::CommandLine { kind, message }
    }
}
