use crate::adapters::csv::{read_source, CsvExtractor};
use crate::adapters::formatter::default_formatters;
use crate::core::aggregation::{aggregate, ensure_aggregatable};
use crate::core::validation::ValidationManager;
use crate::core::{ConfigProvider, Pipeline};
use crate::domain::model::{Dataset, FormatOptions, Row};
use crate::domain::ports::Formatter;
use crate::utils::error::{EtlError, Result};

/// CSV file in, JSON or XML document out.
pub struct CsvPipeline<C: ConfigProvider> {
    config: C,
    extractor: CsvExtractor,
    validation: ValidationManager,
    formatters: Vec<Box<dyn Formatter>>,
    fields: Vec<String>,
}

impl<C: ConfigProvider> CsvPipeline<C> {
    pub fn new(config: C) -> Self {
        let extractor = CsvExtractor::new(config.delimiters().to_vec());
        Self {
            config,
            extractor,
            validation: ValidationManager::with_defaults(),
            formatters: default_formatters(),
            fields: Vec::new(),
        }
    }

    /// Replaces the default loaders and validators.
    pub fn with_validation(mut self, validation: ValidationManager) -> Self {
        self.validation = validation;
        self
    }

    /// Registers a formatter ahead of the built-in ones.
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatters.insert(0, Box::new(formatter));
        self
    }

    /// Fields picked during extraction.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_rows(&self, rows: Vec<Row>) -> Result<Vec<Row>> {
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                self.validation
                    .apply_schema_to_row(row)
                    .map_err(|err| match err {
                        EtlError::Validation { .. } => EtlError::CsvInvalidValue {
                            line: index + 1,
                            source: Box::new(err),
                        },
                        other => other,
                    })
            })
            .collect()
    }
}

impl<C: ConfigProvider> Pipeline for CsvPipeline<C> {
    fn extract(&mut self) -> Result<Vec<Row>> {
        let source = read_source(self.config.input_path())?;

        let headers = self.extractor.extract_headers(&source)?;
        self.fields = match self.config.fields() {
            Some(requested) => self.extractor.select_fields(&headers, requested),
            None => headers,
        };
        tracing::debug!("Extracting fields: {}", self.fields.join(", "));

        self.extractor.extract_rows(&source, Some(self.fields.as_slice()))
    }

    fn transform(&mut self, data: Vec<Row>) -> Result<Dataset> {
        let rows = match self.config.desc() {
            Some(desc) => {
                self.validation.load_schema(desc)?;
                self.validate_rows(data)?
            }
            None => data,
        };

        match self.config.aggregate() {
            Some(field) => {
                ensure_aggregatable(field, &self.fields)?;
                Ok(Dataset::Grouped(aggregate(rows, field)))
            }
            None => Ok(Dataset::Flat(rows)),
        }
    }

    fn load(&self, data: Dataset) -> Result<String> {
        let format = self.config.format();
        let formatter = self
            .formatters
            .iter()
            .find(|formatter| formatter.supports(format))
            .ok_or_else(|| EtlError::FormatterNotFound {
                format: format.to_string(),
            })?;

        let options = FormatOptions {
            pretty: self.config.pretty(),
        };
        formatter.format(&data, &options)
    }
}
