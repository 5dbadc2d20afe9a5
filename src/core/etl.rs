use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once and returns the document.
    pub fn run(&mut self) -> Result<String> {
        tracing::info!("Starting conversion");

        tracing::info!("Extracting rows...");
        let rows = self.pipeline.extract()?;
        tracing::info!("Extracted {} rows", rows.len());

        tracing::info!("Transforming rows...");
        let dataset = self.pipeline.transform(rows)?;
        tracing::info!(
            "Transformed {} rows{}",
            dataset.row_count(),
            if dataset.is_grouped() { " into groups" } else { "" }
        );

        tracing::info!("Formatting output...");
        let output = self.pipeline.load(dataset)?;
        tracing::debug!("Produced {} bytes", output.len());

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dataset, Row};
    use crate::utils::error::EtlError;

    #[derive(Default)]
    struct RecordingPipeline {
        stages: Vec<&'static str>,
        fail_transform: bool,
    }

    impl Pipeline for RecordingPipeline {
        fn extract(&mut self) -> Result<Vec<Row>> {
            self.stages.push("extract");
            Ok(vec![Row::new()])
        }

        fn transform(&mut self, data: Vec<Row>) -> Result<Dataset> {
            self.stages.push("transform");
            if self.fail_transform {
                return Err(EtlError::validation("boom"));
            }
            Ok(Dataset::Flat(data))
        }

        fn load(&self, data: Dataset) -> Result<String> {
            Ok(format!("{} rows", data.row_count()))
        }
    }

    #[test]
    fn test_run_sequences_stages() {
        let mut engine = EtlEngine::new(RecordingPipeline::default());

        assert_eq!(engine.run().unwrap(), "1 rows");
        assert_eq!(engine.pipeline.stages, vec!["extract", "transform"]);
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let mut engine = EtlEngine::new(RecordingPipeline {
            fail_transform: true,
            ..Default::default()
        });

        assert!(matches!(engine.run(), Err(EtlError::Validation { .. })));
    }
}
