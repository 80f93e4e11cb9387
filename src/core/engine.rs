use crate::domain::model::RunOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::BatchMonitor;

pub struct ValidationEngine<P: Pipeline> {
    pipeline: P,
    monitor: BatchMonitor,
}

impl<P: Pipeline> ValidationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: BatchMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting OIB validation run");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());
        self.monitor.log_stats("Extract", records.len());

        // Transform
        let report = self.pipeline.transform(records).await?;
        let summary = report.summary;
        tracing::info!(
            "🔎 Checked {} records: {} valid, {} empty, {} invalid",
            summary.total,
            summary.valid,
            summary.empty,
            summary.invalid
        );
        self.monitor.log_stats("Validate", summary.total);

        // Load
        let written = self.pipeline.load(report).await?;
        for path in &written {
            tracing::info!("📁 Report saved to: {}", path);
        }
        self.monitor.log_final_stats(summary.total);

        Ok(RunOutcome { summary, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Record, RecordStatus, ReportSummary, ValidationReport};
    use crate::utils::error::CheckError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedPipeline {
        values: Vec<&'static str>,
        loaded: Mutex<Option<ValidationReport>>,
        fail_load: bool,
    }

    impl FixedPipeline {
        fn new(values: Vec<&'static str>) -> Self {
            Self {
                values,
                loaded: Mutex::new(None),
                fail_load: false,
            }
        }
    }

    #[async_trait]
    impl Pipeline for FixedPipeline {
        async fn extract(&self) -> Result<Vec<Record>> {
            Ok(self
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| Record {
                    position: i + 1,
                    value: Some(v.to_string()),
                })
                .collect())
        }

        async fn transform(&self, records: Vec<Record>) -> Result<ValidationReport> {
            let mut summary = ReportSummary::default();
            let outcomes = records
                .iter()
                .map(|r| {
                    let outcome = crate::core::pipeline::evaluate(
                        r,
                        Default::default(),
                        Default::default(),
                    );
                    summary.record(outcome.status);
                    outcome
                })
                .collect();
            Ok(ValidationReport {
                job: "fixed".to_string(),
                generated_at: chrono::Utc::now(),
                summary,
                outcomes,
            })
        }

        async fn load(&self, report: ValidationReport) -> Result<Vec<String>> {
            if self.fail_load {
                return Err(CheckError::ProcessingError {
                    message: "sink closed".to_string(),
                });
            }
            *self.loaded.lock().unwrap() = Some(report);
            Ok(vec!["memory".to_string()])
        }
    }

    #[tokio::test]
    async fn test_run_passes_report_through_stages() {
        let engine = ValidationEngine::new(FixedPipeline::new(vec![
            "69435151530",
            "",
            "69435151531",
        ]));

        let outcome = engine.run().await.unwrap();
        assert_eq!(outcome.written, vec!["memory".to_string()]);
        assert_eq!(outcome.summary.total, 3);
        assert_eq!(outcome.summary.valid, 1);
        assert_eq!(outcome.summary.empty, 1);
        assert_eq!(outcome.summary.invalid, 1);

        let loaded = engine.pipeline.loaded.lock().unwrap().clone().unwrap();
        assert_eq!(loaded.outcomes[2].status, RecordStatus::Invalid);
    }

    #[test]
    fn test_run_propagates_load_errors() {
        let mut pipeline = FixedPipeline::new(vec!["69435151530"]);
        pipeline.fail_load = true;
        let engine = ValidationEngine::new_with_monitoring(pipeline, true);

        let err = tokio_test::block_on(engine.run()).unwrap_err();
        assert!(matches!(err, CheckError::ProcessingError { .. }));
    }
}
