use crate::core::{Pipeline, Summary};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: Summary,
    pub rows_loaded: usize,
    pub rows_retained: usize,
    pub output_files: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract → transform → load，任一階段失敗即停止
    pub fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting ETL process...");

        // Extract
        let raw_data = self.pipeline.extract()?;
        tracing::info!("Extracted {} records", raw_data.len());
        self.monitor.log_stats("Extract", raw_data.len());

        // Transform
        let transformed = self.pipeline.transform(raw_data)?;
        tracing::info!(
            "Transformed {} records ({} dropped)",
            transformed.cleaned.len(),
            transformed.rows_dropped
        );
        self.monitor
            .log_stats("Transform", transformed.cleaned.len());

        // Load
        let output_files = self.pipeline.load(&transformed)?;
        self.monitor.log_stats("Load", output_files.len());
        self.monitor.log_final_stats();

        Ok(RunReport {
            rows_loaded: transformed.rows_loaded,
            rows_retained: transformed.cleaned.len(),
            summary: transformed.summary,
            output_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, Table, TransformResult};
    use crate::utils::error::EtlError;
    use std::cell::RefCell;

    struct StubPipeline {
        fail_extract: bool,
        loaded: RefCell<bool>,
    }

    impl Pipeline for StubPipeline {
        fn extract(&self) -> Result<Table> {
            if self.fail_extract {
                return Err(EtlError::LoadError {
                    path: "ledger.csv".to_string(),
                    message: "not found".to_string(),
                });
            }
            Table::with_rows(
                vec!["amount".to_string()],
                vec![vec![Cell::Number(5.0)], vec![Cell::Missing]],
            )
        }

        fn transform(&self, data: Table) -> Result<TransformResult> {
            let rows_loaded = data.len();
            let mut cleaned = data;
            cleaned.retain_rows(|row| !row[0].is_missing());
            Ok(TransformResult {
                rows_dropped: rows_loaded - cleaned.len(),
                rows_loaded,
                cleaned,
                summary: Summary::default(),
            })
        }

        fn load(&self, _result: &TransformResult) -> Result<Vec<String>> {
            *self.loaded.borrow_mut() = true;
            Ok(vec!["financial_summary.txt".to_string()])
        }
    }

    #[test]
    fn test_run_reports_row_counts() {
        let engine = EtlEngine::new_with_monitoring(
            StubPipeline {
                fail_extract: false,
                loaded: RefCell::new(false),
            },
            true,
        );

        let report = engine.run().unwrap();
        assert_eq!(report.rows_loaded, 2);
        assert_eq!(report.rows_retained, 1);
        assert_eq!(report.output_files, vec!["financial_summary.txt"]);
    }

    #[test]
    fn test_load_failure_halts_before_output() {
        let engine = EtlEngine::new(StubPipeline {
            fail_extract: true,
            loaded: RefCell::new(false),
        });

        assert!(matches!(engine.run(), Err(EtlError::LoadError { .. })));
        assert!(!*engine.pipeline.loaded.borrow());
    }
}
