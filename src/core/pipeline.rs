use crate::core::aggregator::Aggregator;
use crate::core::cleaner::Cleaner;
use crate::core::loader::Loader;
use crate::core::reporter;
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::utils::error::Result;
use std::path::Path;

pub struct FinancialPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    cleaner: Cleaner,
    aggregator: Aggregator,
}

impl<S: Storage, C: ConfigProvider> FinancialPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let cleaner = Cleaner::new(config.date_formats().to_vec(), config.lenient_amounts());
        let aggregator = Aggregator::new(config.top_categories());
        Self {
            storage,
            config,
            cleaner,
            aggregator,
        }
    }

    fn wants_format(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for FinancialPipeline<S, C> {
    fn extract(&self) -> Result<Table> {
        tracing::info!("📂 Loading data from: {}", self.config.input_path());
        Loader::load_path(self.config.input_path(), self.config.delimiter())
    }

    fn transform(&self, data: Table) -> Result<TransformResult> {
        let rows_loaded = data.len();

        let cleaned = self.cleaner.clean(data)?;
        let summary = self.aggregator.aggregate(&cleaned);

        Ok(TransformResult {
            rows_dropped: rows_loaded - cleaned.len(),
            rows_loaded,
            cleaned,
            summary,
        })
    }

    fn load(&self, result: &TransformResult) -> Result<Vec<String>> {
        let summary_name = self.config.summary_filename();
        let cleaned_name = self.config.cleaned_filename();

        // 先產生所有輸出內容，序列化失敗時不留下任何檔案；摘要最後寫入
        let mut outputs: Vec<(String, Vec<u8>)> = vec![(
            cleaned_name.to_string(),
            reporter::write_table(&result.cleaned, self.config.delimiter())?,
        )];
        if self.wants_format("tsv") {
            outputs.push((
                with_extension(cleaned_name, "tsv"),
                reporter::write_table(&result.cleaned, b'\t')?,
            ));
        }
        if self.wants_format("json") {
            outputs.push((
                with_extension(summary_name, "json"),
                reporter::summary_json(&result.summary)?.into_bytes(),
            ));
        }
        outputs.push((
            summary_name.to_string(),
            reporter::render_summary(&result.summary).into_bytes(),
        ));

        let mut written = Vec::with_capacity(outputs.len());
        for (name, data) in &outputs {
            let path = self.storage.write_file(name, data)?;
            tracing::info!("📄 Exported {}", path);
            written.push(path);
        }

        tracing::debug!("Wrote {} output files", written.len());
        Ok(written)
    }
}

fn with_extension(filename: &str, extension: &str) -> String {
    Path::new(filename)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}
