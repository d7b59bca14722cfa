use crate::domain::model::{Table, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn cleaned_filename(&self) -> &str;
    fn summary_filename(&self) -> &str;
    fn top_categories(&self) -> usize;
    fn date_formats(&self) -> &[String];
    fn lenient_amounts(&self) -> bool;
    fn output_formats(&self) -> &[String];
}

pub trait Pipeline {
    fn extract(&self) -> Result<Table>;
    fn transform(&self, data: Table) -> Result<TransformResult>;
    fn load(&self, result: &TransformResult) -> Result<Vec<String>>;
}
