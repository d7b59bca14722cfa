use crate::core::aggregator::DEFAULT_TOP_CATEGORIES;
use crate::core::reporter::{DEFAULT_CLEANED_FILENAME, DEFAULT_SUMMARY_FILENAME};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub clean: CleanConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_path: Option<String>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanConfig {
    #[serde(default)]
    pub date_formats: Vec<String>,
    pub lenient_amounts: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub top_categories: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub filenames: FilenameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    #[serde(default = "default_cleaned_filename")]
    pub cleaned: String,
    #[serde(default = "default_summary_filename")]
    pub summary: String,
}

impl Default for FilenameConfig {
    fn default() -> Self {
        Self {
            cleaned: default_cleaned_filename(),
            summary: default_summary_filename(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

fn default_cleaned_filename() -> String {
    DEFAULT_CLEANED_FILENAME.to_string()
}

fn default_summary_filename() -> String {
    DEFAULT_SUMMARY_FILENAME.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EXPORT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let input =
            validation::validate_required_field("source.input_path", &self.source.input_path)?;
        validation::validate_path("source.input_path", input)?;

        if let Some(delimiter) = self.source.delimiter {
            validation::validate_delimiter("source.delimiter", delimiter)?;
        }

        if let Some(top) = self.aggregate.top_categories {
            validation::validate_positive_number("aggregate.top_categories", top, 1)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string(
            "load.filenames.cleaned",
            &self.load.filenames.cleaned,
        )?;
        validation::validate_non_empty_string(
            "load.filenames.summary",
            &self.load.filenames.summary,
        )?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.source.input_path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn delimiter(&self) -> u8 {
        self.source.delimiter.map(|d| d as u8).unwrap_or(b',')
    }

    fn cleaned_filename(&self) -> &str {
        &self.load.filenames.cleaned
    }

    fn summary_filename(&self) -> &str {
        &self.load.filenames.summary
    }

    fn top_categories(&self) -> usize {
        self.aggregate.top_categories.unwrap_or(DEFAULT_TOP_CATEGORIES)
    }

    fn date_formats(&self) -> &[String] {
        &self.clean.date_formats
    }

    fn lenient_amounts(&self) -> bool {
        self.clean.lenient_amounts.unwrap_or(false)
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
