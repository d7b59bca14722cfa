pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::reporter::{DEFAULT_CLEANED_FILENAME, DEFAULT_SUMMARY_FILENAME};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "small-fin-etl")]
#[command(about = "Clean an accounting CSV export and summarize revenue, expenses and profit")]
pub struct CliConfig {
    /// Path to the exported CSV file; prompted for interactively when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_CLEANED_FILENAME)]
    pub cleaned_file: String,

    #[arg(long, default_value = DEFAULT_SUMMARY_FILENAME)]
    pub summary_file: String,

    #[arg(long, default_value = ",")]
    pub delimiter: char,

    #[arg(long, default_value = "5")]
    pub top_categories: usize,

    /// Extra chrono date format, tried before the built-in ones (repeatable)
    #[arg(long = "date-format")]
    pub date_formats: Vec<String>,

    /// Accept amounts like "$1,200.00" or "(30.00)"
    #[arg(long)]
    pub lenient_amounts: bool,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log timing and row counts for each phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> u8 {
        self.delimiter as u8
    }

    fn cleaned_filename(&self) -> &str {
        &self.cleaned_file
    }

    fn summary_filename(&self) -> &str {
        &self.summary_file
    }

    fn top_categories(&self) -> usize {
        self.top_categories
    }

    fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    fn lenient_amounts(&self) -> bool {
        self.lenient_amounts
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("cleaned_file", &self.cleaned_file)?;
        validation::validate_non_empty_string("summary_file", &self.summary_file)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_positive_number("top_categories", self.top_categories, 1)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["small-fin-etl", "--input", "ledger.csv"]);

        assert_eq!(config.input_path(), "ledger.csv");
        assert_eq!(config.cleaned_filename(), "cleaned_data.csv");
        assert_eq!(config.summary_filename(), "financial_summary.txt");
        assert_eq!(config.delimiter(), b',');
        assert_eq!(config.top_categories(), 5);
        assert_eq!(config.output_formats(), &["csv".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_repeatable_date_formats_and_formats_list() {
        let config = CliConfig::parse_from([
            "small-fin-etl",
            "-i",
            "ledger.csv",
            "--date-format",
            "%d.%m.%Y",
            "--date-format",
            "%b %d, %Y",
            "--output-formats",
            "csv,json",
            "--delimiter",
            ";",
        ]);

        assert_eq!(config.date_formats().len(), 2);
        assert_eq!(config.output_formats().len(), 2);
        assert_eq!(config.delimiter(), b';');
    }

    #[test]
    fn test_cli_validation_requires_input() {
        let config = CliConfig::parse_from(["small-fin-etl"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_validation_rejects_zero_top_categories() {
        let config =
            CliConfig::parse_from(["small-fin-etl", "-i", "a.csv", "--top-categories", "0"]);
        assert!(config.validate().is_err());
    }
}
