use super::toml_config::DEFAULT_ARCHIVE_NAME;
use crate::core::ConfigProvider;
use crate::domain::field::{FieldPolicy, InputContext};
use crate::domain::model::{InputFormat, OutputFormat};
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "oib-check")]
#[command(about = "Validate Croatian personal identification numbers (OIB)")]
pub struct CliConfig {
    /// Values to check. Without values, --input is validated as a batch
    pub values: Vec<String>,

    /// Treat each value as a 10 digit prefix and print the full OIB
    #[arg(long)]
    pub complete: bool,

    /// Input file for a batch run
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value_t = InputFormat::Csv)]
    pub format: InputFormat,

    /// Header name, or zero based index with --no-headers
    #[arg(long)]
    pub column: Option<String>,

    #[arg(long)]
    pub no_headers: bool,

    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    #[arg(long)]
    pub max_records: Option<usize>,

    /// Reject blank values
    #[arg(long)]
    pub required: bool,

    #[arg(long)]
    pub information_collector: bool,

    #[arg(long, value_enum, default_value_t = InputContext::Object)]
    pub context: InputContext,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [OutputFormat::Csv])]
    pub output_formats: Vec<OutputFormat>,

    /// Only write invalid records to the report
    #[arg(long)]
    pub only_invalid: bool,

    /// Bundle the reports into a single zip archive
    #[arg(long)]
    pub compress: bool,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log batch throughput and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn is_batch(&self) -> bool {
        self.values.is_empty()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if !self.is_batch() {
            if let Some(input) = &self.input {
                return Err(CheckError::InvalidConfigValueError {
                    field: "input".to_string(),
                    value: input.clone(),
                    reason: "--input cannot be combined with values to check".to_string(),
                });
            }
            return Ok(());
        }

        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;

        if self.output_formats.is_empty() {
            return Err(CheckError::MissingConfigError {
                field: "output_formats".to_string(),
            });
        }

        if let Some(max) = self.max_records {
            validation::validate_positive_number("max_records", max, 1)?;
        }

        if self.compress {
            validation::validate_non_empty_string("archive_name", &self.archive_name)?;
        }

        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn job_name(&self) -> &str {
        "oib-check"
    }

    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or("")
    }

    fn input_format(&self) -> InputFormat {
        self.format
    }

    fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    fn has_headers(&self) -> bool {
        !self.no_headers
    }

    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn max_records(&self) -> Option<usize> {
        self.max_records
    }

    fn field_policy(&self) -> FieldPolicy {
        FieldPolicy {
            required: self.required,
            information_collector: self.information_collector,
        }
    }

    fn input_context(&self) -> InputContext {
        self.context
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }

    fn only_invalid(&self) -> bool {
        self.only_invalid
    }

    fn archive_name(&self) -> Option<&str> {
        self.compress.then_some(self.archive_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_check_needs_no_input() {
        let config = CliConfig::parse_from(["oib-check", "69435151530", "12345678903"]);
        assert!(!config.is_batch());
        assert_eq!(config.values.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_values_and_input_conflict() {
        let config = CliConfig::parse_from(["oib-check", "69435151530", "--input", "in.csv"]);
        assert!(!config.is_batch());
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidConfigValueError { ref field, .. } if field == "input"
        ));
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_batch_requires_input() {
        let config = CliConfig::parse_from(["oib-check"]);
        assert!(config.is_batch());
        assert!(matches!(
            config.validate(),
            Err(CheckError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_batch_flags() {
        let config = CliConfig::parse_from([
            "oib-check",
            "--input",
            "people.csv",
            "--format",
            "lines",
            "--required",
            "--context",
            "collection",
            "--output-formats",
            "csv,json",
            "--compress",
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.input_path(), "people.csv");
        assert_eq!(config.input_format(), InputFormat::Lines);
        assert!(config.field_policy().required);
        assert_eq!(config.input_context(), InputContext::Collection);
        assert_eq!(
            config.output_formats(),
            &[OutputFormat::Csv, OutputFormat::Json]
        );
        assert_eq!(config.archive_name(), Some(DEFAULT_ARCHIVE_NAME));
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["oib-check", "--input", "in.csv"]);
        assert!(config.has_headers());
        assert_eq!(config.delimiter(), ',');
        assert_eq!(config.output_formats(), &[OutputFormat::Csv]);
        assert_eq!(config.archive_name(), None);
    }
}
