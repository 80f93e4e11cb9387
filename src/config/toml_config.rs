use crate::core::pipeline::DEFAULT_COLUMN;
use crate::core::ConfigProvider;
use crate::domain::field::{FieldPolicy, InputContext};
use crate::domain::model::{InputFormat, OutputFormat};
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ARCHIVE_NAME: &str = "oib_report.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    pub field: Option<FieldConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub format: Option<InputFormat>,
    pub column: Option<String>,
    pub has_headers: Option<bool>,
    pub delimiter: Option<char>,
    pub max_records: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub required: Option<bool>,
    pub information_collector: Option<bool>,
    pub context: Option<InputContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub only_invalid: Option<bool>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.load.output_formats.is_empty() {
            return Err(CheckError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }

        if let Some(max) = self.source.max_records {
            validation::validate_positive_number("source.max_records", max, 1)?;
        }

        if let Some(delimiter) = self.source.delimiter {
            validation::validate_delimiter("source.delimiter", delimiter)?;
        }

        if !self.has_headers() {
            if let Some(column) = &self.source.column {
                if column.trim().parse::<usize>().is_err() {
                    return Err(CheckError::InvalidConfigValueError {
                        field: "source.column".to_string(),
                        value: column.clone(),
                        reason: "Use a zero based column index when has_headers = false"
                            .to_string(),
                    });
                }
            }
        }

        if let Some(name) = self.archive_name() {
            validation::validate_non_empty_string("load.compression.filename", name)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn job_name(&self) -> &str {
        &self.job.name
    }

    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn input_format(&self) -> InputFormat {
        self.source.format.unwrap_or_default()
    }

    fn column(&self) -> Option<&str> {
        self.source.column.as_deref()
    }

    fn has_headers(&self) -> bool {
        self.source.has_headers.unwrap_or(true)
    }

    fn delimiter(&self) -> char {
        self.source.delimiter.unwrap_or(',')
    }

    fn max_records(&self) -> Option<usize> {
        self.source.max_records
    }

    fn field_policy(&self) -> FieldPolicy {
        let field = self.field.as_ref();
        FieldPolicy {
            required: field.and_then(|f| f.required).unwrap_or(false),
            information_collector: field
                .and_then(|f| f.information_collector)
                .unwrap_or(false),
        }
    }

    fn input_context(&self) -> InputContext {
        self.field
            .as_ref()
            .and_then(|f| f.context)
            .unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn only_invalid(&self) -> bool {
        self.load.only_invalid.unwrap_or(false)
    }

    fn archive_name(&self) -> Option<&str> {
        let compression = self.load.compression.as_ref().filter(|c| c.enabled)?;
        Some(compression.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }
}

impl std::fmt::Display for TomlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (source: {}, column: {})",
            self.job.name,
            self.source.path,
            self.column().unwrap_or(DEFAULT_COLUMN)
        )
    }
}
