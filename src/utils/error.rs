use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Input error: {message}")]
    InputError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::IoError(_) | CheckError::ZipError(_) => ErrorCategory::Io,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CheckError::CsvError(_) | CheckError::InputError { .. } => ErrorCategory::Input,
            CheckError::SerializationError(_) | CheckError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 輸入檔案內容問題，修正後重跑即可
            CheckError::CsvError(_) | CheckError::InputError { .. } => ErrorSeverity::Medium,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. }
            | CheckError::ProcessingError { .. } => ErrorSeverity::High,
            CheckError::IoError(_)
            | CheckError::ZipError(_)
            | CheckError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CheckError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the input file exists and the path is correct".to_string()
            }
            CheckError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            CheckError::CsvError(_) => {
                "Check the CSV delimiter and header settings against the input file".to_string()
            }
            CheckError::SerializationError(_) => {
                "Report serialization failed; re-run with --verbose and file a bug".to_string()
            }
            CheckError::ZipError(_) => {
                "Disable compression or check the output directory".to_string()
            }
            CheckError::MissingConfigError { field } => {
                format!("Set '{}' on the command line or in the config file", field)
            }
            CheckError::InvalidConfigValueError { field, .. }
            | CheckError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and try again", field)
            }
            CheckError::ConfigError { .. } => "Review the configuration file".to_string(),
            CheckError::InputError { .. } => {
                "Check the column name or index against the input file".to_string()
            }
            CheckError::ProcessingError { .. } => {
                "Re-run with --verbose for more details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File operation failed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read the input: {}", self),
            ErrorCategory::Processing => format!("Validation run failed: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
