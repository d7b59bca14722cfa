use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to load '{path}': {message}")]
    LoadError { path: String, message: String },

    #[error("Required column '{column}' not found")]
    MissingColumnError { column: String },

    #[error("Column '{column}' appears more than once after normalization")]
    DuplicateColumnError { column: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼：資料或配置錯誤為 1，輸出失敗為 3
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::LoadError { .. } => ErrorCategory::Input,
            EtlError::MissingColumnError { .. }
            | EtlError::DuplicateColumnError { .. }
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::LoadError { path, .. } => {
                format!("無法讀取輸入檔案 '{}'，流程已停止", path)
            }
            EtlError::MissingColumnError { column } => {
                format!("輸入資料缺少必要欄位 '{}'", column)
            }
            EtlError::DuplicateColumnError { column } => {
                format!("欄位名稱 '{}' 在正規化後重複", column)
            }
            EtlError::CsvError(e) => format!("CSV 處理失敗: {}", e),
            EtlError::IoError(e) => format!("檔案寫入失敗: {}", e),
            EtlError::SerializationError(e) => format!("摘要序列化失敗: {}", e),
            EtlError::ConfigError { message } => format!("配置錯誤: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("配置欄位 '{}' 有誤: {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, value, reason } => {
                format!("配置欄位 '{}' 的值 '{}' 無效: {}", field, value, reason)
            }
            EtlError::MissingConfigError { field } => format!("缺少必要配置 '{}'", field),
            EtlError::ProcessingError { message } => format!("資料處理失敗: {}", message),
            EtlError::ValidationError { message } => format!("資料驗證失敗: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::LoadError { .. } => {
                "Check that the file exists, is readable, and is a well-formed delimited file"
                    .to_string()
            }
            EtlError::MissingColumnError { column } => format!(
                "Add a '{}' column to the export (header names are case-insensitive)",
                column
            ),
            EtlError::DuplicateColumnError { .. } => {
                "Rename or remove one of the conflicting header columns".to_string()
            }
            EtlError::CsvError(_) => "Verify the delimiter setting matches the file".to_string(),
            EtlError::IoError(_) | EtlError::SerializationError(_) => {
                "Check that the output directory is writable".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command-line flags or TOML configuration".to_string()
            }
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                "Inspect the input data for structural problems".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_halts_with_high_severity() {
        let err = EtlError::LoadError {
            path: "missing.csv".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_output_errors_are_critical() {
        let err = EtlError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_data_and_config_errors_exit_with_one() {
        let missing = EtlError::MissingColumnError {
            column: "amount".to_string(),
        };
        let config = EtlError::MissingConfigError {
            field: "input".to_string(),
        };
        assert_eq!(missing.severity().exit_code(), 1);
        assert_eq!(config.severity().exit_code(), 1);
    }

    #[test]
    fn test_missing_column_suggestion_names_column() {
        let err = EtlError::MissingColumnError {
            column: "amount".to_string(),
        };
        assert!(err.recovery_suggestion().contains("'amount'"));
        assert!(err.user_friendly_message().contains("amount"));
    }
}
