use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeatingError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Roster error: {message}")]
    RosterError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SeatingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SeatingError::ConfigError { .. }
            | SeatingError::ConfigValidationError { .. }
            | SeatingError::InvalidConfigValueError { .. }
            | SeatingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SeatingError::CsvError(_) | SeatingError::RosterError { .. } => ErrorCategory::Input,
            SeatingError::SerializationError(_) | SeatingError::ExportError { .. } => {
                ErrorCategory::Output
            }
            SeatingError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 名單問題會退回示範資料，不致命
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SeatingError::CsvError(e) => format!("名單表格格式錯誤: {}", e),
            SeatingError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            SeatingError::SerializationError(e) => format!("輸出序列化失敗: {}", e),
            SeatingError::ConfigError { message } => format!("配置錯誤: {}", message),
            SeatingError::ConfigValidationError { field, message } => {
                format!("配置項 '{}' 無效: {}", field, message)
            }
            SeatingError::InvalidConfigValueError { field, value, reason } => {
                format!("配置項 '{}' 的值 '{}' 無效: {}", field, value, reason)
            }
            SeatingError::MissingConfigError { field } => format!("缺少必要配置: {}", field),
            SeatingError::RosterError { message } => format!("名單讀取失敗: {}", message),
            SeatingError::ExportError { message } => format!("結果匯出失敗: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML file and --groups/--output arguments"
            }
            ErrorCategory::Input => "Make sure the roster has id/name/gender/class columns",
            ErrorCategory::Output => "Use an output path ending in .csv, .tsv or .json",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SeatingError>;
