use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid institution '{record}': {message}")]
    ValidationError { record: String, message: String },

    #[error("Duplicate institution id: {id}")]
    DuplicateIdError { id: String },

    #[error("Institution not found: {id}")]
    NotFound { id: String },

    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn validation(record: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::ValidationError {
            record: record.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::IoError(_) | CatalogError::ZipError(_) => ErrorCategory::Io,
            CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::TomlError(_) => ErrorCategory::Format,
            CatalogError::ConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CatalogError::ValidationError { .. }
            | CatalogError::DuplicateIdError { .. }
            | CatalogError::NotFound { .. }
            | CatalogError::UnknownVariant { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::NotFound { .. } => ErrorSeverity::Low,
            CatalogError::ValidationError { .. }
            | CatalogError::DuplicateIdError { .. }
            | CatalogError::UnknownVariant { .. } => ErrorSeverity::Medium,
            CatalogError::ConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::TomlError(_) => ErrorSeverity::High,
            CatalogError::IoError(_) | CatalogError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::IoError(_) => "檢查檔案路徑是否存在且具有讀寫權限".to_string(),
            CatalogError::ZipError(_) => "確認輸出目錄可寫入，或關閉 ZIP 壓縮後重試".to_string(),
            CatalogError::CsvError(_) => "檢查機構資料中是否含有無法輸出的欄位".to_string(),
            CatalogError::SerializationError(_) => {
                "確認機構資料為合法 JSON，欄位名稱使用 camelCase".to_string()
            }
            CatalogError::TomlError(_) => "確認設定檔為合法 TOML 格式".to_string(),
            CatalogError::ConfigError { .. } | CatalogError::MissingConfigError { .. } => {
                "補齊設定檔中缺少的欄位".to_string()
            }
            CatalogError::InvalidConfigValueError { field, .. } => {
                format!("修正設定欄位 '{}' 的值", field)
            }
            CatalogError::ValidationError { record, .. } => {
                format!("修正機構 '{}' 的資料後重新匯入", record)
            }
            CatalogError::DuplicateIdError { id } => format!("移除或重新編號重複的機構 id '{}'", id),
            CatalogError::NotFound { .. } => "確認機構 id 是否存在於目錄中".to_string(),
            CatalogError::UnknownVariant { kind, .. } => format!("使用 {} 允許的值", kind),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("檔案操作失敗: {}", self),
            ErrorCategory::Format => format!("資料格式錯誤: {}", self),
            ErrorCategory::Configuration => format!("設定錯誤: {}", self),
            ErrorCategory::Data => format!("機構資料錯誤: {}", self),
        }
    }

    /// 依嚴重程度決定 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_is_data_error() {
        let err = CatalogError::DuplicateIdError { id: "1".into() };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.recovery_suggestion().contains("'1'"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: CatalogError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("檔案操作失敗"));
    }

    #[test]
    fn test_not_found_exits_cleanly() {
        let err = CatalogError::NotFound { id: "42".into() };
        assert_eq!(err.exit_code(), 0);
        assert_eq!(err.to_string(), "Institution not found: 42");
    }
}
