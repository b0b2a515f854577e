use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharelinkError {
    Validation(String),
    Conflict(String),
    CodeSpaceExhausted(String),
    NotFound(String),
    FileOperation(String),
    Serialization(String),
    StorageConfig(String),
    StorageTimeout(String),
    Internal(String),
}

impl SharelinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SharelinkError::Validation(_) => "E001",
            SharelinkError::Conflict(_) => "E002",
            SharelinkError::CodeSpaceExhausted(_) => "E003",
            SharelinkError::NotFound(_) => "E004",
            SharelinkError::FileOperation(_) => "E005",
            SharelinkError::Serialization(_) => "E006",
            SharelinkError::StorageConfig(_) => "E007",
            SharelinkError::StorageTimeout(_) => "E008",
            SharelinkError::Internal(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SharelinkError::Validation(_) => "Validation Error",
            SharelinkError::Conflict(_) => "Conflict",
            SharelinkError::CodeSpaceExhausted(_) => "Code Space Exhausted",
            SharelinkError::NotFound(_) => "Resource Not Found",
            SharelinkError::FileOperation(_) => "File Operation Error",
            SharelinkError::Serialization(_) => "Serialization Error",
            SharelinkError::StorageConfig(_) => "Storage Configuration Error",
            SharelinkError::StorageTimeout(_) => "Storage Timeout",
            SharelinkError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SharelinkError::Validation(msg) => msg,
            SharelinkError::Conflict(msg) => msg,
            SharelinkError::CodeSpaceExhausted(msg) => msg,
            SharelinkError::NotFound(msg) => msg,
            SharelinkError::FileOperation(msg) => msg,
            SharelinkError::Serialization(msg) => msg,
            SharelinkError::StorageConfig(msg) => msg,
            SharelinkError::StorageTimeout(msg) => msg,
            SharelinkError::Internal(msg) => msg,
        }
    }

    /// 调用方稍后重试可能成功（服务端错误，而非请求本身的问题）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SharelinkError::CodeSpaceExhausted(_)
                | SharelinkError::StorageTimeout(_)
                | SharelinkError::FileOperation(_)
        )
    }

    /// 由请求内容导致的错误
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SharelinkError::Validation(_) | SharelinkError::NotFound(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SharelinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SharelinkError {}

// 便捷的构造函数
impl SharelinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SharelinkError::Validation(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        SharelinkError::Conflict(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        SharelinkError::CodeSpaceExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SharelinkError::NotFound(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SharelinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SharelinkError::Serialization(msg.into())
    }

    pub fn storage_config<T: Into<String>>(msg: T) -> Self {
        SharelinkError::StorageConfig(msg.into())
    }

    pub fn storage_timeout<T: Into<String>>(msg: T) -> Self {
        SharelinkError::StorageTimeout(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        SharelinkError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for SharelinkError {
    fn from(err: std::io::Error) -> Self {
        SharelinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SharelinkError {
    fn from(err: serde_json::Error) -> Self {
        SharelinkError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for SharelinkError {
    fn from(err: url::ParseError) -> Self {
        SharelinkError::Validation(format!("Invalid URL format: {}", err))
    }
}

impl From<tokio::task::JoinError> for SharelinkError {
    fn from(err: tokio::task::JoinError) -> Self {
        SharelinkError::Internal(format!("Background task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SharelinkError>;
