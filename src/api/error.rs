// ==========================================
// 小区性能统计工具 - API 层错误类型
// ==========================================
// 职责: 流水线契约之外的失败（参数无效、任务异常、序列化失败）
// 流水线内部失败以 AggregationRunResult 返回，不经过此类型
// ==========================================

use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置加载失败: {0}")]
    ConfigError(String),

    #[error("结果序列化失败: {0}")]
    SerializationError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误码字符串（供前端分支判断）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::SerializationError(_) => "SERIALIZATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "UNKNOWN",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
