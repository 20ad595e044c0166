// ==========================================
// 小区性能统计工具 - 导入/统计错误类型
// ==========================================
// 工具: thiserror 派生宏
// 每个错误映射到唯一的运行级错误码
// ==========================================

use crate::domain::{ErrorCode, RequiredColumn};
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件为空或缺少表头: {0}")]
    EmptyFile(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败 (行 {row}): {message}")]
    CsvParseError { row: u64, message: String },

    #[error("编码不支持: {0}")]
    EncodingError(String),

    // ===== 表头校验错误 =====
    #[error("缺少必需列: {}", format_columns(.0))]
    MissingColumns(Vec<RequiredColumn>),

    // ===== 输出错误 =====
    #[error("结果文件写入失败: {0}")]
    WriteError(String),

    #[error("无法生成可用的输出文件名: {0}")]
    OutputPathExhausted(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 运行级错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ImportError::FileNotFound(_) => ErrorCode::FileNotFound,
            ImportError::MissingColumns(_) => ErrorCode::MissingColumns,
            ImportError::FileReadError(_)
            | ImportError::EmptyFile(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError { .. }
            | ImportError::EncodingError(_) => ErrorCode::ParseFailed,
            ImportError::WriteError(_) | ImportError::OutputPathExhausted(_) => {
                ErrorCode::WriteFailed
            }
            ImportError::InternalError(_) | ImportError::Other(_) => ErrorCode::Unknown,
        }
    }
}

fn format_columns(columns: &[RequiredColumn]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join("、")
}

// 读取侧 I/O 错误；写入侧需显式转换为 WriteError
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        let row = err.position().map(|p| p.line()).unwrap_or(0);
        ImportError::CsvParseError {
            row,
            message: err.to_string(),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::WriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
