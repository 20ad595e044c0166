// ==========================================
// 小区性能统计工具 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// 字段分隔符 (Delimiter)
// ==========================================
// 候选顺序即平局时的优先顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = "\t")]
    Tab,
    #[serde(rename = "|")]
    Pipe,
}

impl Delimiter {
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "\\t"),
            other => write!(f, "{}", other.as_char()),
        }
    }
}

// ==========================================
// 输入文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputFormat {
    Delimited,   // CSV/TSV 等分隔文本
    Spreadsheet, // xlsx/xls/ods
}

impl InputFormat {
    /// 按扩展名判断；未知扩展名按分隔文本处理
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => InputFormat::Spreadsheet,
            _ => InputFormat::Delimited,
        }
    }
}

// ==========================================
// 运行级错误码
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FileNotFound,
    MissingColumns,
    ParseFailed,
    WriteFailed,
    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::MissingColumns => write!(f, "MISSING_COLUMNS"),
            ErrorCode::ParseFailed => write!(f, "PARSE_FAILED"),
            ErrorCode::WriteFailed => write!(f, "WRITE_FAILED"),
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
