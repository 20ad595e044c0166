// ==========================================
// 小区性能统计工具 - 导入层
// ==========================================
// 职责: 读取外部文件，识别编码/分隔符，校验表头，提供行游标
// 支持: CSV/TSV 等分隔文本（任意编码）, Excel
// ==========================================

// 模块声明
pub mod delimiter_detector;
pub mod encoding_detector;
pub mod error;
pub mod file_parser;
pub mod header_validator;
pub mod stats_pipeline_impl;
pub mod stats_pipeline_trait;
pub mod text_normalizer;
pub mod value_parser;

// 重导出核心类型
pub use delimiter_detector::detect_delimiter;
pub use encoding_detector::{detect_encoding, normalize_encoding_label, DetectedEncoding};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileDialect, UniversalFileParser};
pub use header_validator::get_missing_columns;
pub use stats_pipeline_impl::StatsPipelineImpl;
pub use text_normalizer::normalize_header;
pub use value_parser::{format_average, format_number, parse_date_to_day, parse_numeric};

// 重导出 Trait 接口
pub use stats_pipeline_trait::{FileParser, RowStream, StatsPipeline};
