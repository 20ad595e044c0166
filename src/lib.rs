// ==========================================
// 小区性能统计工具 - 核心库
// ==========================================
// 功能: 读取小区性能数据文件，按 (日期, 网络) 汇总并写出统计结果
// 技术栈: Rust + csv + calamine + rust_xlsxwriter + encoding_rs
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 列定义、聚合桶、结果类型
pub mod domain;

// 导入层 - 编码/分隔符识别、表头校验、行游标
pub mod importer;

// 引擎层 - 流式聚合与输出行构建
pub mod engine;

// 输出层 - 结果文件写出
pub mod exporter;

// 配置层 - 统计选项
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{AggregationApi, ApiError};
pub use config::{AggregationOptions, ConfigManager};
pub use domain::{
    AggregationRunResult, Delimiter, ErrorCode, InvalidFieldStats, OutputColumn, OutputRow,
    RequiredColumn, ValidationResult,
};
pub use importer::{StatsPipeline, StatsPipelineImpl};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "小区性能统计工具";
