// ==========================================
// 小区性能统计工具 - 统计流水线 Trait
// ==========================================
// 职责: 定义流水线接口（不包含实现）
// ==========================================

use crate::config::AggregationOptions;
use crate::domain::{AggregationRunResult, ValidationResult};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::FileDialect;
use async_trait::async_trait;
use std::path::Path;

/// 全量行游标；每项为一行的单元格文本，第 0 行为表头
pub type RowStream = Box<dyn Iterator<Item = ImportResult<Vec<String>>>>;

// ==========================================
// StatsPipeline Trait
// ==========================================
// 用途: 预览校验 + 统计主接口
// 实现者: StatsPipelineImpl
#[async_trait]
pub trait StatsPipeline: Send + Sync {
    /// 预览并校验输入文件
    ///
    /// # 返回
    /// - ValidationResult: 编码、分隔符、预览行、缺失列
    ///
    /// # 说明
    /// - 文件不存在时不报错，返回全部列缺失的结果
    async fn preview_and_validate(&self, path: &Path) -> ValidationResult;

    /// 执行统计并写出结果文件
    ///
    /// # 流程
    /// 1. 预览校验（缺列则终止）
    /// 2. 全量流式聚合
    /// 3. 构建输出行（明细 / 小计 / 总计）
    /// 4. 选择不冲突的输出路径并写出
    ///
    /// # 返回
    /// - AggregationRunResult: 所有失败以错误码形式返回，不抛出
    async fn aggregate(&self, path: &Path, options: &AggregationOptions) -> AggregationRunResult;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 有界预览：识别方言、解析表头与至多 100 行数据、校验必需列
    fn preview(&self, path: &Path) -> ImportResult<ValidationResult>;

    /// 以既定方言打开全量行游标
    fn open_rows(&self, path: &Path, dialect: &FileDialect) -> ImportResult<RowStream>;
}
