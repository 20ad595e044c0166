// ==========================================
// 小区性能统计工具 - 统计流水线实现
// ==========================================
// 流程: 预览校验 → 流式聚合 → 构建输出行 → 写出结果
// 所有失败折叠为 AggregationRunResult(success=false)，从不向上抛出
// 阻塞 I/O 在 tokio::task::spawn_blocking 中执行
// ==========================================

use crate::config::limits::RESULT_PREVIEW_ROWS;
use crate::config::AggregationOptions;
use crate::domain::{AggregationRunResult, ErrorCode, InputFormat, ValidationResult};
use crate::engine::{aggregate_rows, OutputRowBuilder};
use crate::exporter::write_output;
use crate::i18n::t_with_args;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{dialect_of, UniversalFileParser};
use crate::importer::stats_pipeline_trait::{FileParser, StatsPipeline};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// StatsPipelineImpl - 统计流水线实现
// ==========================================
#[derive(Clone)]
pub struct StatsPipelineImpl {
    // 文件解析器（默认按扩展名分派）
    file_parser: Arc<dyn FileParser>,
}

impl Default for StatsPipelineImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsPipelineImpl {
    pub fn new() -> Self {
        Self::with_parser(Arc::new(UniversalFileParser))
    }

    /// 使用指定解析器创建流水线
    pub fn with_parser(file_parser: Arc<dyn FileParser>) -> Self {
        Self { file_parser }
    }

    /// 同步预览校验
    ///
    /// 文件不存在或无法解析时返回全部列缺失的结果
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn run_preview(&self, path: &Path) -> ValidationResult {
        if !path.exists() {
            warn!("输入文件不存在");
            return ValidationResult::not_found();
        }

        match self.file_parser.preview(path) {
            Ok(result) => {
                info!(
                    encoding = %result.encoding,
                    delimiter = %result.delimiter,
                    preview_rows = result.preview_rows.len(),
                    missing = result.missing_columns.len(),
                    "预览校验完成"
                );
                result
            }
            Err(e) => {
                error!(error = %e, "预览解析失败");
                ValidationResult::not_found()
            }
        }
    }

    /// 同步执行统计
    #[instrument(skip(self, path, options), fields(path = %path.display()))]
    pub fn run_aggregation(
        &self,
        path: &Path,
        options: &AggregationOptions,
    ) -> AggregationRunResult {
        let started = Instant::now();
        let mut result = self.execute(path, options);
        result.elapsed_ms = started.elapsed().as_millis() as u64;

        if result.success {
            info!(
                processed = result.processed_rows,
                skipped = result.skipped_rows,
                elapsed_ms = result.elapsed_ms,
                "统计运行成功"
            );
        } else {
            error!(
                code = ?result.error_code,
                message = result.message.as_deref().unwrap_or_default(),
                "统计运行失败"
            );
        }
        result
    }

    fn execute(&self, path: &Path, options: &AggregationOptions) -> AggregationRunResult {
        if !path.exists() {
            return failure_result(&ImportError::FileNotFound(path.display().to_string()));
        }

        // 1. 预览校验（独立调用时重新识别方言）
        let validation = match self.file_parser.preview(path) {
            Ok(v) => v,
            Err(e) => return failure_result(&e),
        };
        if !validation.required_columns_found {
            return failure_result(&ImportError::MissingColumns(validation.missing_columns));
        }

        let dialect = match dialect_of(&validation) {
            Ok(d) => d,
            Err(e) => return failure_result(&e),
        };
        let format = InputFormat::from_path(path);
        debug!(?format, encoding = dialect.encoding.name(), "方言确定");

        // 2. 全量流式聚合
        let outcome = match self
            .file_parser
            .open_rows(path, &dialect)
            .and_then(aggregate_rows)
        {
            Ok(outcome) => outcome,
            Err(e) => return failure_result(&e),
        };

        // 3. 构建输出行
        let output_rows = OutputRowBuilder::new(*options).build(outcome.buckets.values());

        let mut result = AggregationRunResult {
            success: false,
            processed_rows: outcome.processed_rows,
            skipped_rows: outcome.skipped_rows,
            invalid_field_stats: outcome.invalid_field_stats,
            output_path: None,
            result_rows: None,
            error_code: None,
            message: None,
            missing_columns: None,
            encoding: Some(validation.encoding.clone()),
            delimiter: Some(validation.delimiter),
            elapsed_ms: 0,
        };

        // 4. 写出（失败时保留已累计的计数）
        match write_output(path, format, &dialect, &output_rows) {
            Ok(output_path) => {
                result.success = true;
                result.output_path = Some(output_path);
                result.message = Some(t_with_args(
                    "aggregate.success",
                    &[
                        ("processed", &result.processed_rows.to_string()),
                        ("skipped", &result.skipped_rows.to_string()),
                        ("rows", &output_rows.len().to_string()),
                    ],
                ));
                result.result_rows =
                    Some(output_rows.into_iter().take(RESULT_PREVIEW_ROWS).collect());
            }
            Err(e) => {
                result.error_code = Some(e.error_code());
                result.message = Some(failure_message(&e));
            }
        }
        result
    }
}

#[async_trait]
impl StatsPipeline for StatsPipelineImpl {
    async fn preview_and_validate(&self, path: &Path) -> ValidationResult {
        let pipeline = self.clone();
        let path = path.to_path_buf();
        match tokio::task::spawn_blocking(move || pipeline.run_preview(&path)).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "预览任务异常终止");
                ValidationResult::not_found()
            }
        }
    }

    async fn aggregate(&self, path: &Path, options: &AggregationOptions) -> AggregationRunResult {
        let pipeline = self.clone();
        let path = path.to_path_buf();
        let options = *options;
        match tokio::task::spawn_blocking(move || pipeline.run_aggregation(&path, &options)).await
        {
            Ok(result) => result,
            Err(e) => failure_result(&ImportError::InternalError(e.to_string())),
        }
    }
}

/// 错误 → 失败结果
fn failure_result(err: &ImportError) -> AggregationRunResult {
    let mut result = AggregationRunResult::failure(err.error_code(), failure_message(err));
    if let ImportError::MissingColumns(columns) = err {
        result.missing_columns = Some(columns.clone());
    }
    result
}

/// 本地化的失败消息
fn failure_message(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(path) => {
            t_with_args("aggregate.file_not_found", &[("path", path)])
        }
        ImportError::MissingColumns(columns) => {
            let names = columns
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join("、");
            t_with_args("aggregate.missing_columns", &[("columns", &names)])
        }
        other => {
            let key = match other.error_code() {
                ErrorCode::ParseFailed => "aggregate.parse_failed",
                ErrorCode::WriteFailed => "aggregate.write_failed",
                _ => "aggregate.unknown",
            };
            t_with_args(key, &[("reason", &other.to_string())])
        }
    }
}
