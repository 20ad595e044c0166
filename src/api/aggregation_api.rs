// ==========================================
// 小区性能统计 API
// ==========================================
// 职责: 预览校验与统计的对外入口（供界面桥接层调用）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AggregationOptions, ConfigManager};
use crate::domain::{AggregationRunResult, ValidationResult};
use crate::importer::{StatsPipeline, StatsPipelineImpl};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// 统计 API
pub struct AggregationApi {
    pipeline: Arc<dyn StatsPipeline>,
}

impl Default for AggregationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationApi {
    pub fn new() -> Self {
        Self::with_pipeline(Arc::new(StatsPipelineImpl::new()))
    }

    pub fn with_pipeline(pipeline: Arc<dyn StatsPipeline>) -> Self {
        Self { pipeline }
    }

    /// 预览并校验文件
    ///
    /// # 返回
    /// - Ok(ValidationResult): 文件不存在时同样返回 Ok（全部列缺失）
    /// - Err(ApiError::InvalidInput): 路径为空
    /// - Err(ApiError::InternalError): 流水线任务异常终止
    #[instrument(skip(self))]
    pub async fn preview(&self, file_path: &str) -> ApiResult<ValidationResult> {
        let path = validate_path(file_path)?.to_path_buf();
        let pipeline = Arc::clone(&self.pipeline);
        run_task(async move { pipeline.preview_and_validate(&path).await }).await
    }

    /// 执行统计
    ///
    /// # 返回
    /// - Ok(AggregationRunResult): 运行失败也以 success=false 的结果返回
    /// - Err(ApiError::InternalError): 流水线任务异常终止
    #[instrument(skip(self, options))]
    pub async fn aggregate(
        &self,
        file_path: &str,
        options: &AggregationOptions,
    ) -> ApiResult<AggregationRunResult> {
        let path = validate_path(file_path)?.to_path_buf();
        debug!(?options, "统计选项");
        let pipeline = Arc::clone(&self.pipeline);
        let options = *options;
        run_task(async move { pipeline.aggregate(&path, &options).await }).await
    }

    /// 使用配置文件中的选项执行统计
    pub async fn aggregate_with_config(
        &self,
        file_path: &str,
        config: &ConfigManager,
    ) -> ApiResult<AggregationRunResult> {
        let options = config
            .load()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        self.aggregate(file_path, &options).await
    }

    /// 预览结果（JSON 字符串）
    pub async fn preview_json(&self, file_path: &str) -> ApiResult<String> {
        let result = self.preview(file_path).await?;
        Ok(serde_json::to_string(&result)?)
    }

    /// 统计结果（JSON 字符串）
    ///
    /// options_json 为空串时使用默认选项
    pub async fn aggregate_json(&self, file_path: &str, options_json: &str) -> ApiResult<String> {
        let options = if options_json.trim().is_empty() {
            AggregationOptions::default()
        } else {
            serde_json::from_str(options_json)
                .map_err(|e| ApiError::InvalidInput(format!("统计选项格式错误: {}", e)))?
        };
        let result = self.aggregate(file_path, &options).await?;
        Ok(serde_json::to_string(&result)?)
    }
}

/// 在独立任务中运行流水线调用
async fn run_task<T, F>(task: F) -> ApiResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(task).await.map_err(|e| {
        error!(error = %e, "流水线任务异常终止");
        ApiError::InternalError(e.to_string())
    })
}

fn validate_path(file_path: &str) -> ApiResult<&Path> {
    if file_path.trim().is_empty() {
        return Err(ApiError::InvalidInput("文件路径为空".to_string()));
    }
    Ok(Path::new(file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    // 每次调用都 panic 的流水线
    struct PanickingPipeline;

    #[async_trait]
    impl StatsPipeline for PanickingPipeline {
        async fn preview_and_validate(&self, _path: &Path) -> ValidationResult {
            panic!("preview crashed")
        }

        async fn aggregate(
            &self,
            _path: &Path,
            _options: &AggregationOptions,
        ) -> AggregationRunResult {
            panic!("aggregate crashed")
        }
    }

    #[tokio::test]
    async fn test_crashed_pipeline_is_internal_error() {
        let api = AggregationApi::with_pipeline(Arc::new(PanickingPipeline));

        let err = api
            .aggregate("/tmp/kpi.csv", &AggregationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InternalError(_)), "{:?}", err);
        assert_eq!(err.code(), "INTERNAL_ERROR");

        let err = api.preview("/tmp/kpi.csv").await.unwrap_err();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_empty_path_is_invalid_input() {
        let api = AggregationApi::new();
        let err = api.preview("  ").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_bad_options_json_is_invalid_input() {
        let api = AggregationApi::new();
        let err = api.aggregate_json("/tmp/a.csv", "{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_file_json_contains_error_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("none.csv");
        let api = AggregationApi::new();

        let json = api
            .aggregate_json(path.to_str().unwrap(), r#"{"includeGrandTotalRow":true}"#)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["errorCode"], "FILE_NOT_FOUND");
        assert_eq!(value["invalidFieldStats"].as_object().unwrap().len(), 13);
    }
}
