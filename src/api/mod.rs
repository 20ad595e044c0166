// ==========================================
// 小区性能统计工具 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行与界面桥接层调用
// ==========================================

pub mod aggregation_api;
pub mod error;

// 重导出核心类型
pub use aggregation_api::AggregationApi;
pub use error::{ApiError, ApiResult};
