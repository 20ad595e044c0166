// ==========================================
// 小区性能统计工具 - 领域模型层
// ==========================================
// 职责: 固定列集合、聚合桶、输出行、校验/运行结果
// 红线: 不含文件读写逻辑
// ==========================================

pub mod bucket;
pub mod columns;
pub mod report;
pub mod types;

// 重导出核心类型
pub use bucket::{AggBucket, BucketKey, FieldAccumulator};
pub use columns::{MeasureField, MeasureKind, OutputColumn, RequiredColumn, GRAND_TOTAL_LABEL};
pub use report::{AggregationRunResult, InvalidFieldStats, OutputRow, ValidationResult};
pub use types::{Delimiter, ErrorCode, InputFormat};
