// ==========================================
// 小区性能统计工具 - 引擎层
// ==========================================
// 职责: 流式聚合 + 输出行构建
// 红线: 不做文件 I/O
// ==========================================

pub mod aggregator;
pub mod output_builder;

// 重导出
pub use aggregator::{aggregate_rows, AggregationOutcome, RowOutcome, StreamingAggregator};
pub use output_builder::{bucket_to_row, OutputRowBuilder};
