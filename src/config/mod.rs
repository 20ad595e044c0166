// ==========================================
// 小区性能统计工具 - 配置层
// ==========================================
// 职责: 统计选项（可配置）与流水线常量（编译期）
// 存储: 用户配置目录下的 JSON 文件
// ==========================================

pub mod aggregation_options;
pub mod config_manager;
pub mod limits;

// 重导出
pub use aggregation_options::AggregationOptions;
pub use config_manager::ConfigManager;
