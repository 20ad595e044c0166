// ==========================================
// 小区性能统计工具 - 流水线常量
// ==========================================
// 编译期常量，不属于运行时可调配置
// ==========================================

/// 预览读取的最大字节数（2 MiB）
pub const PREVIEW_MAX_BYTES: u64 = 2 * 1024 * 1024;

/// 预览读取的行数上限（表头 + 100 行数据）
pub const PREVIEW_MAX_LINES: usize = 101;

/// 预览返回的数据行数上限
pub const PREVIEW_MAX_ROWS: usize = 100;

/// 运行结果中输出行预览的上限
pub const RESULT_PREVIEW_ROWS: usize = 200;

/// 输出文件名后缀（插在扩展名之前）
pub const OUTPUT_SUFFIX: &str = "-统计";

/// 输出文件名 (N) 消歧的最大尝试次数
pub const MAX_DISAMBIGUATION_ATTEMPTS: u32 = 1000;

/// 预览读取的分块大小
pub const READ_CHUNK_BYTES: usize = 64 * 1024;
