// ==========================================
// 小区性能统计工具 - 输出路径选择
// ==========================================
// 规则: <原名>-统计<扩展名> → <原名>-统计(N)<扩展名> → 时间戳后缀
// 只选择当前不存在的路径，从不覆盖
// ==========================================

use crate::config::limits::{MAX_DISAMBIGUATION_ATTEMPTS, OUTPUT_SUFFIX};
use crate::importer::error::{ImportError, ImportResult};
use chrono::Local;
use std::path::{Path, PathBuf};

/// 选择第一个不存在的输出路径
///
/// # 参数
/// - input_path: 输入文件路径（输出放在同一目录）
/// - extension: 输出扩展名（不含点）；None 表示沿用输入扩展名
pub fn choose_output_path(input_path: &Path, extension: Option<&str>) -> ImportResult<PathBuf> {
    let dir = input_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = match extension {
        Some(ext) => Some(ext.to_string()),
        None => input_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned()),
    };
    let file_name = |tail: &str| -> PathBuf {
        match &ext {
            Some(ext) => dir.join(format!("{}{}{}.{}", stem, OUTPUT_SUFFIX, tail, ext)),
            None => dir.join(format!("{}{}{}", stem, OUTPUT_SUFFIX, tail)),
        }
    };

    let base = file_name("");
    if !base.exists() {
        return Ok(base);
    }

    for n in 1..=MAX_DISAMBIGUATION_ATTEMPTS {
        let candidate = file_name(&format!("({})", n));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    let stamped = file_name(&format!("-{}", Local::now().format("%Y%m%d%H%M%S%3f")));
    if !stamped.exists() {
        return Ok(stamped);
    }

    Err(ImportError::OutputPathExhausted(base.display().to_string()))
}
