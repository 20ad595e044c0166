// ==========================================
// 小区性能统计工具 - 配置管理器
// ==========================================
// 职责: 从 JSON 文件加载统计选项
// 存储: <用户配置目录>/cell-kpi-stats/options.json
// ==========================================

use crate::config::aggregation_options::AggregationOptions;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置目录名
const CONFIG_DIR_NAME: &str = "cell-kpi-stats";

/// 配置文件名
const CONFIG_FILE_NAME: &str = "options.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 使用默认配置路径
    pub fn with_default_path() -> Self {
        Self::new(Self::default_config_path())
    }

    /// 默认配置路径；取不到用户配置目录时回退到当前目录
    pub fn default_config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取统计选项
    ///
    /// # 返回
    /// - Ok(AggregationOptions): 文件不存在时返回默认值
    /// - Err: 文件无法读取或 JSON 格式错误
    pub fn load(&self) -> Result<AggregationOptions, Box<dyn Error>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "配置文件不存在，使用默认选项");
            return Ok(AggregationOptions::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        let options: AggregationOptions = serde_json::from_str(&raw)
            .map_err(|e| format!("配置文件格式错误 ({}): {}", self.path.display(), e))?;

        info!(path = %self.path.display(), ?options, "统计选项已加载");
        Ok(options)
    }

    /// 保存统计选项（自动创建目录）
    pub fn save(&self, options: &AggregationOptions) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(options)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("absent.json"));
        assert_eq!(manager.load().unwrap(), AggregationOptions::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("nested").join("options.json"));
        let options = AggregationOptions::default()
            .with_subtotals(true)
            .with_blank_detail_dates(false);

        manager.save(&options).unwrap();
        assert_eq!(manager.load().unwrap(), options);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ConfigManager::new(path).load().is_err());
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        assert!(ConfigManager::default_config_path().ends_with("options.json"));
    }
}
