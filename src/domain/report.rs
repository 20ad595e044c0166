// ==========================================
// 小区性能统计工具 - 校验结果与运行结果
// ==========================================
// ValidationResult: 预览/校验阶段产物（每个文件新建，返回后不变）
// AggregationRunResult: 一次统计运行的终态
// ==========================================

use crate::domain::columns::{MeasureField, OutputColumn, RequiredColumn};
use crate::domain::types::{Delimiter, ErrorCode};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// ValidationResult - 预览校验结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// 识别出的编码（encoding_rs 名称，如 "UTF-8"、"gb18030"）
    pub encoding: String,
    pub delimiter: Delimiter,
    /// 文件是否带字节序标记
    pub has_bom: bool,
    /// 表头 + 至多 100 行数据（原始文本）
    pub preview_rows: Vec<Vec<String>>,
    pub required_columns_found: bool,
    pub missing_columns: Vec<RequiredColumn>,
}

impl ValidationResult {
    /// 文件不存在时的结果：全部必需列缺失，默认编码/分隔符
    pub fn not_found() -> Self {
        Self {
            encoding: encoding_rs::UTF_8.name().to_string(),
            delimiter: Delimiter::default(),
            has_bom: false,
            preview_rows: Vec::new(),
            required_columns_found: false,
            missing_columns: RequiredColumn::ALL.to_vec(),
        }
    }
}

// ==========================================
// InvalidFieldStats - 逐字段无效值计数
// ==========================================
// 13 个键全部预置为 0，按规范列顺序序列化
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidFieldStats {
    counts: [u64; RequiredColumn::COUNT],
}

impl InvalidFieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, column: RequiredColumn) {
        self.counts[column.index()] += 1;
    }

    pub fn get(&self, column: RequiredColumn) -> u64 {
        self.counts[column.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// (列名, 计数) 列表，覆盖全部被跟踪列
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        RequiredColumn::TRACKED
            .iter()
            .map(|col| (col.name(), self.get(*col)))
            .collect()
    }
}

impl Serialize for InvalidFieldStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RequiredColumn::TRACKED.len()))?;
        for (name, count) in self.entries() {
            map.serialize_entry(name, &count)?;
        }
        map.end()
    }
}

// ==========================================
// OutputRow - 输出行（固定 12 列）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    /// 日期 / 空串（小计下的明细行） / "总计"
    pub time: String,
    /// 网络；小计行与总计行为空
    pub network: String,
    values: [String; MeasureField::COUNT],
}

impl OutputRow {
    pub fn new(time: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            network: network.into(),
            values: Default::default(),
        }
    }

    pub fn set(&mut self, field: MeasureField, value: String) {
        self.values[field.index()] = value;
    }

    pub fn value(&self, field: MeasureField) -> &str {
        &self.values[field.index()]
    }

    pub fn get(&self, column: OutputColumn) -> &str {
        match column {
            OutputColumn::Time => &self.time,
            OutputColumn::Network => &self.network,
            OutputColumn::Measure(field) => self.value(field),
        }
    }

    /// 按输出列顺序返回各字段
    pub fn fields(&self) -> [&str; OutputColumn::COUNT] {
        OutputColumn::ALL.map(|col| self.get(col))
    }
}

impl Serialize for OutputRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(OutputColumn::COUNT))?;
        for col in OutputColumn::ALL {
            map.serialize_entry(col.name(), self.get(col))?;
        }
        map.end()
    }
}

// ==========================================
// AggregationRunResult - 统计运行结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRunResult {
    pub success: bool,
    pub processed_rows: u64,
    pub skipped_rows: u64,
    pub invalid_field_stats: InvalidFieldStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// 输出行预览（至多 200 行）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_rows: Option<Vec<OutputRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_columns: Option<Vec<RequiredColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<Delimiter>,
    pub elapsed_ms: u64,
}

impl AggregationRunResult {
    /// 失败结果；计数保持为 0 或调用方已累计的值
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            processed_rows: 0,
            skipped_rows: 0,
            invalid_field_stats: InvalidFieldStats::new(),
            output_path: None,
            result_rows: None,
            error_code: Some(code),
            message: Some(message.into()),
            missing_columns: None,
            encoding: None,
            delimiter: None,
            elapsed_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_reports_every_column_missing() {
        let result = ValidationResult::not_found();
        assert!(!result.required_columns_found);
        assert_eq!(result.missing_columns.len(), 14);
        assert_eq!(result.encoding, "UTF-8");
        assert_eq!(result.delimiter, Delimiter::Comma);
        assert!(result.preview_rows.is_empty());
    }

    #[test]
    fn test_invalid_field_stats_serializes_all_tracked_keys() {
        let mut stats = InvalidFieldStats::new();
        stats.increment(RequiredColumn::MaxUsers);
        stats.increment(RequiredColumn::MaxUsers);

        let value = serde_json::to_value(&stats).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 13);
        assert_eq!(obj["最大用户数"], 2);
        assert_eq!(obj["时间"], 0);
        assert!(!obj.contains_key("小区名称"));
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_output_row_fields_follow_column_order() {
        let mut row = OutputRow::new("2024-03-01", "4G");
        row.set(MeasureField::TotalTraffic, "12.5".to_string());
        row.set(MeasureField::UplinkInterference, "-105".to_string());

        let fields = row.fields();
        assert_eq!(fields[0], "2024-03-01");
        assert_eq!(fields[1], "4G");
        assert_eq!(fields[2], "12.5");
        assert_eq!(fields[11], "-105");
        assert_eq!(fields[5], "");
    }

    #[test]
    fn test_output_row_json_is_keyed_by_column_name() {
        let row = OutputRow::new("总计", "");
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.starts_with("{\"时间\":\"总计\",\"网络\":\"\""));
    }
}
