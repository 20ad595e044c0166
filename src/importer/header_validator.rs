// ==========================================
// 小区性能统计工具 - 表头校验
// ==========================================
// 规则: 表头单元格与必需列名均先规范化，再做集合比较
// 部分命中不算通过
// ==========================================

use crate::domain::RequiredColumn;
use crate::importer::text_normalizer::normalize_header;
use std::collections::{HashMap, HashSet};

/// 返回缺失的必需列（按规范顺序）
pub fn get_missing_columns<S: AsRef<str>>(header_row: &[S]) -> Vec<RequiredColumn> {
    let present: HashSet<String> = header_row
        .iter()
        .map(|cell| normalize_header(cell.as_ref()))
        .collect();

    RequiredColumn::ALL
        .into_iter()
        .filter(|col| !present.contains(&normalize_header(col.name())))
        .collect()
}

/// 必需列 → 表头下标映射
///
/// 同名列重复出现时取第一次出现的位置；缺失列返回 Err。
pub fn build_column_index<S: AsRef<str>>(
    header_row: &[S],
) -> Result<ColumnIndex, Vec<RequiredColumn>> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (idx, cell) in header_row.iter().enumerate() {
        positions.entry(normalize_header(cell.as_ref())).or_insert(idx);
    }

    let mut indices = [0usize; RequiredColumn::COUNT];
    let mut missing = Vec::new();
    for col in RequiredColumn::ALL {
        match positions.get(&normalize_header(col.name())) {
            Some(&idx) => indices[col.index()] = idx,
            None => missing.push(col),
        }
    }

    if missing.is_empty() {
        Ok(ColumnIndex { indices })
    } else {
        Err(missing)
    }
}

/// 必需列在数据行中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    indices: [usize; RequiredColumn::COUNT],
}

impl ColumnIndex {
    pub fn position(&self, column: RequiredColumn) -> usize {
        self.indices[column.index()]
    }

    /// 取行内单元格；行长度不足时视为空值
    pub fn cell<'a, S: AsRef<str>>(&self, row: &'a [S], column: RequiredColumn) -> &'a str {
        row.get(self.position(column))
            .map(|s| s.as_ref())
            .unwrap_or("")
    }
}
