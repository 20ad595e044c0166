// ==========================================
// 小区性能统计工具 - 统计选项
// ==========================================
// 三个开关互相独立，默认: 不出小计 / 不出总计 / 小计模式下明细行留空日期
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationOptions {
    /// 每日插入小计行
    pub include_daily_subtotal_rows: bool,

    /// 末尾追加总计行
    pub include_grand_total_row: bool,

    /// 小计模式下明细行时间列留空（false 时重复日期）
    pub blank_date_for_detail_rows_when_subtotal_enabled: bool,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            include_daily_subtotal_rows: false,
            include_grand_total_row: false,
            blank_date_for_detail_rows_when_subtotal_enabled: true,
        }
    }
}

impl AggregationOptions {
    pub fn with_subtotals(mut self, enabled: bool) -> Self {
        self.include_daily_subtotal_rows = enabled;
        self
    }

    pub fn with_grand_total(mut self, enabled: bool) -> Self {
        self.include_grand_total_row = enabled;
        self
    }

    pub fn with_blank_detail_dates(mut self, enabled: bool) -> Self {
        self.blank_date_for_detail_rows_when_subtotal_enabled = enabled;
        self
    }
}
