// ==========================================
// 小区性能统计工具 - 输出行构建
// ==========================================
// 排序: (日期升序, 网络字典序)
// 小计模式: 每日先出小计行（网络留空），再出该日明细行
// 总计: 合并全部桶，追加在最后，时间列为 "总计"
// 数值一律经 format_number / format_average 输出
// ==========================================

use crate::config::AggregationOptions;
use crate::domain::{AggBucket, MeasureField, MeasureKind, OutputRow, GRAND_TOTAL_LABEL};
use crate::importer::value_parser::{format_average, format_number};
use tracing::debug;

/// 桶 → 输出行
pub fn bucket_to_row(bucket: &AggBucket, time: &str, network: &str) -> OutputRow {
    let mut row = OutputRow::new(time, network);
    for field in MeasureField::ALL {
        let acc = bucket.field(field);
        let value = match field.kind() {
            MeasureKind::Sum => format_number(acc.sum),
            MeasureKind::Average => format_average(acc.sum, acc.count),
        };
        row.set(field, value);
    }
    row
}

// ==========================================
// OutputRowBuilder
// ==========================================
pub struct OutputRowBuilder {
    options: AggregationOptions,
}

impl OutputRowBuilder {
    pub fn new(options: AggregationOptions) -> Self {
        Self { options }
    }

    /// 构建有序输出行
    pub fn build<'a, I>(&self, buckets: I) -> Vec<OutputRow>
    where
        I: IntoIterator<Item = &'a AggBucket>,
    {
        let mut sorted: Vec<&AggBucket> = buckets.into_iter().collect();
        sorted.sort_by(|a, b| (&a.day, &a.network).cmp(&(&b.day, &b.network)));

        let mut rows = if self.options.include_daily_subtotal_rows {
            self.build_with_subtotals(&sorted)
        } else {
            sorted
                .iter()
                .map(|b| bucket_to_row(b, &b.day, &b.network))
                .collect()
        };

        if self.options.include_grand_total_row {
            let total = AggBucket::merged(GRAND_TOTAL_LABEL, "", sorted.iter().copied());
            rows.push(bucket_to_row(&total, GRAND_TOTAL_LABEL, ""));
        }

        debug!(buckets = sorted.len(), rows = rows.len(), "输出行构建完成");
        rows
    }

    fn build_with_subtotals(&self, sorted: &[&AggBucket]) -> Vec<OutputRow> {
        let mut rows = Vec::new();
        // sorted 已按日期排序，同日桶连续
        for group in sorted.chunk_by(|a, b| a.day == b.day) {
            let day = &group[0].day;
            let subtotal = AggBucket::merged(day.as_str(), "", group.iter().copied());
            rows.push(bucket_to_row(&subtotal, day, ""));

            let detail_time = if self.options.blank_date_for_detail_rows_when_subtotal_enabled {
                ""
            } else {
                day.as_str()
            };
            for bucket in group {
                rows.push(bucket_to_row(bucket, detail_time, &bucket.network));
            }
        }
        rows
    }
}
