// ==========================================
// 小区性能统计工具 - 流式聚合器
// ==========================================
// 逐行处理（第 0 行为表头，跳过且不计数）:
//   1. processed_rows += 1
//   2. 时间无效 → 时间计数 + skipped，整行丢弃
//   3. 网络为空 → 网络计数 + skipped，整行丢弃
//   4. 其余字段逐个解析；失败只记字段计数，不丢行
// 内存上界 = 不同 (日期, 网络) 键的数量
// ==========================================

use crate::domain::{
    AggBucket, BucketKey, InvalidFieldStats, MeasureField, RequiredColumn,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_validator::{build_column_index, ColumnIndex};
use crate::importer::value_parser::{parse_date_to_day, parse_numeric};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// 单行处理结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Aggregated(BucketKey),
    SkippedInvalidTime,
    SkippedEmptyNetwork,
}

/// 聚合结果
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub buckets: BTreeMap<BucketKey, AggBucket>,
    pub processed_rows: u64,
    pub skipped_rows: u64,
    pub invalid_field_stats: InvalidFieldStats,
}

// ==========================================
// StreamingAggregator
// ==========================================
pub struct StreamingAggregator {
    columns: ColumnIndex,
    outcome: AggregationOutcome,
}

impl StreamingAggregator {
    /// 以表头行创建聚合器
    ///
    /// 表头缺少必需列时返回 MissingColumns（预览校验通过后不应出现）
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> ImportResult<Self> {
        let columns = build_column_index(header).map_err(ImportError::MissingColumns)?;
        Ok(Self {
            columns,
            outcome: AggregationOutcome::default(),
        })
    }

    /// 处理一行数据
    pub fn push_row<S: AsRef<str>>(&mut self, row: &[S]) -> RowOutcome {
        let outcome = &mut self.outcome;
        outcome.processed_rows += 1;
        let row_number = outcome.processed_rows;

        let day = match parse_date_to_day(self.columns.cell(row, RequiredColumn::Time)) {
            Some(day) => day,
            None => {
                outcome.invalid_field_stats.increment(RequiredColumn::Time);
                outcome.skipped_rows += 1;
                warn!(row_number, "时间无效，跳过该行");
                return RowOutcome::SkippedInvalidTime;
            }
        };

        let network = self.columns.cell(row, RequiredColumn::Network).trim();
        if network.is_empty() {
            outcome.invalid_field_stats.increment(RequiredColumn::Network);
            outcome.skipped_rows += 1;
            warn!(row_number, "网络为空，跳过该行");
            return RowOutcome::SkippedEmptyNetwork;
        }

        let key = BucketKey::new(day, network);
        let bucket = outcome
            .buckets
            .entry(key.clone())
            .or_insert_with(|| AggBucket::new(key.day.clone(), key.network.clone()));

        for field in MeasureField::ALL {
            match parse_numeric(self.columns.cell(row, field.column())) {
                Some(value) => bucket.observe(field, value),
                None => outcome.invalid_field_stats.increment(field.column()),
            }
        }

        RowOutcome::Aggregated(key)
    }

    pub fn finish(self) -> AggregationOutcome {
        info!(
            processed = self.outcome.processed_rows,
            skipped = self.outcome.skipped_rows,
            buckets = self.outcome.buckets.len(),
            invalid_fields = self.outcome.invalid_field_stats.total(),
            "流式聚合完成"
        );
        self.outcome
    }
}

/// 聚合整个行游标（首行为表头）
///
/// 结构性解析错误立即终止并上抛；字段级无效值只计数
pub fn aggregate_rows<I>(rows: I) -> ImportResult<AggregationOutcome>
where
    I: IntoIterator<Item = ImportResult<Vec<String>>>,
{
    let mut rows = rows.into_iter();
    let header = match rows.next() {
        Some(header) => header?,
        None => return Err(ImportError::EmptyFile("没有表头行".to_string())),
    };
    debug!(columns = header.len(), "表头读取完成");

    let mut aggregator = StreamingAggregator::from_header(&header)?;
    for row in rows {
        let row = row?;
        aggregator.push_row(&row);
    }
    Ok(aggregator.finish())
}
