// ==========================================
// 小区性能统计工具 - 聚合桶
// ==========================================
// 键: (日期 YYYY-MM-DD, 网络)
// 求和字段只累加 sum；均值字段累加 (sum, count)
// ==========================================

use crate::domain::columns::MeasureField;

/// 单字段累加器
///
/// count 只在源值解析成功时递增，均值字段 count == 0 时输出空串。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldAccumulator {
    pub sum: f64,
    pub count: u64,
}

impl FieldAccumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &FieldAccumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }
}

/// 聚合桶键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub day: String,
    pub network: String,
}

impl BucketKey {
    pub fn new(day: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            network: network.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggBucket {
    pub day: String,
    pub network: String,
    fields: [FieldAccumulator; MeasureField::COUNT],
}

impl AggBucket {
    pub fn new(day: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            network: network.into(),
            fields: [FieldAccumulator::default(); MeasureField::COUNT],
        }
    }

    pub fn key(&self) -> BucketKey {
        BucketKey::new(self.day.clone(), self.network.clone())
    }

    /// 记录一个解析成功的观测值
    pub fn observe(&mut self, field: MeasureField, value: f64) {
        self.fields[field.index()].add(value);
    }

    pub fn field(&self, field: MeasureField) -> &FieldAccumulator {
        &self.fields[field.index()]
    }

    /// 逐字段合并（求和的求和、计数的求和）
    pub fn merge(&mut self, other: &AggBucket) {
        for (mine, theirs) in self.fields.iter_mut().zip(other.fields.iter()) {
            mine.merge(theirs);
        }
    }

    /// 将一组桶合并为一个新桶（用于小计/总计行）
    pub fn merged<'a, I>(day: impl Into<String>, network: impl Into<String>, buckets: I) -> Self
    where
        I: IntoIterator<Item = &'a AggBucket>,
    {
        let mut total = AggBucket::new(day, network);
        for bucket in buckets {
            total.merge(bucket);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(network: &str, traffic: f64, drop_rate: Option<f64>) -> AggBucket {
        let mut b = AggBucket::new("2024-03-01", network);
        b.observe(MeasureField::TotalTraffic, traffic);
        if let Some(v) = drop_rate {
            b.observe(MeasureField::DropRate, v);
        }
        b
    }

    #[test]
    fn test_observe_increments_count() {
        let mut b = AggBucket::new("2024-03-01", "4G");
        b.observe(MeasureField::AccessRate, 99.0);
        b.observe(MeasureField::AccessRate, 97.0);
        let acc = b.field(MeasureField::AccessRate);
        assert_eq!(acc.sum, 196.0);
        assert_eq!(acc.count, 2);
        assert_eq!(b.field(MeasureField::DropRate).count, 0);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = bucket("4G", 1.5, Some(0.2));
        let b = bucket("5G", 2.25, None);
        let c = bucket("NR", 4.0, Some(0.6));

        let forward = AggBucket::merged("2024-03-01", "", [&a, &b, &c]);
        let backward = AggBucket::merged("2024-03-01", "", [&c, &b, &a]);

        assert_eq!(forward, backward);
        assert_eq!(forward.field(MeasureField::TotalTraffic).sum, 7.75);
        assert_eq!(forward.field(MeasureField::DropRate).count, 2);
    }

    #[test]
    fn test_bucket_key_orders_by_day_then_network() {
        let mut keys = vec![
            BucketKey::new("2024-03-02", "4G"),
            BucketKey::new("2024-03-01", "5G"),
            BucketKey::new("2024-03-01", "4G"),
        ];
        keys.sort();
        assert_eq!(keys[0], BucketKey::new("2024-03-01", "4G"));
        assert_eq!(keys[1], BucketKey::new("2024-03-01", "5G"));
        assert_eq!(keys[2], BucketKey::new("2024-03-02", "4G"));
    }
}
