// ==========================================
// 小区性能统计工具 - 值解析与格式化
// ==========================================
// 职责: 多格式日期 → 日、千分位/百分号数值解析、6 位精度格式化
// 均为纯函数，无失败路径（解析失败返回 None）
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 严格格式（按顺序尝试，首个完整匹配生效）
const STRICT_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];
const STRICT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const COMPACT_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// 宽松兜底格式
const LOOSE_DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y年%m月%d日 %H:%M:%S",
    "%Y年%m月%d日 %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const LOOSE_DATE_FORMATS: [&str; 5] = ["%Y.%m.%d", "%Y年%m月%d日", "%m/%d/%Y", "%d-%b-%Y", "%b %d %Y"];

/// 日期输出格式（零填充）
const DAY_FORMAT: &str = "%Y-%m-%d";

/// 解析时间字段，只保留日期部分（YYYY-MM-DD）
///
/// # 返回
/// - Some(day): 解析成功
/// - None: 空值或所有格式均不匹配
pub fn parse_date_to_day(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    parse_strict(value)
        .or_else(|| parse_loose(value))
        .map(|date| date.format(DAY_FORMAT).to_string())
}

fn parse_strict(value: &str) -> Option<NaiveDate> {
    for fmt in STRICT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in STRICT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    // 紧凑格式只接受固定长度的纯数字
    if value.bytes().all(|b| b.is_ascii_digit()) {
        match value.len() {
            14 => {
                return NaiveDateTime::parse_from_str(value, COMPACT_DATETIME_FORMAT)
                    .ok()
                    .map(|dt| dt.date())
            }
            8 => return NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT).ok(),
            _ => {}
        }
    }
    None
}

fn parse_loose(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_local().date());
    }
    for fmt in LOOSE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in LOOSE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    None
}

/// 解析数值：去千分位逗号与尾部百分号
///
/// 百分号只剥离不换算，"88.8%" → 88.8
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = cleaned.trim_end_matches('%').trim();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 数值格式化：四舍五入到 6 位小数并去掉尾随 0
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }

    let fixed = format!("{:.6}", n);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// 均值格式化：无有效观测时输出空串
pub fn format_average(sum: f64, count: u64) -> String {
    if count == 0 {
        return String::new();
    }
    format_number(sum / count as f64)
}
