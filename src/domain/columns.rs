// ==========================================
// 小区性能统计工具 - 固定列定义
// ==========================================
// 输入: 14 个必需列（顺序固定，比较前统一规范化）
// 输出: 12 个统计列（去掉小区ID、小区名称）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 总计行的时间列文本
pub const GRAND_TOTAL_LABEL: &str = "总计";

// ==========================================
// 必需列 (Required Column)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
// 序列化为中文列名，与表头一致
pub enum RequiredColumn {
    #[serde(rename = "时间")]
    Time,
    #[serde(rename = "小区ID")]
    CellId,
    #[serde(rename = "网络")]
    Network,
    #[serde(rename = "小区名称")]
    CellName,
    #[serde(rename = "总流量(GB)")]
    TotalTraffic,
    #[serde(rename = "最大用户数")]
    MaxUsers,
    #[serde(rename = "上行PRB利用率(%)")]
    UplinkPrbUtilization,
    #[serde(rename = "下行PRB利用率(%)")]
    DownlinkPrbUtilization,
    #[serde(rename = "上行吞吐量(Mbps)")]
    UplinkThroughput,
    #[serde(rename = "下行吞吐量(Mbps)")]
    DownlinkThroughput,
    #[serde(rename = "无线接通率(%)")]
    AccessRate,
    #[serde(rename = "掉线率(%)")]
    DropRate,
    #[serde(rename = "切换成功率(%)")]
    HandoverSuccessRate,
    #[serde(rename = "上行干扰(dBm)")]
    UplinkInterference,
}

impl RequiredColumn {
    pub const COUNT: usize = 14;

    /// 规范顺序
    pub const ALL: [RequiredColumn; RequiredColumn::COUNT] = [
        RequiredColumn::Time,
        RequiredColumn::CellId,
        RequiredColumn::Network,
        RequiredColumn::CellName,
        RequiredColumn::TotalTraffic,
        RequiredColumn::MaxUsers,
        RequiredColumn::UplinkPrbUtilization,
        RequiredColumn::DownlinkPrbUtilization,
        RequiredColumn::UplinkThroughput,
        RequiredColumn::DownlinkThroughput,
        RequiredColumn::AccessRate,
        RequiredColumn::DropRate,
        RequiredColumn::HandoverSuccessRate,
        RequiredColumn::UplinkInterference,
    ];

    /// 无效值计数覆盖的列（小区名称不参与统计）
    ///
    /// 小区ID 只占位，不做任何校验，计数恒为 0
    pub const TRACKED: [RequiredColumn; 13] = [
        RequiredColumn::Time,
        RequiredColumn::CellId,
        RequiredColumn::Network,
        RequiredColumn::TotalTraffic,
        RequiredColumn::MaxUsers,
        RequiredColumn::UplinkPrbUtilization,
        RequiredColumn::DownlinkPrbUtilization,
        RequiredColumn::UplinkThroughput,
        RequiredColumn::DownlinkThroughput,
        RequiredColumn::AccessRate,
        RequiredColumn::DropRate,
        RequiredColumn::HandoverSuccessRate,
        RequiredColumn::UplinkInterference,
    ];

    /// 列的中文规范名称
    pub fn name(self) -> &'static str {
        match self {
            RequiredColumn::Time => "时间",
            RequiredColumn::CellId => "小区ID",
            RequiredColumn::Network => "网络",
            RequiredColumn::CellName => "小区名称",
            RequiredColumn::TotalTraffic => "总流量(GB)",
            RequiredColumn::MaxUsers => "最大用户数",
            RequiredColumn::UplinkPrbUtilization => "上行PRB利用率(%)",
            RequiredColumn::DownlinkPrbUtilization => "下行PRB利用率(%)",
            RequiredColumn::UplinkThroughput => "上行吞吐量(Mbps)",
            RequiredColumn::DownlinkThroughput => "下行吞吐量(Mbps)",
            RequiredColumn::AccessRate => "无线接通率(%)",
            RequiredColumn::DropRate => "掉线率(%)",
            RequiredColumn::HandoverSuccessRate => "切换成功率(%)",
            RequiredColumn::UplinkInterference => "上行干扰(dBm)",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RequiredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==========================================
// 指标字段 (Measure Field)
// ==========================================
// 求和: 总流量、最大用户数
// 均值: 其余 8 个比率/吞吐/干扰字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Sum,
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureField {
    TotalTraffic,
    MaxUsers,
    UplinkPrbUtilization,
    DownlinkPrbUtilization,
    UplinkThroughput,
    DownlinkThroughput,
    AccessRate,
    DropRate,
    HandoverSuccessRate,
    UplinkInterference,
}

impl MeasureField {
    pub const COUNT: usize = 10;

    pub const ALL: [MeasureField; MeasureField::COUNT] = [
        MeasureField::TotalTraffic,
        MeasureField::MaxUsers,
        MeasureField::UplinkPrbUtilization,
        MeasureField::DownlinkPrbUtilization,
        MeasureField::UplinkThroughput,
        MeasureField::DownlinkThroughput,
        MeasureField::AccessRate,
        MeasureField::DropRate,
        MeasureField::HandoverSuccessRate,
        MeasureField::UplinkInterference,
    ];

    pub fn kind(self) -> MeasureKind {
        match self {
            MeasureField::TotalTraffic | MeasureField::MaxUsers => MeasureKind::Sum,
            _ => MeasureKind::Average,
        }
    }

    pub fn column(self) -> RequiredColumn {
        match self {
            MeasureField::TotalTraffic => RequiredColumn::TotalTraffic,
            MeasureField::MaxUsers => RequiredColumn::MaxUsers,
            MeasureField::UplinkPrbUtilization => RequiredColumn::UplinkPrbUtilization,
            MeasureField::DownlinkPrbUtilization => RequiredColumn::DownlinkPrbUtilization,
            MeasureField::UplinkThroughput => RequiredColumn::UplinkThroughput,
            MeasureField::DownlinkThroughput => RequiredColumn::DownlinkThroughput,
            MeasureField::AccessRate => RequiredColumn::AccessRate,
            MeasureField::DropRate => RequiredColumn::DropRate,
            MeasureField::HandoverSuccessRate => RequiredColumn::HandoverSuccessRate,
            MeasureField::UplinkInterference => RequiredColumn::UplinkInterference,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

// ==========================================
// 输出列 (Output Column)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputColumn {
    Time,
    Network,
    Measure(MeasureField),
}

impl OutputColumn {
    pub const COUNT: usize = 12;

    /// 输出字段顺序，永不重排
    pub const ALL: [OutputColumn; OutputColumn::COUNT] = [
        OutputColumn::Time,
        OutputColumn::Network,
        OutputColumn::Measure(MeasureField::TotalTraffic),
        OutputColumn::Measure(MeasureField::MaxUsers),
        OutputColumn::Measure(MeasureField::UplinkPrbUtilization),
        OutputColumn::Measure(MeasureField::DownlinkPrbUtilization),
        OutputColumn::Measure(MeasureField::UplinkThroughput),
        OutputColumn::Measure(MeasureField::DownlinkThroughput),
        OutputColumn::Measure(MeasureField::AccessRate),
        OutputColumn::Measure(MeasureField::DropRate),
        OutputColumn::Measure(MeasureField::HandoverSuccessRate),
        OutputColumn::Measure(MeasureField::UplinkInterference),
    ];

    pub fn column(self) -> RequiredColumn {
        match self {
            OutputColumn::Time => RequiredColumn::Time,
            OutputColumn::Network => RequiredColumn::Network,
            OutputColumn::Measure(field) => field.column(),
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }

    /// 输出表头
    pub fn header() -> [&'static str; OutputColumn::COUNT] {
        OutputColumn::ALL.map(OutputColumn::name)
    }
}
