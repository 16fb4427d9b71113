// ==========================================
// 集装箱码头交通分析 - 吞吐量时间序列
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 样本不足 (少于两周) 时标准差的哨兵值
///
/// 消费方据此判定"无法计算",不得当作数值参与运算。
pub const STD_DEV_UNDEFINED: f64 = -1.0;

/// 周吞吐量序列: 周起始日 (周一) → 箱数,BTreeMap 保证时间升序
pub type WeeklyThroughputSeries = BTreeMap<NaiveDate, u64>;

// ==========================================
// ThroughputStatistics - 吞吐量统计
// ==========================================
// 空序列: 峰值与均值记 0,标准差记哨兵值。
// 日/小时口径只是周口径的线性缩放 (÷7, ÷168),存在舍入误差。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputStatistics {
    pub maximum_weekly: u64, // 周峰值 (箱)
    pub average_weekly: f64, // 周均值 (箱)
    pub std_dev_weekly: f64, // 周样本标准差 (n-1; 样本不足时为哨兵值)
}

impl ThroughputStatistics {
    /// 从周序列计算统计量
    pub fn from_series(series: &WeeklyThroughputSeries) -> Self {
        if series.is_empty() {
            return ThroughputStatistics {
                maximum_weekly: 0,
                average_weekly: 0.0,
                std_dev_weekly: STD_DEV_UNDEFINED,
            };
        }

        let values: Vec<u64> = series.values().copied().collect();
        let n = values.len();
        let maximum_weekly = values.iter().copied().max().unwrap_or(0);
        let sum: u64 = values.iter().sum();
        let average_weekly = sum as f64 / n as f64;

        let std_dev_weekly = if n < 2 {
            STD_DEV_UNDEFINED
        } else {
            let squared_diff_sum: f64 = values
                .iter()
                .map(|&v| {
                    let diff = v as f64 - average_weekly;
                    diff * diff
                })
                .sum();
            (squared_diff_sum / (n - 1) as f64).sqrt()
        };

        ThroughputStatistics {
            maximum_weekly,
            average_weekly,
            std_dev_weekly,
        }
    }

    /// 标准差是否可用 (样本足够)
    pub fn std_dev_is_defined(&self) -> bool {
        self.std_dev_weekly >= 0.0
    }

    /// 日峰值 (周峰值 ÷ 7)
    pub fn maximum_daily(&self) -> f64 {
        self.maximum_weekly as f64 / 7.0
    }

    /// 日均值 (周均值 ÷ 7)
    pub fn average_daily(&self) -> f64 {
        self.average_weekly / 7.0
    }

    /// 小时峰值 (周峰值 ÷ 168)
    pub fn maximum_hourly(&self) -> f64 {
        self.maximum_weekly as f64 / 168.0
    }

    /// 小时均值 (周均值 ÷ 168)
    pub fn average_hourly(&self) -> f64 {
        self.average_weekly / 168.0
    }
}
