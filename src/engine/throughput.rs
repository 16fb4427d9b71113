// ==========================================
// 集装箱码头交通分析 - 岸侧吞吐聚合引擎
// ==========================================
// 职责: 按 ISO 周 (周一起始) 聚合岸侧装卸事件,输出周吞吐序列与统计量
// 口径: 吞吐按箱数计,不折算 TEU
// ==========================================

use crate::domain::throughput::{ThroughputStatistics, WeeklyThroughputSeries};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// 所在 ISO 周的周一
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

// ==========================================
// ThroughputAggregator - 岸侧吞吐聚合引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ThroughputAggregator {
    // 仅保存有事件的周桶,查询时再补零
    buckets: BTreeMap<NaiveDate, u64>,
    total_boxes: u64,
}

impl ThroughputAggregator {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            total_boxes: 0,
        }
    }

    /// 记入一笔岸侧装卸事件 (卸船或装船)
    pub fn record_event(&mut self, date: NaiveDate, box_count: u64) {
        *self.buckets.entry(week_start(date)).or_insert(0) += box_count;
        self.total_boxes += box_count;
    }

    /// 全部记录箱数
    pub fn total_boxes(&self) -> u64 {
        self.total_boxes
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// 周吞吐序列
    ///
    /// 首尾活跃周之间的静默周补零,保证序列连续且跨调用稳定;
    /// 无事件时返回空序列。
    pub fn throughput_over_time(&self) -> WeeklyThroughputSeries {
        let mut series = WeeklyThroughputSeries::new();
        if let (Some(&first), Some(&last)) =
            (self.buckets.keys().next(), self.buckets.keys().next_back())
        {
            let mut week = first;
            while week <= last {
                series.insert(week, self.buckets.get(&week).copied().unwrap_or(0));
                week += Duration::days(7);
            }
        }
        series
    }

    /// 周序列统计量 (最大/均值/样本标准差)
    ///
    /// 统计在补零后的连续序列上计算;样本不足时标准差输出哨兵值。
    pub fn statistics(&self) -> ThroughputStatistics {
        ThroughputStatistics::from_series(&self.throughput_over_time())
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::throughput::STD_DEV_UNDEFINED;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2021-07-05 是周一
        assert_eq!(week_start(d("2021-07-05")), d("2021-07-05"));
        assert_eq!(week_start(d("2021-07-07")), d("2021-07-05"));
        // 周日归属同一周,不落入下一周
        assert_eq!(week_start(d("2021-07-11")), d("2021-07-05"));
        assert_eq!(week_start(d("2021-07-12")), d("2021-07-12"));
    }

    #[test]
    fn test_events_in_same_week_share_bucket() {
        let mut aggregator = ThroughputAggregator::new();
        aggregator.record_event(d("2021-07-05"), 3);
        aggregator.record_event(d("2021-07-11"), 2);

        let series = aggregator.throughput_over_time();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(&d("2021-07-05")), Some(&5));
        assert_eq!(aggregator.total_boxes(), 5);
    }

    #[test]
    fn test_silent_weeks_are_zero_filled() {
        let mut aggregator = ThroughputAggregator::new();
        aggregator.record_event(d("2021-07-05"), 10);
        aggregator.record_event(d("2021-07-26"), 20);

        let series = aggregator.throughput_over_time();
        assert_eq!(series.len(), 4);
        assert_eq!(series.get(&d("2021-07-12")), Some(&0));
        assert_eq!(series.get(&d("2021-07-19")), Some(&0));
        assert_eq!(series.values().sum::<u64>(), aggregator.total_boxes());
    }

    #[test]
    fn test_empty_aggregator_yields_no_data_conventions() {
        let aggregator = ThroughputAggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregator.throughput_over_time().is_empty());

        let stats = aggregator.statistics();
        assert_eq!(stats.maximum_weekly, 0);
        assert_eq!(stats.average_weekly, 0.0);
        assert_eq!(stats.std_dev_weekly, STD_DEV_UNDEFINED);
    }

    #[test]
    fn test_single_week_std_dev_is_sentinel() {
        let mut aggregator = ThroughputAggregator::new();
        aggregator.record_event(d("2021-07-06"), 42);

        let stats = aggregator.statistics();
        assert_eq!(stats.maximum_weekly, 42);
        assert_eq!(stats.average_weekly, 42.0);
        assert_eq!(stats.std_dev_weekly, STD_DEV_UNDEFINED);
        assert!(!stats.std_dev_is_defined());
    }

    #[test]
    fn test_two_week_statistics() {
        let mut aggregator = ThroughputAggregator::new();
        aggregator.record_event(d("2021-07-05"), 10);
        aggregator.record_event(d("2021-07-12"), 20);

        let stats = aggregator.statistics();
        assert_eq!(stats.maximum_weekly, 20);
        assert!((stats.average_weekly - 15.0).abs() < 1e-9);
        assert!((stats.std_dev_weekly - 7.07).abs() < 0.01);
        // 日/时口径由周口径折算
        assert!((stats.average_daily() - 15.0 / 7.0).abs() < 1e-9);
        assert!((stats.average_hourly() - 15.0 / 168.0).abs() < 1e-9);
    }
}
