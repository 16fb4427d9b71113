// ==========================================
// 集装箱码头交通分析 - 运力利用率引擎
// ==========================================
// 职责: 逐实例投影 出港箱量/进港运力 利用率,标记超缓冲实例
// 口径: 对台账只读;缓冲派生值按查询时的缓冲系数现算
// ==========================================

use crate::domain::types::{VehicleType, VehicleTypeFilter};
use crate::domain::vehicle::VehicleKey;
use crate::engine::capacity_ledger::{
    CapacityLedger, OutboundCapacityConstraint, CAPACITY_EPSILON_TEU,
};
use crate::engine::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::collections::BTreeMap;

// ==========================================
// VehicleUtilization - 单实例利用率行
// ==========================================
// ratio 在进港运力为零时无定义 (None);超缓冲行仅告警,不中断查询。
#[derive(Debug, Clone, Serialize)]
pub struct VehicleUtilization {
    pub vehicle: VehicleKey,
    pub inbound_capacity_teu: f64,
    pub used_outbound_teu: f64,
    pub ratio: Option<f64>,
    pub over_buffer: bool,
}

// ==========================================
// UtilizationComputer - 运力利用率引擎
// ==========================================
#[derive(Debug, Default)]
pub struct UtilizationComputer {}

impl UtilizationComputer {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 逐实例利用率投影
    ///
    /// 超缓冲判定: 出港箱量 > 进港运力 × (1 + 缓冲);进港运力为零
    /// 且有出港箱量的实例同样标记 (利用率无定义)。临时卡车档天然
    /// 零进港,属预期形态,仅受限类型发数据质量告警。
    pub fn utilization_by_instance(
        &self,
        ledger: &CapacityLedger,
        filter: &VehicleTypeFilter,
        transportation_buffer: f64,
    ) -> AnalysisResult<Vec<VehicleUtilization>> {
        if !filter.is_valid() {
            return Err(AnalysisError::InvalidFilter(format!(
                "过滤集合为空: {}",
                filter
            )));
        }

        let mut rows = Vec::new();
        for account in ledger.accounts() {
            let vehicle_type = account.instance.key.vehicle_type;
            if !filter.matches(vehicle_type) {
                continue;
            }

            let inbound = account.instance.inbound_capacity_teu;
            let outbound = account.outbound_used_teu;
            let over_buffer = if inbound > 0.0 {
                outbound > inbound * (1.0 + transportation_buffer) + CAPACITY_EPSILON_TEU
            } else {
                outbound > 0.0
            };
            if over_buffer && vehicle_type.is_capacity_constrained() {
                tracing::warn!(
                    vehicle = %account.instance.key,
                    inbound_capacity_teu = inbound,
                    used_outbound_teu = outbound,
                    transportation_buffer,
                    "出港箱量超出缓冲上限"
                );
            }

            rows.push(VehicleUtilization {
                vehicle: account.instance.key.clone(),
                inbound_capacity_teu: inbound,
                used_outbound_teu: outbound,
                ratio: account.utilization_ratio(),
                over_buffer,
            });
        }
        Ok(rows)
    }

    /// 逐类型理论最大出港运力
    pub fn maximum_outbound_by_type(
        &self,
        ledger: &CapacityLedger,
        transportation_buffer: f64,
    ) -> BTreeMap<VehicleType, f64> {
        ledger.outbound_capacity_by_type(transportation_buffer).maximum
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::VehicleInstance;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn create_test_instance(
        vehicle_type: VehicleType,
        name: &str,
        capacity_teu: f64,
    ) -> VehicleInstance {
        let arrival = dt("2021-07-08 06:00:00");
        VehicleInstance {
            key: VehicleKey {
                vehicle_type,
                service_name: format!("SVC-{}", name),
                vehicle_name: name.to_string(),
                arrival_date: arrival.date(),
            },
            inbound_capacity_teu: capacity_teu,
            arrival,
            departure: dt("2021-07-09 06:00:00"),
        }
    }

    #[test]
    fn test_ratio_and_flag_within_buffer() {
        let feeder = create_test_instance(VehicleType::Feeder, "F01", 100.0);
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(feeder.clone());
        ledger.record_outbound(&feeder.key, 110.0).unwrap();

        let computer = UtilizationComputer::new();
        let rows = computer
            .utilization_by_instance(&ledger, &VehicleTypeFilter::All, 0.1)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert!((rows[0].ratio.unwrap() - 1.1).abs() < 1e-9);
        // 装满到缓冲上限不算超缓冲
        assert!(!rows[0].over_buffer);
    }

    #[test]
    fn test_lower_query_buffer_flags_over_buffer() {
        // 核算期缓冲 0.1 放行 110,查询期缓冲降为 0.0 后该实例超限
        let feeder = create_test_instance(VehicleType::Feeder, "F01", 100.0);
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(feeder.clone());
        ledger.record_outbound(&feeder.key, 110.0).unwrap();

        let computer = UtilizationComputer::new();
        let rows = computer
            .utilization_by_instance(&ledger, &VehicleTypeFilter::All, 0.0)
            .unwrap();
        assert!(rows[0].over_buffer);
    }

    #[test]
    fn test_zero_inbound_with_outbound_is_undefined_and_flagged() {
        let truck = VehicleInstance::ad_hoc_truck("C001", dt("2021-07-08 06:00:00"), 24);
        let key = truck.key.clone();
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(truck);
        ledger.record_outbound(&key, 2.0).unwrap();

        let computer = UtilizationComputer::new();
        let rows = computer
            .utilization_by_instance(&ledger, &VehicleTypeFilter::All, 0.1)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ratio, None);
        assert!(rows[0].over_buffer);
    }

    #[test]
    fn test_zero_inbound_without_outbound_is_not_flagged() {
        let barge = create_test_instance(VehicleType::Barge, "B01", 0.0);
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(barge);

        let computer = UtilizationComputer::new();
        let rows = computer
            .utilization_by_instance(&ledger, &VehicleTypeFilter::All, 0.1)
            .unwrap();
        assert_eq!(rows[0].ratio, None);
        assert!(!rows[0].over_buffer);
    }

    #[test]
    fn test_maximum_outbound_by_type_scales_with_buffer() {
        let feeder = create_test_instance(VehicleType::Feeder, "F01", 100.0);
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(feeder);

        let computer = UtilizationComputer::new();
        let maxima = computer.maximum_outbound_by_type(&ledger, 0.1);
        assert!((maxima[&VehicleType::Feeder] - 110.0).abs() < 1e-9);
        assert!(maxima[&VehicleType::Truck].is_infinite());

        let widened = computer.maximum_outbound_by_type(&ledger, 0.5);
        assert!((widened[&VehicleType::Feeder] - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_filter_restricts_rows_and_rejects_empty_set() {
        let feeder = create_test_instance(VehicleType::Feeder, "F01", 100.0);
        let barge = create_test_instance(VehicleType::Barge, "B01", 50.0);
        let mut ledger = CapacityLedger::new(0.1);
        ledger.register_vehicle(feeder);
        ledger.register_vehicle(barge);

        let computer = UtilizationComputer::new();
        let rows = computer
            .utilization_by_instance(&ledger, &VehicleTypeFilter::One(VehicleType::Barge), 0.1)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vehicle.vehicle_type, VehicleType::Barge);

        let empty = VehicleTypeFilter::Many(std::collections::BTreeSet::new());
        let result = computer.utilization_by_instance(&ledger, &empty, 0.1);
        assert!(matches!(result, Err(AnalysisError::InvalidFilter(_))));
    }
}
