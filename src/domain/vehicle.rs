// ==========================================
// 集装箱码头交通分析 - 运输工具领域模型
// ==========================================

use crate::domain::types::VehicleType;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// VehicleKey - 运输工具实例标识
// ==========================================
// 同一航线的同名船班每周重复到港,需连同到港日期才能唯一定位一次挂靠。
// 派生 Ord 使所有逐实例映射按 (类型, 航线, 班次, 日期) 稳定排序。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleKey {
    pub vehicle_type: VehicleType, // 运输工具类型
    pub service_name: String,      // 航线/班列服务名
    pub vehicle_name: String,      // 航次/车次名
    pub arrival_date: NaiveDate,   // 到港日期
}

impl fmt::Display for VehicleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.vehicle_type,
            self.service_name,
            self.vehicle_name,
            self.arrival_date.format("%Y-%m-%d")
        )
    }
}

// ==========================================
// VehicleInstance - 一次到离港挂靠
// ==========================================
// 红线: 进港运力是排船期时的固定值,分析期间只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInstance {
    pub key: VehicleKey,           // 实例标识
    pub inbound_capacity_teu: f64, // 固定进港运力 (标准箱)
    pub arrival: NaiveDateTime,    // 到港时间
    pub departure: NaiveDateTime,  // 离港时间
}

impl VehicleInstance {
    /// 按运输缓冲计算最大出港运力
    ///
    /// # 参数
    /// - `transportation_buffer`: 运输缓冲系数 (如 0.1 表示可多装 10%)
    ///
    /// # 返回
    /// 受约束类型返回 `Some(固定进港运力 × (1 + 缓冲))`;
    /// 卡车无固定运力,返回 `None` 表示不设上限。
    pub fn maximum_outbound_capacity(&self, transportation_buffer: f64) -> Option<f64> {
        if self.key.vehicle_type.is_capacity_constrained() {
            Some(self.inbound_capacity_teu * (1.0 + transportation_buffer))
        } else {
            None
        }
    }

    /// 为改配到卡车的集装箱临时生成一个取箱档
    ///
    /// 卡车不在船期表里,由堆场按需叫车: 取箱时间 = 进港时刻 + 取箱提前期,
    /// 进港运力记 0 (卡车不承担进港运力,利用率分母为零属正常数据)。
    pub fn ad_hoc_truck(
        container_id: &str,
        inbound_arrival: NaiveDateTime,
        pickup_lead_hours: i64,
    ) -> Self {
        let departure = inbound_arrival + Duration::hours(pickup_lead_hours);
        VehicleInstance {
            key: VehicleKey {
                vehicle_type: VehicleType::Truck,
                service_name: "AD_HOC".to_string(),
                vehicle_name: format!("TRUCK-{}", container_id),
                arrival_date: departure.date(),
            },
            inbound_capacity_teu: 0.0,
            arrival: departure,
            departure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn feeder_instance() -> VehicleInstance {
        VehicleInstance {
            key: VehicleKey {
                vehicle_type: VehicleType::Feeder,
                service_name: "FDR-NORTH".to_string(),
                vehicle_name: "FDR-NORTH-07".to_string(),
                arrival_date: NaiveDate::from_ymd_opt(2021, 7, 9).unwrap(),
            },
            inbound_capacity_teu: 100.0,
            arrival: dt("2021-07-09 06:00:00"),
            departure: dt("2021-07-09 18:00:00"),
        }
    }

    #[test]
    fn test_maximum_outbound_capacity_applies_buffer() {
        let feeder = feeder_instance();
        let max = feeder.maximum_outbound_capacity(0.1).unwrap();
        assert!((max - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_truck_has_no_outbound_limit() {
        let truck = VehicleInstance::ad_hoc_truck("C001", dt("2021-07-09 06:00:00"), 24);
        assert_eq!(truck.maximum_outbound_capacity(0.1), None);
        assert_eq!(truck.key.vehicle_type, VehicleType::Truck);
        assert_eq!(truck.departure, dt("2021-07-10 06:00:00"));
        assert_eq!(truck.inbound_capacity_teu, 0.0);
    }

    #[test]
    fn test_key_ordering_is_stable() {
        let a = feeder_instance().key;
        let mut b = a.clone();
        b.vehicle_name = "FDR-NORTH-08".to_string();
        assert!(a < b);
    }
}
