// ==========================================
// 集装箱码头交通分析 - 分析参数
// ==========================================

use crate::domain::types::VehicleType;
use serde::{Deserialize, Serialize};

// ===== 默认值 =====
pub const DEFAULT_TRANSPORTATION_BUFFER: f64 = 0.2;
pub const DEFAULT_DEEP_SEA_VESSEL_MAX_DWELL_HOURS: i64 = 240;
pub const DEFAULT_FEEDER_MAX_DWELL_HOURS: i64 = 168;
pub const DEFAULT_BARGE_MAX_DWELL_HOURS: i64 = 120;
pub const DEFAULT_TRAIN_MAX_DWELL_HOURS: i64 = 72;
pub const DEFAULT_TRUCK_PICKUP_LEAD_HOURS: i64 = 24;

// ==========================================
// AnalysisConfig - 分析参数集
// ==========================================
// 运输缓冲决定每个实例的最大出港运力;
// 各类型最大堆存时长决定堆存约束裁决;卡车不设堆存上限。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub transportation_buffer: f64,           // 运输缓冲系数 (如 0.2 = 可多装 20%)
    pub deep_sea_vessel_max_dwell_hours: i64, // 深海船最大堆存时长 (小时)
    pub feeder_max_dwell_hours: i64,          // 支线船最大堆存时长 (小时)
    pub barge_max_dwell_hours: i64,           // 驳船最大堆存时长 (小时)
    pub train_max_dwell_hours: i64,           // 列车最大堆存时长 (小时)
    pub truck_pickup_lead_hours: i64,         // 卡车取箱提前期 (小时)
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            transportation_buffer: DEFAULT_TRANSPORTATION_BUFFER,
            deep_sea_vessel_max_dwell_hours: DEFAULT_DEEP_SEA_VESSEL_MAX_DWELL_HOURS,
            feeder_max_dwell_hours: DEFAULT_FEEDER_MAX_DWELL_HOURS,
            barge_max_dwell_hours: DEFAULT_BARGE_MAX_DWELL_HOURS,
            train_max_dwell_hours: DEFAULT_TRAIN_MAX_DWELL_HOURS,
            truck_pickup_lead_hours: DEFAULT_TRUCK_PICKUP_LEAD_HOURS,
        }
    }
}

impl AnalysisConfig {
    /// 某类型的最大堆存时长
    ///
    /// # 返回
    /// 卡车无堆存约束,返回 `None`;其余类型返回配置的小时数。
    pub fn maximum_dwell_hours(&self, vehicle_type: VehicleType) -> Option<i64> {
        match vehicle_type {
            VehicleType::DeepSeaVessel => Some(self.deep_sea_vessel_max_dwell_hours),
            VehicleType::Feeder => Some(self.feeder_max_dwell_hours),
            VehicleType::Barge => Some(self.barge_max_dwell_hours),
            VehicleType::Train => Some(self.train_max_dwell_hours),
            VehicleType::Truck => None,
        }
    }

    /// 参数合法性检查
    pub fn validate(&self) -> Result<(), String> {
        if !self.transportation_buffer.is_finite() || self.transportation_buffer < 0.0 {
            return Err(format!(
                "运输缓冲必须为非负有限数, 实际为 {}",
                self.transportation_buffer
            ));
        }
        let dwell_limits = [
            ("deep_sea_vessel", self.deep_sea_vessel_max_dwell_hours),
            ("feeder", self.feeder_max_dwell_hours),
            ("barge", self.barge_max_dwell_hours),
            ("train", self.train_max_dwell_hours),
        ];
        for (name, hours) in dwell_limits {
            if hours <= 0 {
                return Err(format!("{} 最大堆存时长必须为正数, 实际为 {}", name, hours));
            }
        }
        if self.truck_pickup_lead_hours <= 0 {
            return Err(format!(
                "卡车取箱提前期必须为正数, 实际为 {}",
                self.truck_pickup_lead_hours
            ));
        }
        Ok(())
    }
}
