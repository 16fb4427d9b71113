// ==========================================
// 集装箱码头交通分析 - 改配结果汇总
// ==========================================

use crate::domain::types::{AdjustmentCategory, VehicleType};
use serde::{Deserialize, Serialize};

// ==========================================
// AdjustmentTally - 改配量汇总 (标准箱)
// ==========================================
// 六个类别: 维持原计划,以及改配到五种类型各自的箱量。
// 守恒律: 六类之和 == 裁决过的总箱量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentTally {
    pub unchanged: f64,       // 维持原计划的箱量
    pub deep_sea_vessel: f64, // 改配到深海船的箱量
    pub feeder: f64,          // 改配到支线船的箱量
    pub barge: f64,           // 改配到驳船的箱量
    pub train: f64,           // 改配到列车的箱量
    pub truck: f64,           // 改配到卡车的箱量
}

impl AdjustmentTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按改配类别累加箱量
    pub fn add(&mut self, category: AdjustmentCategory, teu: f64) {
        match category {
            AdjustmentCategory::Unchanged => self.unchanged += teu,
            AdjustmentCategory::ChangedTo(VehicleType::DeepSeaVessel) => {
                self.deep_sea_vessel += teu
            }
            AdjustmentCategory::ChangedTo(VehicleType::Feeder) => self.feeder += teu,
            AdjustmentCategory::ChangedTo(VehicleType::Barge) => self.barge += teu,
            AdjustmentCategory::ChangedTo(VehicleType::Train) => self.train += teu,
            AdjustmentCategory::ChangedTo(VehicleType::Truck) => self.truck += teu,
        }
    }

    /// 某一类型被改配承接的箱量
    pub fn changed_to(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::DeepSeaVessel => self.deep_sea_vessel,
            VehicleType::Feeder => self.feeder,
            VehicleType::Barge => self.barge,
            VehicleType::Train => self.train,
            VehicleType::Truck => self.truck,
        }
    }

    /// 六类合计 (应等于裁决过的总箱量)
    pub fn total(&self) -> f64 {
        self.unchanged
            + self.deep_sea_vessel
            + self.feeder
            + self.barge
            + self.train
            + self.truck
    }
}
