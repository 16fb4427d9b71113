// ==========================================
// 集装箱码头交通分析 - 集装箱领域模型
// ==========================================

use crate::domain::types::{AdjustmentCategory, VehicleType};
use crate::domain::vehicle::VehicleKey;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 按箱长折算标准箱系数
///
/// 20 尺 = 1.0, 40 尺 = 2.0, 45 尺 = 2.25, 其他超长箱统一按 2.5 折算。
pub fn teu_factor_for_length(length_ft: i32) -> f64 {
    match length_ft {
        20 => 1.0,
        40 => 2.0,
        45 => 2.25,
        _ => 2.5,
    }
}

// ==========================================
// Container - 集装箱
// ==========================================
// 红线: 每箱恰好一个进港工具与一个最终出港工具,分析输入只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub container_id: String,                // 箱号
    pub length_ft: i32,                      // 箱长 (英尺)
    pub teu_factor: f64,                     // 标准箱折算系数
    pub inbound_vehicle: VehicleKey,         // 进港载运工具
    pub inbound_arrival: NaiveDateTime,      // 进港时刻
    pub planned_outbound_type: VehicleType,  // 原计划出港类型
}

impl Container {
    /// 进港工具是否岸侧船舶 (决定卸船吞吐量计数)
    pub fn delivered_by_quay_side(&self) -> bool {
        self.inbound_vehicle.vehicle_type.is_quay_side()
    }
}

// ==========================================
// ResolvedAssignment - 单箱裁决结果
// ==========================================
// 用途: 可解释性快照,逐箱记录最终落位与机读原因
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAssignment {
    pub container_id: String,            // 箱号
    pub teu: f64,                        // 折算标准箱
    pub planned_type: VehicleType,       // 原计划出港类型
    pub final_type: VehicleType,         // 最终出港类型
    pub final_vehicle: VehicleKey,       // 最终出港工具
    pub outbound_departure: NaiveDateTime, // 最终离港时刻
    pub realized_dwell_hours: f64,       // 实际堆存时长 (小时)
    pub category: AdjustmentCategory,    // 改配类别
    pub assign_reason: String,           // 落位原因 (机读)
}

impl ResolvedAssignment {
    /// 出港工具是否岸侧船舶 (决定装船吞吐量计数)
    pub fn picked_up_by_quay_side(&self) -> bool {
        self.final_type.is_quay_side()
    }
}
