// ==========================================
// 集装箱码头交通分析 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// 运输工具类型 (Vehicle Type)
// ==========================================
// 枚举顺序即报表展示顺序: 深海船 → 支线船 → 驳船 → 列车 → 卡车
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    DeepSeaVessel, // 深海船
    Feeder,        // 支线船
    Barge,         // 驳船
    Train,         // 列车
    Truck,         // 卡车
}

/// 报表与兜底遍历使用的固定顺序
pub const VEHICLE_TYPE_ORDER: [VehicleType; 5] = [
    VehicleType::DeepSeaVessel,
    VehicleType::Feeder,
    VehicleType::Barge,
    VehicleType::Train,
    VehicleType::Truck,
];

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::DeepSeaVessel => write!(f, "DEEP_SEA_VESSEL"),
            VehicleType::Feeder => write!(f, "FEEDER"),
            VehicleType::Barge => write!(f, "BARGE"),
            VehicleType::Train => write!(f, "TRAIN"),
            VehicleType::Truck => write!(f, "TRUCK"),
        }
    }
}

impl VehicleType {
    /// 从字符串解析运输工具类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEEP_SEA_VESSEL" => Some(VehicleType::DeepSeaVessel),
            "FEEDER" => Some(VehicleType::Feeder),
            "BARGE" => Some(VehicleType::Barge),
            "TRAIN" => Some(VehicleType::Train),
            "TRUCK" => Some(VehicleType::Truck),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            VehicleType::DeepSeaVessel => "DEEP_SEA_VESSEL",
            VehicleType::Feeder => "FEEDER",
            VehicleType::Barge => "BARGE",
            VehicleType::Train => "TRAIN",
            VehicleType::Truck => "TRUCK",
        }
    }

    /// 是否为岸侧(码头水侧)作业的船舶类型
    ///
    /// 吞吐量统计只计入岸吊装卸的箱量,即深海船与支线船。
    pub fn is_quay_side(&self) -> bool {
        matches!(self, VehicleType::DeepSeaVessel | VehicleType::Feeder)
    }

    /// 是否受出港运力上限约束
    ///
    /// 卡车按需出现,没有固定运力,永远不受上限约束。
    pub fn is_capacity_constrained(&self) -> bool {
        !matches!(self, VehicleType::Truck)
    }
}

// ==========================================
// 运输工具类型过滤器 (Vehicle Type Filter)
// ==========================================
// 逐实例查询接口的显式过滤参数: 全部 / 单一类型 / 类型集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleTypeFilter {
    All,
    One(VehicleType),
    Many(BTreeSet<VehicleType>),
}

impl VehicleTypeFilter {
    /// 从字符串解析过滤器
    ///
    /// 支持 "all"、单个类型名、逗号分隔的类型列表。
    /// 无法识别的类型名返回 None,由调用方转换为参数错误。
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Some(VehicleTypeFilter::All);
        }
        let parts: Vec<&str> = trimmed.split(',').map(|p| p.trim()).collect();
        if parts.len() == 1 {
            return VehicleType::from_str(parts[0]).map(VehicleTypeFilter::One);
        }
        let mut set = BTreeSet::new();
        for part in parts {
            set.insert(VehicleType::from_str(part)?);
        }
        Some(VehicleTypeFilter::Many(set))
    }

    /// 过滤器形参是否合法 (空集合视为调用方构造错误)
    pub fn is_valid(&self) -> bool {
        match self {
            VehicleTypeFilter::Many(set) => !set.is_empty(),
            _ => true,
        }
    }

    /// 判断某类型是否落入过滤范围
    pub fn matches(&self, vehicle_type: VehicleType) -> bool {
        match self {
            VehicleTypeFilter::All => true,
            VehicleTypeFilter::One(t) => *t == vehicle_type,
            VehicleTypeFilter::Many(set) => set.contains(&vehicle_type),
        }
    }
}

impl fmt::Display for VehicleTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleTypeFilter::All => write!(f, "ALL"),
            VehicleTypeFilter::One(t) => write!(f, "{}", t),
            VehicleTypeFilter::Many(set) => {
                let names: Vec<&str> = set.iter().map(|t| t.to_db_str()).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

// ==========================================
// 改配类别 (Adjustment Category)
// ==========================================
// 堆存约束裁决的结果归类: 维持原计划,或改配到某一目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentCategory {
    Unchanged,              // 维持原计划出港类型
    ChangedTo(VehicleType), // 改配到目标类型
}

impl fmt::Display for AdjustmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentCategory::Unchanged => write!(f, "UNCHANGED"),
            AdjustmentCategory::ChangedTo(t) => write!(f, "CHANGED_TO_{}", t),
        }
    }
}
