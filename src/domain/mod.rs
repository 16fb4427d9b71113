// ==========================================
// 集装箱码头交通分析 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod container;
pub mod tally;
pub mod throughput;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use container::{teu_factor_for_length, Container, ResolvedAssignment};
pub use tally::AdjustmentTally;
pub use throughput::{ThroughputStatistics, WeeklyThroughputSeries, STD_DEV_UNDEFINED};
pub use types::{AdjustmentCategory, VehicleType, VehicleTypeFilter, VEHICLE_TYPE_ORDER};
pub use vehicle::{VehicleInstance, VehicleKey};
