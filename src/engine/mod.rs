// ==========================================
// 集装箱码头交通分析 - 引擎层
// ==========================================
// 职责: 实现核算与裁决规则,不拼 SQL
// 红线: Engine 不拼 SQL, 所有裁决必须输出 reason
// ==========================================

pub mod capacity_ledger;
pub mod dwell_resolver;
pub mod error;
pub mod orchestrator;
pub mod throughput;
pub mod utilization;

// 重导出核心引擎
pub use capacity_ledger::{
    CapacityLedger, OutboundCapacities, OutboundCapacityConstraint, VehicleAccount,
    CAPACITY_EPSILON_TEU,
};
pub use dwell_resolver::{DwellConstraintResolver, FALLBACK_PRIORITY};
pub use error::{AnalysisError, AnalysisResult};
pub use orchestrator::{AnalysisOrchestrator, AnalysisResults};
pub use throughput::ThroughputAggregator;
pub use utilization::{UtilizationComputer, VehicleUtilization};
