// ==========================================
// 集装箱码头交通分析 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 批式交通分析引擎 (展示层只读消费)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据集读取
pub mod repository;

// 引擎层 - 核算与裁决
pub mod engine;

// 配置层 - 分析参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 查询门面
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AdjustmentCategory, VehicleType, VehicleTypeFilter, VEHICLE_TYPE_ORDER};

// 领域实体
pub use domain::{
    AdjustmentTally, Container, ResolvedAssignment, ThroughputStatistics, VehicleInstance,
    VehicleKey, WeeklyThroughputSeries,
};

// 引擎
pub use engine::{
    AnalysisOrchestrator, AnalysisResults, CapacityLedger, DwellConstraintResolver,
    ThroughputAggregator, UtilizationComputer,
};

// API
pub use api::{AnalysisApi, AnalysisRunSummary};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "集装箱码头交通分析引擎";

// ==========================================
// 预编译检查
// ==========================================
