// ==========================================
// 集装箱码头交通分析 - API 层
// ==========================================
// 职责: 提供分析查询门面,供展示层/CLI 调用
// ==========================================

pub mod analysis_api;
pub mod error;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, AnalysisRunSummary};
pub use error::{ApiError, ApiResult};
