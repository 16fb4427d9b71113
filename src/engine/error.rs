// ==========================================
// 集装箱码头交通分析 - 分析引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 分析引擎错误类型
#[derive(Error, Debug)]
pub enum AnalysisError {
    // ===== 运力核算错误 =====
    #[error("出港运力超限: vehicle={vehicle}, attempted_teu={attempted_teu}, used_teu={used_teu}, maximum_teu={maximum_teu}")]
    CapacityExceeded {
        vehicle: String,
        attempted_teu: f64,
        used_teu: f64,
        maximum_teu: f64,
    },

    // ===== 结构性缺陷 (数据集自身矛盾, 立即失败) =====
    #[error("运输工具未登记: {vehicle}")]
    MissingVehicle { vehicle: String },

    #[error("集装箱无法落位: container_id={container_id}, {message}")]
    UnresolvableAssignment {
        container_id: String,
        message: String,
    },

    // ===== 调用方参数错误 =====
    #[error("过滤器参数非法: {0}")]
    InvalidFilter(String),

    #[error("分析参数非法: {0}")]
    InvalidConfiguration(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;
