// ==========================================
// 集装箱码头交通分析 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/引擎错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::error::AnalysisError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 查询面在批次执行前被调用
    #[error("分析尚未执行: {0}")]
    AnalysisNotRun(String),

    /// 出港运力门控被突破 (不应出现,属引擎缺陷)
    #[error("出港运力超限: {0}")]
    CapacityExceeded(String),

    /// 数据集结构性缺陷 (缺表、未知进港工具等)
    #[error("数据集结构性缺陷: {0}")]
    DatasetIntegrity(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::DatabaseError(format!("数据库连接失败: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::MissingTable(table) => {
                ApiError::DatasetIntegrity(format!("数据集表缺失: {}", table))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatasetIntegrity(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 AnalysisError 转换
// ==========================================
impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            e @ AnalysisError::CapacityExceeded { .. } => {
                ApiError::CapacityExceeded(e.to_string())
            }
            e @ AnalysisError::MissingVehicle { .. } => ApiError::DatasetIntegrity(e.to_string()),
            e @ AnalysisError::UnresolvableAssignment { .. } => {
                ApiError::DatasetIntegrity(e.to_string())
            }
            AnalysisError::InvalidFilter(msg) => {
                ApiError::InvalidInput(format!("过滤器参数非法: {}", msg))
            }
            AnalysisError::InvalidConfiguration(msg) => {
                ApiError::InvalidInput(format!("分析参数非法: {}", msg))
            }
            AnalysisError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
