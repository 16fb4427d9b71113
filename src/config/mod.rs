// ==========================================
// 集装箱码头交通分析 - 配置层
// ==========================================
// 职责: 分析参数管理,数据集内属性加载
// 存储: flow_properties 表
// ==========================================

pub mod analysis_config;
pub mod config_manager;

// 重导出核心配置类型
pub use analysis_config::AnalysisConfig;
pub use config_manager::{config_keys, ConfigManager};
