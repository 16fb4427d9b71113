// ==========================================
// 集装箱码头交通分析 - 配置管理器
// ==========================================
// 职责: 从数据集数据库加载分析参数
// 存储: flow_properties 表 (key-value),缺失项回落默认值
// ==========================================

use crate::config::analysis_config::{
    AnalysisConfig, DEFAULT_BARGE_MAX_DWELL_HOURS, DEFAULT_DEEP_SEA_VESSEL_MAX_DWELL_HOURS,
    DEFAULT_FEEDER_MAX_DWELL_HOURS, DEFAULT_TRAIN_MAX_DWELL_HOURS,
    DEFAULT_TRANSPORTATION_BUFFER, DEFAULT_TRUCK_PICKUP_LEAD_HOURS,
};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据集数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 flow_properties 表读取配置值
    ///
    /// # 参数
    /// - key: 配置键
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_property_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM flow_properties WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 f64 配置,缺失或格式错误时回落默认值并告警
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_property_value(key)? {
            Some(raw) => Ok(raw.parse::<f64>().unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值格式错误，使用默认值"
                );
                default
            })),
            None => Ok(default),
        }
    }

    /// 读取 i64 配置,缺失或格式错误时回落默认值并告警
    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        match self.get_property_value(key)? {
            Some(raw) => Ok(raw.parse::<i64>().unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值格式错误，使用默认值"
                );
                default
            })),
            None => Ok(default),
        }
    }

    /// 加载完整分析参数集
    ///
    /// 数据集生成端把流量属性写进同一个数据库,分析端在此读回;
    /// 任何缺失的键都使用内置默认值,保证旧数据集可直接分析。
    /// 整张 flow_properties 表缺失时按全默认值处理。
    pub fn load_analysis_config(&self) -> Result<AnalysisConfig, Box<dyn Error>> {
        {
            let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            if !crate::db::table_exists(&conn, "flow_properties")? {
                tracing::warn!("数据集无 flow_properties 表，全部配置使用默认值");
                let config = AnalysisConfig::default();
                config.validate()?;
                return Ok(config);
            }
        }

        let config = AnalysisConfig {
            transportation_buffer: self.get_f64_or_default(
                config_keys::TRANSPORTATION_BUFFER,
                DEFAULT_TRANSPORTATION_BUFFER,
            )?,
            deep_sea_vessel_max_dwell_hours: self.get_i64_or_default(
                config_keys::DEEP_SEA_VESSEL_MAX_DWELL_HOURS,
                DEFAULT_DEEP_SEA_VESSEL_MAX_DWELL_HOURS,
            )?,
            feeder_max_dwell_hours: self.get_i64_or_default(
                config_keys::FEEDER_MAX_DWELL_HOURS,
                DEFAULT_FEEDER_MAX_DWELL_HOURS,
            )?,
            barge_max_dwell_hours: self.get_i64_or_default(
                config_keys::BARGE_MAX_DWELL_HOURS,
                DEFAULT_BARGE_MAX_DWELL_HOURS,
            )?,
            train_max_dwell_hours: self.get_i64_or_default(
                config_keys::TRAIN_MAX_DWELL_HOURS,
                DEFAULT_TRAIN_MAX_DWELL_HOURS,
            )?,
            truck_pickup_lead_hours: self.get_i64_or_default(
                config_keys::TRUCK_PICKUP_LEAD_HOURS,
                DEFAULT_TRUCK_PICKUP_LEAD_HOURS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 运力
    pub const TRANSPORTATION_BUFFER: &str = "transportation_buffer";

    // 堆存时长上限
    pub const DEEP_SEA_VESSEL_MAX_DWELL_HOURS: &str = "deep_sea_vessel_max_dwell_hours";
    pub const FEEDER_MAX_DWELL_HOURS: &str = "feeder_max_dwell_hours";
    pub const BARGE_MAX_DWELL_HOURS: &str = "barge_max_dwell_hours";
    pub const TRAIN_MAX_DWELL_HOURS: &str = "train_max_dwell_hours";

    // 卡车
    pub const TRUCK_PICKUP_LEAD_HOURS: &str = "truck_pickup_lead_hours";
}
