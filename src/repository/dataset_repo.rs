// ==========================================
// 集装箱码头交通分析 - 数据集仓储
// ==========================================
// 数据集由流量生成端写入 SQLite,本仓储只读回放:
// vehicle_instance 表 = 船期/班列挂靠档, container 表 = 箱流。
// 红线: Repository 不含业务逻辑,裁决与核算都在引擎层
// ==========================================

use crate::db::{open_sqlite_connection, table_exists};
use crate::domain::container::{teu_factor_for_length, Container};
use crate::domain::types::VehicleType;
use crate::domain::vehicle::{VehicleInstance, VehicleKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// DatasetRepository - 数据集仓储
// ==========================================
pub struct DatasetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DatasetRepository {
    /// 创建新的数据集仓储实例
    ///
    /// # 参数
    /// - db_path: 数据集数据库文件路径
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(&db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享底层连接 (供 ConfigManager 复用同一个数据集文件)
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 加载全部运输工具挂靠档
    ///
    /// # 返回
    /// - Ok(Vec<VehicleInstance>): 按 (到港时间, 类型, 航线, 班次) 稳定排序
    /// - Err: 数据库错误或字段值非法
    pub fn load_vehicle_instances(&self) -> RepositoryResult<Vec<VehicleInstance>> {
        let conn = self.get_conn()?;

        if !table_exists(&conn, "vehicle_instance")? {
            return Err(RepositoryError::MissingTable("vehicle_instance".to_string()));
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT
                vehicle_type, service_name, vehicle_name,
                arrival, departure, inbound_capacity_teu
            FROM vehicle_instance
            ORDER BY arrival, vehicle_type, service_name, vehicle_name
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut instances = Vec::with_capacity(rows.len());
        for (type_str, service_name, vehicle_name, arrival_str, departure_str, capacity) in rows {
            let vehicle_type = parse_vehicle_type(&type_str)?;
            let arrival = parse_datetime("arrival", &arrival_str)?;
            let departure = parse_datetime("departure", &departure_str)?;

            instances.push(VehicleInstance {
                key: VehicleKey {
                    vehicle_type,
                    service_name,
                    vehicle_name,
                    arrival_date: arrival.date(),
                },
                inbound_capacity_teu: capacity,
                arrival,
                departure,
            });
        }

        Ok(instances)
    }

    /// 加载全部集装箱箱流
    ///
    /// # 返回
    /// - Ok(Vec<Container>): 按 (进港时刻, 箱号) 稳定排序
    /// - Err: 数据库错误或字段值非法
    pub fn load_containers(&self) -> RepositoryResult<Vec<Container>> {
        let conn = self.get_conn()?;

        if !table_exists(&conn, "container")? {
            return Err(RepositoryError::MissingTable("container".to_string()));
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT
                container_id, length_ft,
                inbound_vehicle_type, inbound_service_name, inbound_vehicle_name,
                inbound_arrival, planned_outbound_vehicle_type
            FROM container
            ORDER BY inbound_arrival, container_id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut containers = Vec::with_capacity(rows.len());
        for (
            container_id,
            length_ft,
            inbound_type_str,
            inbound_service_name,
            inbound_vehicle_name,
            inbound_arrival_str,
            planned_type_str,
        ) in rows
        {
            let inbound_type = parse_vehicle_type(&inbound_type_str)?;
            let planned_outbound_type = parse_vehicle_type(&planned_type_str)?;
            let inbound_arrival = parse_datetime("inbound_arrival", &inbound_arrival_str)?;

            containers.push(Container {
                container_id,
                length_ft,
                teu_factor: teu_factor_for_length(length_ft),
                inbound_vehicle: VehicleKey {
                    vehicle_type: inbound_type,
                    service_name: inbound_service_name,
                    vehicle_name: inbound_vehicle_name,
                    arrival_date: inbound_arrival.date(),
                },
                inbound_arrival,
                planned_outbound_type,
            });
        }

        Ok(containers)
    }
}

/// 解析运输工具类型字段,非法值属结构性缺陷直接报错
fn parse_vehicle_type(raw: &str) -> RepositoryResult<VehicleType> {
    VehicleType::from_str(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: "vehicle_type".to_string(),
        message: format!("无法识别的运输工具类型: {}", raw),
    })
}

/// 解析时间字段 ("%Y-%m-%d %H:%M:%S")
fn parse_datetime(field: &str, raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|e| {
        RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("时间格式错误 ({}): {}", raw, e),
        }
    })
}
