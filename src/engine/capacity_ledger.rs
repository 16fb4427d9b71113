// ==========================================
// 集装箱码头交通分析 - 运力台账引擎
// ==========================================
// 职责: 逐实例/逐类型累计进出港箱量,出港上限门控
// 红线: 运力约束优先于落位意愿,超限提交必须报错
// ==========================================
// 上限规则: 最大出港运力 = 固定进港运力 × (1 + 运输缓冲);
// 卡车按需出现,不设上限。
// ==========================================

use crate::domain::types::{VehicleType, VehicleTypeFilter, VEHICLE_TYPE_ORDER};
use crate::domain::vehicle::{VehicleInstance, VehicleKey};
use crate::engine::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 浮点比较容差 (标准箱)
///
/// 箱量由 0.25 的整数倍折算而来,容差只用来吸收加法累积误差,
/// 不得放大到能放行真实超限。
pub const CAPACITY_EPSILON_TEU: f64 = 1e-9;

// ==========================================
// VehicleAccount - 单实例运力台账
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleAccount {
    pub instance: VehicleInstance, // 挂靠档 (固定进港运力在此)
    pub inbound_used_teu: f64,     // 进港累计箱量
    pub outbound_used_teu: f64,    // 出港累计箱量
}

// ==========================================
// Trait: OutboundCapacityConstraint
// ==========================================
// 用途: 堆存约束裁决引擎的运力门控接口
pub trait OutboundCapacityConstraint {
    /// 检查是否还能再装载指定箱量
    fn can_add_teu(&self, teu: f64, transportation_buffer: f64) -> bool;

    /// 剩余出港运力 (None 表示不设上限)
    fn remaining_outbound_teu(&self, transportation_buffer: f64) -> Option<f64>;

    /// 出港/进港利用率 (进港运力为零时无定义)
    fn utilization_ratio(&self) -> Option<f64>;
}

impl OutboundCapacityConstraint for VehicleAccount {
    fn can_add_teu(&self, teu: f64, transportation_buffer: f64) -> bool {
        match self.instance.maximum_outbound_capacity(transportation_buffer) {
            Some(maximum) => self.outbound_used_teu + teu <= maximum + CAPACITY_EPSILON_TEU,
            None => true,
        }
    }

    fn remaining_outbound_teu(&self, transportation_buffer: f64) -> Option<f64> {
        self.instance
            .maximum_outbound_capacity(transportation_buffer)
            .map(|maximum| (maximum - self.outbound_used_teu).max(0.0))
    }

    fn utilization_ratio(&self) -> Option<f64> {
        if self.instance.inbound_capacity_teu > 0.0 {
            Some(self.outbound_used_teu / self.instance.inbound_capacity_teu)
        } else {
            None
        }
    }
}

// ==========================================
// OutboundCapacities - 逐类型出港运力视图
// ==========================================
// maximum 对卡车记正无穷 (不设上限);消费方对无穷值只展示不参与运算。
#[derive(Debug, Clone, Serialize)]
pub struct OutboundCapacities {
    pub actual: BTreeMap<VehicleType, f64>,  // 实际出港箱量
    pub maximum: BTreeMap<VehicleType, f64>, // 理论最大出港运力
}

// ==========================================
// CapacityLedger - 运力台账引擎
// ==========================================
pub struct CapacityLedger {
    transportation_buffer: f64, // 核算期运输缓冲 (出港门控用)
    accounts: BTreeMap<VehicleKey, VehicleAccount>,
}

impl CapacityLedger {
    /// 构造函数
    ///
    /// # 参数
    /// - `transportation_buffer`: 核算期运输缓冲系数
    pub fn new(transportation_buffer: f64) -> Self {
        Self {
            transportation_buffer,
            accounts: BTreeMap::new(),
        }
    }

    /// 核算期运输缓冲
    pub fn transportation_buffer(&self) -> f64 {
        self.transportation_buffer
    }

    /// 登记一个挂靠档
    ///
    /// 重复登记视为数据质量问题: 保留首次登记,告警后忽略。
    pub fn register_vehicle(&mut self, instance: VehicleInstance) {
        if self.accounts.contains_key(&instance.key) {
            tracing::warn!(vehicle = %instance.key, "挂靠档重复登记，保留首次登记");
            return;
        }
        self.accounts.insert(
            instance.key.clone(),
            VehicleAccount {
                instance,
                inbound_used_teu: 0.0,
                outbound_used_teu: 0.0,
            },
        );
    }

    /// 查询单实例台账
    pub fn account(&self, vehicle: &VehicleKey) -> Option<&VehicleAccount> {
        self.accounts.get(vehicle)
    }

    /// 遍历全部台账 (按实例标识稳定排序)
    pub fn accounts(&self) -> impl Iterator<Item = &VehicleAccount> {
        self.accounts.values()
    }

    fn account_mut(&mut self, vehicle: &VehicleKey) -> AnalysisResult<&mut VehicleAccount> {
        self.accounts
            .get_mut(vehicle)
            .ok_or_else(|| AnalysisError::MissingVehicle {
                vehicle: vehicle.to_string(),
            })
    }

    /// 记入一票进港箱量
    ///
    /// # 参数
    /// - `vehicle`: 进港载运工具
    /// - `teu`: 折算标准箱
    ///
    /// # 返回
    /// 工具未登记属结构性缺陷,返回 `MissingVehicle`。
    pub fn record_inbound(&mut self, vehicle: &VehicleKey, teu: f64) -> AnalysisResult<()> {
        let account = self.account_mut(vehicle)?;
        account.inbound_used_teu += teu;
        Ok(())
    }

    /// 记入一票出港箱量
    ///
    /// # 返回
    /// 超过最大出港运力时返回 `CapacityExceeded`,不做部分提交;
    /// 卡车不设上限,永不因运力拒绝。
    pub fn record_outbound(&mut self, vehicle: &VehicleKey, teu: f64) -> AnalysisResult<()> {
        let buffer = self.transportation_buffer;
        let account = self.account_mut(vehicle)?;

        if let Some(maximum) = account.instance.maximum_outbound_capacity(buffer) {
            if account.outbound_used_teu + teu > maximum + CAPACITY_EPSILON_TEU {
                return Err(AnalysisError::CapacityExceeded {
                    vehicle: account.instance.key.to_string(),
                    attempted_teu: teu,
                    used_teu: account.outbound_used_teu,
                    maximum_teu: maximum,
                });
            }
        }

        account.outbound_used_teu += teu;
        Ok(())
    }

    /// 预检一票出港箱量是否放得下 (不提交)
    pub fn can_record_outbound(&self, vehicle: &VehicleKey, teu: f64) -> AnalysisResult<bool> {
        let account = self
            .accounts
            .get(vehicle)
            .ok_or_else(|| AnalysisError::MissingVehicle {
                vehicle: vehicle.to_string(),
            })?;
        Ok(account.can_add_teu(teu, self.transportation_buffer))
    }

    /// 单实例剩余出港运力 (None 表示不设上限)
    pub fn remaining_outbound_capacity(
        &self,
        vehicle: &VehicleKey,
    ) -> AnalysisResult<Option<f64>> {
        let account = self
            .accounts
            .get(vehicle)
            .ok_or_else(|| AnalysisError::MissingVehicle {
                vehicle: vehicle.to_string(),
            })?;
        Ok(account.remaining_outbound_teu(self.transportation_buffer))
    }

    /// 逐类型进港箱量合计
    ///
    /// 五种类型全部在列,无流量的类型记 0.0。
    pub fn inbound_capacity_by_type(&self) -> BTreeMap<VehicleType, f64> {
        let mut totals: BTreeMap<VehicleType, f64> =
            VEHICLE_TYPE_ORDER.iter().map(|vt| (*vt, 0.0)).collect();
        for account in self.accounts.values() {
            *totals.entry(account.instance.key.vehicle_type).or_insert(0.0) +=
                account.inbound_used_teu;
        }
        totals
    }

    /// 逐类型出港运力视图 (实际箱量, 理论最大)
    ///
    /// # 参数
    /// - `transportation_buffer`: 查询期运输缓冲,理论最大按当前值现算
    pub fn outbound_capacity_by_type(&self, transportation_buffer: f64) -> OutboundCapacities {
        let mut actual: BTreeMap<VehicleType, f64> =
            VEHICLE_TYPE_ORDER.iter().map(|vt| (*vt, 0.0)).collect();
        let mut maximum: BTreeMap<VehicleType, f64> = VEHICLE_TYPE_ORDER
            .iter()
            .map(|vt| {
                if vt.is_capacity_constrained() {
                    (*vt, 0.0)
                } else {
                    (*vt, f64::INFINITY)
                }
            })
            .collect();

        for account in self.accounts.values() {
            let vehicle_type = account.instance.key.vehicle_type;
            *actual.entry(vehicle_type).or_insert(0.0) += account.outbound_used_teu;
            if let Some(instance_maximum) = account
                .instance
                .maximum_outbound_capacity(transportation_buffer)
            {
                *maximum.entry(vehicle_type).or_insert(0.0) += instance_maximum;
            }
        }

        OutboundCapacities { actual, maximum }
    }

    /// 逐实例 (固定进港运力, 已用出港箱量)
    ///
    /// 固定进港运力为零的实例原样返回,比值是否有定义由调用方判断。
    ///
    /// # 返回
    /// 空过滤集合属调用方构造错误,返回 `InvalidFilter`。
    pub fn capacities_by_instance(
        &self,
        filter: &VehicleTypeFilter,
    ) -> AnalysisResult<BTreeMap<VehicleKey, (f64, f64)>> {
        if !filter.is_valid() {
            return Err(AnalysisError::InvalidFilter(format!(
                "过滤集合为空: {}",
                filter
            )));
        }

        let mut result = BTreeMap::new();
        for account in self.accounts.values() {
            if filter.matches(account.instance.key.vehicle_type) {
                result.insert(
                    account.instance.key.clone(),
                    (
                        account.instance.inbound_capacity_teu,
                        account.outbound_used_teu,
                    ),
                );
            }
        }
        Ok(result)
    }
}
