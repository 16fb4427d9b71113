// ==========================================
// 集装箱码头交通分析 - 堆存约束裁决引擎
// ==========================================
// 职责: 逐箱校验堆存时长,违约时按固定优先级改配出港类型
// 红线: 不存在落位失败终态,卡车兜底保证每箱必有出港工具
// 红线: 所有裁决必须输出机读原因
// ==========================================
// 裁决顺序: 原计划类型 → 兜底优先级逐类型尝试 → 卡车
// 同类型多个候选档之间取最早可行离港 (确定性平局规则)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::container::{Container, ResolvedAssignment};
use crate::domain::types::{AdjustmentCategory, VehicleType};
use crate::domain::vehicle::{VehicleInstance, VehicleKey};
use crate::engine::capacity_ledger::CapacityLedger;
use crate::engine::error::{AnalysisError, AnalysisResult};
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::instrument;

/// 兜底优先级 (固定领域知识,不随配置变化)
///
/// 深海船 → 支线船 → 驳船 → 列车 → 卡车。卡车在末位,
/// 无堆存约束且不设运力上限,是保证裁决必然终止的终态兜底。
pub const FALLBACK_PRIORITY: [VehicleType; 5] = [
    VehicleType::DeepSeaVessel,
    VehicleType::Feeder,
    VehicleType::Barge,
    VehicleType::Train,
    VehicleType::Truck,
];

// ==========================================
// CandidateSearch - 单类型候选搜索结果
// ==========================================
// 未找到时区分三种机读原因,落位原因按 "原计划失败原因 + 改配目标" 拼装
#[derive(Debug, Clone, PartialEq)]
enum CandidateSearch {
    /// 找到最早可行档
    Found {
        vehicle: VehicleKey,
        departure: NaiveDateTime,
    },
    /// 该类型没有离港晚于进港时刻的班次
    NoConnectingService,
    /// 有班次衔接,但堆存时长全部超限
    DwellLimitExceeded,
    /// 堆存时长可行,但剩余出港运力不足
    NoRemainingCapacity,
}

impl CandidateSearch {
    fn reason_code(&self) -> &'static str {
        match self {
            CandidateSearch::Found { .. } => "FOUND",
            CandidateSearch::NoConnectingService => "NO_CONNECTING_SERVICE",
            CandidateSearch::DwellLimitExceeded => "DWELL_LIMIT_EXCEEDED",
            CandidateSearch::NoRemainingCapacity => "NO_REMAINING_CAPACITY",
        }
    }
}

// ==========================================
// DwellConstraintResolver - 堆存约束裁决引擎
// ==========================================
pub struct DwellConstraintResolver {
    config: AnalysisConfig,
    // 逐类型候选档索引,按 (离港时刻, 实例标识) 升序;卡车不进索引
    candidates_by_type: BTreeMap<VehicleType, Vec<(NaiveDateTime, VehicleKey)>>,
}

impl DwellConstraintResolver {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 分析参数 (各类型堆存上限、卡车取箱提前期)
    /// - `instances`: 船期/班列挂靠档全集
    pub fn new(config: AnalysisConfig, instances: &[VehicleInstance]) -> Self {
        let mut candidates_by_type: BTreeMap<VehicleType, Vec<(NaiveDateTime, VehicleKey)>> =
            BTreeMap::new();
        for instance in instances {
            // 卡车不在船期表里,兜底时按需生成取箱档
            if instance.key.vehicle_type == VehicleType::Truck {
                continue;
            }
            candidates_by_type
                .entry(instance.key.vehicle_type)
                .or_default()
                .push((instance.departure, instance.key.clone()));
        }
        for candidates in candidates_by_type.values_mut() {
            candidates.sort();
        }

        Self {
            config,
            candidates_by_type,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 裁决单箱落位
    ///
    /// 状态机: PLANNED → UNCHANGED | ADJUSTED(target)。
    /// 原计划类型可行则维持不变;否则沿兜底优先级取第一个可行的
    /// 类型/实例组合,箱量经台账 `record_outbound` 提交。
    ///
    /// # 返回
    /// 单箱裁决快照;卡车兜底保证 `Ok`,`UnresolvableAssignment`
    /// 仅在优先级表被破坏时出现,属结构性缺陷。
    #[instrument(skip(self, ledger, container), fields(
        container_id = %container.container_id,
        planned = %container.planned_outbound_type
    ))]
    pub fn resolve(
        &self,
        ledger: &mut CapacityLedger,
        container: &Container,
    ) -> AnalysisResult<ResolvedAssignment> {
        let planned = container.planned_outbound_type;

        // 1. 先按原计划类型找档
        let rejected = match self.search_type(ledger, planned, container)? {
            CandidateSearch::Found { vehicle, departure } => {
                ledger.record_outbound(&vehicle, container.teu_factor)?;
                return Ok(build_assignment(
                    container,
                    vehicle,
                    departure,
                    AdjustmentCategory::Unchanged,
                    "UNCHANGED".to_string(),
                ));
            }
            rejected => rejected,
        };

        // 2. 按固定优先级改配 (跳过已尝试的原计划类型)
        for fallback_type in FALLBACK_PRIORITY {
            if fallback_type == planned {
                continue;
            }
            if let CandidateSearch::Found { vehicle, departure } =
                self.search_type(ledger, fallback_type, container)?
            {
                ledger.record_outbound(&vehicle, container.teu_factor)?;
                tracing::debug!(
                    from = %planned,
                    to = %fallback_type,
                    reason = rejected.reason_code(),
                    "集装箱改配出港类型"
                );
                return Ok(build_assignment(
                    container,
                    vehicle,
                    departure,
                    AdjustmentCategory::ChangedTo(fallback_type),
                    format!(
                        "{}: planned={}, changed_to={}",
                        rejected.reason_code(),
                        planned,
                        fallback_type
                    ),
                ));
            }
        }

        // 卡车兜底在优先级表末位且永远可行,走到这里属结构性缺陷
        Err(AnalysisError::UnresolvableAssignment {
            container_id: container.container_id.clone(),
            message: format!("兜底优先级表未命中任何类型, planned={}", planned),
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 在指定类型内找最早可行档
    ///
    /// 可行 = 离港严格晚于进港 且 堆存时长不超该类型上限 且 剩余运力放得下。
    /// 候选按离港升序,堆存随离港单调增长,首次超限即可终止扫描。
    fn search_type(
        &self,
        ledger: &mut CapacityLedger,
        vehicle_type: VehicleType,
        container: &Container,
    ) -> AnalysisResult<CandidateSearch> {
        // 卡车兜底: 不查船期,按需生成取箱档并登记入台账
        if vehicle_type == VehicleType::Truck {
            let truck = VehicleInstance::ad_hoc_truck(
                &container.container_id,
                container.inbound_arrival,
                self.config.truck_pickup_lead_hours,
            );
            let vehicle = truck.key.clone();
            let departure = truck.departure;
            ledger.register_vehicle(truck);
            return Ok(CandidateSearch::Found { vehicle, departure });
        }

        let candidates = match self.candidates_by_type.get(&vehicle_type) {
            Some(candidates) => candidates,
            None => return Ok(CandidateSearch::NoConnectingService),
        };

        let maximum_dwell = self
            .config
            .maximum_dwell_hours(vehicle_type)
            .map(Duration::hours);

        let mut any_connecting = false;
        let mut any_within_dwell = false;
        for (departure, vehicle) in candidates {
            if *departure <= container.inbound_arrival {
                continue;
            }
            any_connecting = true;

            if let Some(maximum) = maximum_dwell {
                if *departure - container.inbound_arrival > maximum {
                    break;
                }
            }
            any_within_dwell = true;

            if ledger.can_record_outbound(vehicle, container.teu_factor)? {
                return Ok(CandidateSearch::Found {
                    vehicle: vehicle.clone(),
                    departure: *departure,
                });
            }
        }

        if any_within_dwell {
            Ok(CandidateSearch::NoRemainingCapacity)
        } else if any_connecting {
            Ok(CandidateSearch::DwellLimitExceeded)
        } else {
            Ok(CandidateSearch::NoConnectingService)
        }
    }
}

/// 组装单箱裁决快照
fn build_assignment(
    container: &Container,
    vehicle: VehicleKey,
    departure: NaiveDateTime,
    category: AdjustmentCategory,
    assign_reason: String,
) -> ResolvedAssignment {
    let dwell = departure - container.inbound_arrival;
    ResolvedAssignment {
        container_id: container.container_id.clone(),
        teu: container.teu_factor,
        planned_type: container.planned_outbound_type,
        final_type: vehicle.vehicle_type,
        final_vehicle: vehicle,
        outbound_departure: departure,
        realized_dwell_hours: dwell.num_seconds() as f64 / 3600.0,
        category,
        assign_reason,
    }
}
