// ==========================================
// 集装箱码头交通分析 - 引擎编排器
// ==========================================
// 用途: 协调台账登记、逐箱裁决、吞吐聚合的单趟批次,
//       并冻结为只读查询结果
// 红线: 单线程单趟;箱群稳定排序保证结果可复现
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::container::{Container, ResolvedAssignment};
use crate::domain::tally::AdjustmentTally;
use crate::domain::throughput::{ThroughputStatistics, WeeklyThroughputSeries};
use crate::domain::types::{VehicleType, VehicleTypeFilter};
use crate::domain::vehicle::{VehicleInstance, VehicleKey};
use crate::engine::capacity_ledger::{CapacityLedger, OutboundCapacities};
use crate::engine::dwell_resolver::DwellConstraintResolver;
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::throughput::ThroughputAggregator;
use crate::engine::utilization::{UtilizationComputer, VehicleUtilization};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// AnalysisOrchestrator - 引擎编排器
// ==========================================

pub struct AnalysisOrchestrator {
    config: AnalysisConfig,
}

impl AnalysisOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 分析参数 (运输缓冲、各类型堆存上限、卡车取箱提前期)
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 执行完整分析批次（单趟）
    ///
    /// # 参数
    /// - vehicles: 挂靠档全集
    /// - containers: 集装箱全集
    ///
    /// # 返回
    /// 冻结后的分析结果;数据集结构性缺陷 (未知进港工具等) 直接失败
    pub fn run(
        &self,
        vehicles: Vec<VehicleInstance>,
        mut containers: Vec<Container>,
    ) -> AnalysisResult<AnalysisResults> {
        self.config
            .validate()
            .map_err(AnalysisError::InvalidConfiguration)?;

        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            vehicles_count = vehicles.len(),
            containers_count = containers.len(),
            transportation_buffer = self.config.transportation_buffer,
            "开始执行码头交通分析批次"
        );

        // ==========================================
        // 步骤1: 登记挂靠档,构建裁决器船期索引
        // ==========================================
        debug!("步骤1: 登记挂靠档");

        let mut ledger = CapacityLedger::new(self.config.transportation_buffer);
        for vehicle in &vehicles {
            ledger.register_vehicle(vehicle.clone());
        }
        let resolver = DwellConstraintResolver::new(self.config.clone(), &vehicles);

        info!(registered_count = vehicles.len(), "挂靠档登记完成");

        // ==========================================
        // 步骤2: 箱群稳定排序 (进港时刻, 箱号)
        // ==========================================
        debug!("步骤2: 箱群稳定排序");

        containers.sort_by(|a, b| {
            (a.inbound_arrival, &a.container_id).cmp(&(b.inbound_arrival, &b.container_id))
        });

        // ==========================================
        // 步骤3: 逐箱核算进港箱量并裁决出港落位
        // ==========================================
        debug!("步骤3: 逐箱核算与裁决");

        let mut tally = AdjustmentTally::new();
        let mut throughput = ThroughputAggregator::new();
        let mut assignments = Vec::with_capacity(containers.len());

        for container in &containers {
            ledger.record_inbound(&container.inbound_vehicle, container.teu_factor)?;

            let assignment = resolver.resolve(&mut ledger, container)?;
            tally.add(assignment.category, assignment.teu);

            // 岸侧吞吐: 深海船/支线船的卸船与装船各计一箱
            if container.delivered_by_quay_side() {
                throughput.record_event(container.inbound_arrival.date(), 1);
            }
            if assignment.picked_up_by_quay_side() {
                throughput.record_event(assignment.outbound_departure.date(), 1);
            }

            assignments.push(assignment);
        }

        let adjusted_teu = tally.total() - tally.unchanged;
        info!(
            run_id = %run_id,
            containers_count = assignments.len(),
            total_teu = tally.total(),
            adjusted_teu,
            quay_side_boxes = throughput.total_boxes(),
            "分析批次完成"
        );

        Ok(AnalysisResults {
            run_id,
            config: self.config.clone(),
            ledger,
            tally,
            throughput,
            assignments,
        })
    }
}

// ==========================================
// AnalysisResults - 冻结后的分析结果
// ==========================================
// 批次结束后台账只读;运输缓冲可更新,缓冲派生值按当前缓冲现算,
// 已提交的出港箱量不回滚。
pub struct AnalysisResults {
    run_id: String,
    config: AnalysisConfig,
    ledger: CapacityLedger,
    tally: AdjustmentTally,
    throughput: ThroughputAggregator,
    assignments: Vec<ResolvedAssignment>,
}

impl AnalysisResults {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// 查询期运输缓冲
    pub fn transportation_buffer(&self) -> f64 {
        self.config.transportation_buffer
    }

    /// 更新查询期运输缓冲 (缓冲派生值随之失效重算)
    pub fn update_transportation_buffer(
        &mut self,
        transportation_buffer: f64,
    ) -> AnalysisResult<()> {
        if !transportation_buffer.is_finite() || transportation_buffer < 0.0 {
            return Err(AnalysisError::InvalidConfiguration(format!(
                "运输缓冲必须为非负有限数, 实际为 {}",
                transportation_buffer
            )));
        }
        self.config.transportation_buffer = transportation_buffer;
        Ok(())
    }

    /// 改配汇总 (不变 + 逐目标类型)
    pub fn summary(&self) -> AdjustmentTally {
        self.tally
    }

    /// 逐箱裁决快照 (按进港时刻、箱号序)
    pub fn assignments(&self) -> &[ResolvedAssignment] {
        &self.assignments
    }

    pub fn total_teu(&self) -> f64 {
        self.tally.total()
    }

    /// 逐类型进港箱量
    pub fn inbound_capacity_by_type(&self) -> BTreeMap<VehicleType, f64> {
        self.ledger.inbound_capacity_by_type()
    }

    /// 逐类型出港箱量与理论最大运力 (按当前缓冲)
    pub fn outbound_capacity_by_type(&self) -> OutboundCapacities {
        self.ledger
            .outbound_capacity_by_type(self.config.transportation_buffer)
    }

    /// 逐实例进出港箱量 (进港箱量, 出港箱量)
    pub fn capacities_by_instance(
        &self,
        filter: &VehicleTypeFilter,
    ) -> AnalysisResult<BTreeMap<VehicleKey, (f64, f64)>> {
        self.ledger.capacities_by_instance(filter)
    }

    /// 周吞吐序列 (岸侧,箱数口径)
    pub fn throughput_over_time(&self) -> WeeklyThroughputSeries {
        self.throughput.throughput_over_time()
    }

    /// 周吞吐统计量
    pub fn throughput_statistics(&self) -> ThroughputStatistics {
        self.throughput.statistics()
    }

    /// 逐实例利用率 (按当前缓冲判定超限)
    pub fn utilization_by_instance(
        &self,
        filter: &VehicleTypeFilter,
    ) -> AnalysisResult<Vec<VehicleUtilization>> {
        UtilizationComputer::new().utilization_by_instance(
            &self.ledger,
            filter,
            self.config.transportation_buffer,
        )
    }
}
