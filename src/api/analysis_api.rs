// ==========================================
// 集装箱码头交通分析 - 分析查询门面
// ==========================================
// 职责: 封装批次执行与只读查询面,供展示层/CLI 调用
// 红线: 查询面对冻结结果只读;批次执行前的查询显式报错
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalysisConfig;
use crate::domain::tally::AdjustmentTally;
use crate::domain::throughput::{ThroughputStatistics, WeeklyThroughputSeries};
use crate::domain::types::{VehicleType, VehicleTypeFilter};
use crate::domain::vehicle::VehicleKey;
use crate::engine::capacity_ledger::OutboundCapacities;
use crate::engine::orchestrator::{AnalysisOrchestrator, AnalysisResults};
use crate::engine::utilization::VehicleUtilization;
use crate::repository::dataset_repo::DatasetRepository;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

// ==========================================
// AnalysisRunSummary - 批次执行摘要
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRunSummary {
    pub run_id: String,
    pub vehicle_count: usize,   // 数据集挂靠档数 (不含临时卡车)
    pub container_count: usize, // 集装箱总数
    pub total_teu: f64,         // 折算标准箱总量
    pub unchanged_teu: f64,     // 维持原计划的箱量
    pub adjusted_teu: f64,      // 改配箱量
}

// ==========================================
// AnalysisApi - 分析查询门面
// ==========================================

pub struct AnalysisApi {
    repository: Arc<DatasetRepository>,
    config: AnalysisConfig,
    results: Option<AnalysisResults>,
}

impl AnalysisApi {
    /// 创建API实例
    ///
    /// # 参数
    /// - repository: 数据集仓储
    /// - config: 分析参数
    pub fn new(repository: Arc<DatasetRepository>, config: AnalysisConfig) -> Self {
        Self {
            repository,
            config,
            results: None,
        }
    }

    // ==========================================
    // 批次执行
    // ==========================================

    /// 执行分析批次: 加载数据集 → 单趟核算 → 冻结结果
    ///
    /// 重复调用会以当前参数重新执行并覆盖上一次结果。
    pub fn run_analysis(&mut self) -> ApiResult<AnalysisRunSummary> {
        let vehicles = self.repository.load_vehicle_instances()?;
        let containers = self.repository.load_containers()?;
        let vehicle_count = vehicles.len();
        let container_count = containers.len();

        let orchestrator = AnalysisOrchestrator::new(self.config.clone());
        let results = orchestrator.run(vehicles, containers)?;

        let tally = results.summary();
        let summary = AnalysisRunSummary {
            run_id: results.run_id().to_string(),
            vehicle_count,
            container_count,
            total_teu: tally.total(),
            unchanged_teu: tally.unchanged,
            adjusted_teu: tally.total() - tally.unchanged,
        };
        info!(
            run_id = %summary.run_id,
            vehicle_count,
            container_count,
            "分析批次冻结完成"
        );
        self.results = Some(results);
        Ok(summary)
    }

    fn results(&self) -> ApiResult<&AnalysisResults> {
        self.results.as_ref().ok_or_else(|| {
            ApiError::AnalysisNotRun("查询前必须先调用 run_analysis".to_string())
        })
    }

    // ==========================================
    // 只读查询面
    // ==========================================

    /// 改配汇总: 维持原计划与逐目标类型的箱量
    pub fn get_summary(&self) -> ApiResult<AdjustmentTally> {
        Ok(self.results()?.summary())
    }

    /// 逐类型进港箱量
    pub fn get_inbound_capacity_of_vehicles(&self) -> ApiResult<BTreeMap<VehicleType, f64>> {
        Ok(self.results()?.inbound_capacity_by_type())
    }

    /// 逐类型出港箱量与理论最大运力 (按当前运输缓冲)
    pub fn get_outbound_capacity_of_vehicles(&self) -> ApiResult<OutboundCapacities> {
        Ok(self.results()?.outbound_capacity_by_type())
    }

    /// 逐实例进出港箱量 (进港箱量, 出港箱量)
    ///
    /// # 参数
    /// - filter: 类型过滤器;空过滤集合报无效输入
    pub fn get_inbound_and_outbound_capacity_of_each_vehicle(
        &self,
        filter: &VehicleTypeFilter,
    ) -> ApiResult<BTreeMap<VehicleKey, (f64, f64)>> {
        Ok(self.results()?.capacities_by_instance(filter)?)
    }

    /// 岸侧周吞吐序列 (箱数口径,周一起始)
    pub fn get_throughput_over_time(&self) -> ApiResult<WeeklyThroughputSeries> {
        Ok(self.results()?.throughput_over_time())
    }

    /// 岸侧周吞吐统计量 (最大/均值/样本标准差)
    pub fn get_throughput_statistics(&self) -> ApiResult<ThroughputStatistics> {
        Ok(self.results()?.throughput_statistics())
    }

    /// 逐实例利用率 (按当前运输缓冲判定超限)
    pub fn get_utilization_of_each_vehicle(
        &self,
        filter: &VehicleTypeFilter,
    ) -> ApiResult<Vec<VehicleUtilization>> {
        Ok(self.results()?.utilization_by_instance(filter)?)
    }

    // ==========================================
    // 参数更新
    // ==========================================

    /// 更新运输缓冲,缓冲派生查询值随之重算
    ///
    /// 已冻结批次的出港提交不回滚;后续 `run_analysis` 也使用新值。
    pub fn update_transportation_buffer(&mut self, transportation_buffer: f64) -> ApiResult<()> {
        if !transportation_buffer.is_finite() || transportation_buffer < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "运输缓冲必须为非负有限数, 实际为 {}",
                transportation_buffer
            )));
        }
        self.config.transportation_buffer = transportation_buffer;
        if let Some(results) = self.results.as_mut() {
            results.update_transportation_buffer(transportation_buffer)?;
        }
        info!(transportation_buffer, "运输缓冲已更新");
        Ok(())
    }

    /// 当前运输缓冲
    pub fn transportation_buffer(&self) -> f64 {
        self.config.transportation_buffer
    }
}
