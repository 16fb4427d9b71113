// ==========================================
// 集装箱码头交通分析 - CLI 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 批式分析引擎,结果以 JSON 输出到标准输出
// ==========================================

use std::sync::Arc;

use terminal_flow_analysis::api::AnalysisApi;
use terminal_flow_analysis::config::ConfigManager;
use terminal_flow_analysis::domain::types::VehicleTypeFilter;
use terminal_flow_analysis::logging;
use terminal_flow_analysis::repository::DatasetRepository;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", terminal_flow_analysis::APP_NAME);
    tracing::info!("系统版本: {}", terminal_flow_analysis::VERSION);
    tracing::info!("==================================================");

    // 解析命令行参数: <数据集.db> [运输工具过滤器]
    let mut args = std::env::args().skip(1);
    let db_path = args.next().ok_or_else(|| {
        anyhow::anyhow!("用法: terminal-flow-analysis <数据集.db> [运输工具过滤器]")
    })?;
    let filter_arg = args.next().unwrap_or_else(|| "all".to_string());
    let filter = VehicleTypeFilter::parse(&filter_arg)
        .ok_or_else(|| anyhow::anyhow!("无法识别的运输工具过滤器: {}", filter_arg))?;

    tracing::info!("使用数据集: {}", db_path);

    // 打开数据集,加载分析参数 (缺失键回落默认值)
    let repository = Arc::new(DatasetRepository::new(db_path)?);
    let config_manager = ConfigManager::from_connection(repository.connection())
        .map_err(|e| anyhow::anyhow!("配置管理器初始化失败: {}", e))?;
    let config = config_manager
        .load_analysis_config()
        .map_err(|e| anyhow::anyhow!("分析参数加载失败: {}", e))?;

    // 执行分析批次
    let mut api = AnalysisApi::new(repository, config);
    let run = api.run_analysis()?;
    tracing::info!(
        run_id = %run.run_id,
        containers = run.container_count,
        adjusted_teu = run.adjusted_teu,
        "分析完成"
    );

    // 汇集查询面输出
    let capacity_rows: Vec<serde_json::Value> = api
        .get_inbound_and_outbound_capacity_of_each_vehicle(&filter)?
        .into_iter()
        .map(|(vehicle, (inbound, outbound))| {
            serde_json::json!({
                "vehicle": vehicle.to_string(),
                "inbound_capacity_teu": inbound,
                "used_outbound_teu": outbound,
            })
        })
        .collect();

    let report = serde_json::json!({
        "run": run,
        "summary": api.get_summary()?,
        "inbound_capacity_of_vehicles": api.get_inbound_capacity_of_vehicles()?,
        "outbound_capacity_of_vehicles": api.get_outbound_capacity_of_vehicles()?,
        "inbound_and_outbound_capacity_of_each_vehicle": capacity_rows,
        "throughput_over_time": api.get_throughput_over_time()?,
        "throughput_statistics": api.get_throughput_statistics()?,
        "utilization_of_each_vehicle": api.get_utilization_of_each_vehicle(&filter)?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
