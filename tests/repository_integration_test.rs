// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证完整的数据集读取 → 参数加载 → 分析 → 查询流程
// ==========================================


use std::sync::Arc;
use terminal_flow_analysis::api::{AnalysisApi, ApiError};
use terminal_flow_analysis::config::{config_keys, ConfigManager};
use terminal_flow_analysis::domain::types::{VehicleType, VehicleTypeFilter};
use terminal_flow_analysis::logging;
use terminal_flow_analysis::repository::{DatasetRepository, RepositoryError};

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_load_vehicle_instances_sorted_by_arrival() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");

    // 故意乱序插入,仓储必须按到港时间排序返回
    test_helpers::insert_test_vehicle(
        &conn,
        "FEEDER",
        "SVC-F01",
        "F01",
        "2021-07-09 08:00:00",
        "2021-07-09 18:00:00",
        120.0,
    )
    .unwrap();
    test_helpers::insert_test_vehicle(
        &conn,
        "TRAIN",
        "SVC-T01",
        "T01",
        "2021-07-08 06:00:00",
        "2021-07-08 18:00:00",
        90.0,
    )
    .unwrap();
    test_helpers::insert_test_vehicle(
        &conn,
        "DEEP_SEA_VESSEL",
        "SVC-D01",
        "D01",
        "2021-07-06 09:00:00",
        "2021-07-10 06:00:00",
        800.0,
    )
    .unwrap();
    drop(conn);

    let repository = DatasetRepository::new(db_path).expect("Failed to create repository");
    let instances = repository.load_vehicle_instances().unwrap();

    assert_eq!(instances.len(), 3);
    assert_eq!(instances[0].key.vehicle_name, "D01");
    assert_eq!(instances[1].key.vehicle_name, "T01");
    assert_eq!(instances[2].key.vehicle_name, "F01");

    // 字段解析校验
    assert_eq!(instances[0].key.vehicle_type, VehicleType::DeepSeaVessel);
    assert_eq!(instances[0].key.service_name, "SVC-D01");
    assert!((instances[0].inbound_capacity_teu - 800.0).abs() < 1e-9);
    assert_eq!(
        instances[0].arrival.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2021-07-06 09:00:00"
    );
    assert!(instances[0].departure > instances[0].arrival);
}

#[test]
fn test_load_containers_with_teu_factor() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");

    test_helpers::insert_test_container(
        &conn,
        "C-45",
        45,
        "DEEP_SEA_VESSEL",
        "SVC-D01",
        "D01",
        "2021-07-06 09:00:00",
        "TRAIN",
    )
    .unwrap();
    test_helpers::insert_test_container(
        &conn,
        "C-20",
        20,
        "TRAIN",
        "SVC-T01",
        "T01",
        "2021-07-08 06:00:00",
        "FEEDER",
    )
    .unwrap();
    test_helpers::insert_test_container(
        &conn,
        "C-40",
        40,
        "TRAIN",
        "SVC-T01",
        "T01",
        "2021-07-08 06:00:00",
        "FEEDER",
    )
    .unwrap();
    drop(conn);

    let repository = DatasetRepository::new(db_path).expect("Failed to create repository");
    let containers = repository.load_containers().unwrap();

    // 按 (进港时刻, 箱号) 排序: C-45 最早,同刻的 C-20 < C-40
    assert_eq!(containers.len(), 3);
    assert_eq!(containers[0].container_id, "C-45");
    assert_eq!(containers[1].container_id, "C-20");
    assert_eq!(containers[2].container_id, "C-40");

    // 箱长折算标准箱系数
    assert!((containers[0].teu_factor - 2.25).abs() < 1e-9);
    assert!((containers[1].teu_factor - 1.0).abs() < 1e-9);
    assert!((containers[2].teu_factor - 2.0).abs() < 1e-9);

    // 进港工具标识
    assert_eq!(
        containers[0].inbound_vehicle.vehicle_type,
        VehicleType::DeepSeaVessel
    );
    assert_eq!(containers[0].inbound_vehicle.vehicle_name, "D01");
    assert_eq!(containers[0].planned_outbound_type, VehicleType::Train);
}

#[test]
fn test_missing_dataset_table_is_structural_error() {
    // 空数据库文件: 任何数据集表都不存在
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let repository = DatasetRepository::new(db_path).expect("Failed to create repository");

    let vehicle_result = repository.load_vehicle_instances();
    assert!(matches!(
        vehicle_result,
        Err(RepositoryError::MissingTable(ref table)) if table == "vehicle_instance"
    ));

    let container_result = repository.load_containers();
    assert!(matches!(
        container_result,
        Err(RepositoryError::MissingTable(ref table)) if table == "container"
    ));
}

#[test]
fn test_invalid_vehicle_type_is_field_value_error() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");

    test_helpers::insert_test_vehicle(
        &conn,
        "SPACESHIP",
        "SVC-X01",
        "X01",
        "2021-07-08 06:00:00",
        "2021-07-08 18:00:00",
        100.0,
    )
    .unwrap();
    drop(conn);

    let repository = DatasetRepository::new(db_path).expect("Failed to create repository");
    let result = repository.load_vehicle_instances();

    assert!(matches!(
        result,
        Err(RepositoryError::FieldValueError { ref field, .. }) if field == "vehicle_type"
    ));
}

#[test]
fn test_config_manager_defaults_and_overrides() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");

    // 生成端写入部分流量属性;train 的值故意写坏
    test_helpers::insert_test_property(&conn, config_keys::TRANSPORTATION_BUFFER, "0.1").unwrap();
    test_helpers::insert_test_property(&conn, config_keys::FEEDER_MAX_DWELL_HOURS, "100").unwrap();
    test_helpers::insert_test_property(&conn, config_keys::TRAIN_MAX_DWELL_HOURS, "abc").unwrap();
    drop(conn);

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create config manager");
    let config = config_manager.load_analysis_config().unwrap();

    // 显式覆盖的键
    assert!((config.transportation_buffer - 0.1).abs() < 1e-9);
    assert_eq!(config.feeder_max_dwell_hours, 100);

    // 坏值与缺失键回落默认值
    assert_eq!(config.train_max_dwell_hours, 72);
    assert_eq!(config.deep_sea_vessel_max_dwell_hours, 240);
    assert_eq!(config.barge_max_dwell_hours, 120);
    assert_eq!(config.truck_pickup_lead_hours, 24);
}

#[test]
fn test_config_manager_without_properties_table_uses_defaults() {
    // 旧数据集没有 flow_properties 表,必须全默认值可分析
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create config manager");
    let config = config_manager.load_analysis_config().unwrap();

    assert!((config.transportation_buffer - 0.2).abs() < 1e-9);
    assert_eq!(config.feeder_max_dwell_hours, 168);
}

// ==========================================
// 端到端: 数据集 → 分析 → 查询面
// ==========================================
#[test]
fn test_full_analysis_flow_via_api() {
    // 初始化日志系统
    logging::init_test();

    println!("\n=== 测试：完整分析流程 ===");

    // 步骤 1: 创建测试数据集
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    println!("✓ 步骤 1: 测试数据集已创建");

    // 步骤 2: 写入挂靠档、箱流与流量属性
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    test_helpers::insert_test_vehicle(
        &conn,
        "TRAIN",
        "SVC-T-IN-EARLY",
        "T-IN-EARLY",
        "2021-06-28 06:00:00",
        "2021-06-28 18:00:00",
        10.0,
    )
    .unwrap();
    test_helpers::insert_test_vehicle(
        &conn,
        "TRAIN",
        "SVC-T-IN-LATE",
        "T-IN-LATE",
        "2021-07-08 06:00:00",
        "2021-07-08 18:00:00",
        10.0,
    )
    .unwrap();
    test_helpers::insert_test_vehicle(
        &conn,
        "FEEDER",
        "SVC-F01",
        "F01",
        "2021-07-09 08:00:00",
        "2021-07-09 18:00:00",
        4.0,
    )
    .unwrap();
    test_helpers::insert_test_vehicle(
        &conn,
        "BARGE",
        "SVC-B01",
        "B01",
        "2021-06-30 02:00:00",
        "2021-06-30 10:00:00",
        6.0,
    )
    .unwrap();

    test_helpers::insert_test_container(
        &conn,
        "C1",
        40,
        "TRAIN",
        "SVC-T-IN-LATE",
        "T-IN-LATE",
        "2021-07-08 06:00:00",
        "FEEDER",
    )
    .unwrap();
    test_helpers::insert_test_container(
        &conn,
        "C2",
        40,
        "TRAIN",
        "SVC-T-IN-LATE",
        "T-IN-LATE",
        "2021-07-08 06:00:00",
        "FEEDER",
    )
    .unwrap();
    test_helpers::insert_test_container(
        &conn,
        "C3",
        40,
        "TRAIN",
        "SVC-T-IN-EARLY",
        "T-IN-EARLY",
        "2021-06-28 06:00:00",
        "FEEDER",
    )
    .unwrap();

    test_helpers::insert_test_property(&conn, config_keys::TRANSPORTATION_BUFFER, "0.1").unwrap();
    drop(conn);
    println!("✓ 步骤 2: 4 挂靠档 + 3 箱 + 流量属性已写入");

    // 步骤 3: 初始化仓储与配置管理器 (共享同一连接)
    let repository =
        Arc::new(DatasetRepository::new(db_path).expect("Failed to create repository"));
    let config_manager = ConfigManager::from_connection(repository.connection())
        .expect("Failed to create config manager");
    let config = config_manager.load_analysis_config().unwrap();
    assert!((config.transportation_buffer - 0.1).abs() < 1e-9);
    println!("✓ 步骤 3: 数据集参数加载完成 (缓冲 0.1)");

    // 步骤 4: 批次执行前查询必须显式报错
    let mut api = AnalysisApi::new(Arc::clone(&repository), config);
    let premature = api.get_summary();
    assert!(matches!(premature, Err(ApiError::AnalysisNotRun(_))));
    println!("✓ 步骤 4: 批次前查询被拒绝");

    // 步骤 5: 执行分析批次
    let run_summary = api.run_analysis().expect("分析应该成功");
    assert_eq!(run_summary.vehicle_count, 4);
    assert_eq!(run_summary.container_count, 3);
    assert!((run_summary.total_teu - 6.0).abs() < 1e-9);
    assert!((run_summary.unchanged_teu - 4.0).abs() < 1e-9);
    assert!((run_summary.adjusted_teu - 2.0).abs() < 1e-9);
    println!("✓ 步骤 5: 分析完成, run_id={}", run_summary.run_id);

    // 步骤 6: 改配汇总 (C3 堆存超限改配驳船)
    let tally = api.get_summary().unwrap();
    assert!((tally.unchanged - 4.0).abs() < 1e-9);
    assert!((tally.barge - 2.0).abs() < 1e-9);
    assert!((tally.total() - 6.0).abs() < 1e-9);
    println!("✓ 步骤 6: 改配汇总正确");

    // 步骤 7: 逐类型进出港箱量
    let inbound = api.get_inbound_capacity_of_vehicles().unwrap();
    assert_eq!(inbound.len(), 5, "逐类型视图必须覆盖全部五种类型");
    assert!((inbound[&VehicleType::Train] - 6.0).abs() < 1e-9);
    assert!((inbound[&VehicleType::Feeder] - 0.0).abs() < 1e-9);

    let outbound = api.get_outbound_capacity_of_vehicles().unwrap();
    assert!((outbound.actual[&VehicleType::Feeder] - 4.0).abs() < 1e-9);
    assert!((outbound.maximum[&VehicleType::Feeder] - 4.4).abs() < 1e-9);
    assert!((outbound.actual[&VehicleType::Barge] - 2.0).abs() < 1e-9);
    println!("✓ 步骤 7: 逐类型运力视图正确");

    // 步骤 8: 逐实例视图 (固定进港运力, 已用出港箱量)
    let per_vehicle = api
        .get_inbound_and_outbound_capacity_of_each_vehicle(&VehicleTypeFilter::All)
        .unwrap();
    let f01 = per_vehicle
        .iter()
        .find(|(key, _)| key.vehicle_name == "F01")
        .map(|(_, v)| *v)
        .unwrap();
    assert!((f01.0 - 4.0).abs() < 1e-9);
    assert!((f01.1 - 4.0).abs() < 1e-9);
    println!("✓ 步骤 8: 逐实例视图正确");

    // 步骤 9: 岸侧吞吐 (只有支线船装船: C1 + C2 于 2021-07-09)
    let series = api.get_throughput_over_time().unwrap();
    assert_eq!(series.len(), 1);
    let stats = api.get_throughput_statistics().unwrap();
    assert_eq!(stats.maximum_weekly, 2);
    assert!(!stats.std_dev_is_defined(), "单周样本标准差不可用");
    println!("✓ 步骤 9: 岸侧吞吐正确");

    // 步骤 10: 利用率查询
    let utilization = api
        .get_utilization_of_each_vehicle(&VehicleTypeFilter::One(VehicleType::Feeder))
        .unwrap();
    assert_eq!(utilization.len(), 1);
    assert_eq!(utilization[0].ratio, Some(1.0));
    assert!(!utilization[0].over_buffer);
    println!("✓ 步骤 10: 利用率查询正确");

    // 步骤 11: 更新运输缓冲,派生值重算 (已提交箱量不回滚)
    api.update_transportation_buffer(0.5).unwrap();
    assert!((api.transportation_buffer() - 0.5).abs() < 1e-9);
    let outbound = api.get_outbound_capacity_of_vehicles().unwrap();
    assert!((outbound.maximum[&VehicleType::Feeder] - 6.0).abs() < 1e-9);
    assert!((outbound.actual[&VehicleType::Feeder] - 4.0).abs() < 1e-9);

    let invalid = api.update_transportation_buffer(-0.1);
    assert!(matches!(invalid, Err(ApiError::InvalidInput(_))));
    println!("✓ 步骤 11: 运输缓冲更新生效");

    println!("=== 测试通过 ===\n");
}
