// ==========================================
// AggregationApi 测试
// ==========================================
// 测试目标: 异步 API 与 JSON 结果契约
// ==========================================


use cell_kpi_stats::api::AggregationApi;
use cell_kpi_stats::config::{AggregationOptions, ConfigManager};
use cell_kpi_stats::logging;
use serde_json::Value;
use tempfile::TempDir;
use test_helpers::{simple_row, write_text_input};

#[tokio::test]
async fn test_preview_json_contract() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = write_text_input(
        dir.path(),
        "kpi.csv",
        '|',
        &[simple_row("2024-03-01", "4G", "1", "2", "99")],
    );

    let api = AggregationApi::new();
    let json = api.preview_json(path.to_str().unwrap()).await.unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["encoding"], "UTF-8");
    assert_eq!(value["delimiter"], "|");
    assert_eq!(value["requiredColumnsFound"], true);
    assert_eq!(value["missingColumns"].as_array().unwrap().len(), 0);
    assert_eq!(value["previewRows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_aggregate_json_contract() {
    let dir = TempDir::new().unwrap();
    let path = write_text_input(
        dir.path(),
        "kpi.csv",
        ',',
        &[
            simple_row("2024-03-01", "4G", "1", "2", "99"),
            simple_row("bad", "4G", "1", "2", "99"),
        ],
    );

    let api = AggregationApi::new();
    let json = api
        .aggregate_json(
            path.to_str().unwrap(),
            r#"{"includeDailySubtotalRows":true,"includeGrandTotalRow":true}"#,
        )
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["processedRows"], 2);
    assert_eq!(value["skippedRows"], 1);
    assert_eq!(value["invalidFieldStats"]["时间"], 1);
    assert!(value.get("errorCode").is_none());
    assert!(value["elapsedMs"].is_u64());

    let rows = value["resultRows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["时间"], "2024-03-01");
    assert_eq!(rows[1]["网络"], "4G");
    assert_eq!(rows[2]["时间"], "总计");
}

#[tokio::test]
async fn test_aggregate_with_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_text_input(
        dir.path(),
        "kpi.csv",
        ',',
        &[simple_row("2024-03-01", "4G", "1", "2", "99")],
    );
    let config = ConfigManager::new(dir.path().join("options.json"));
    config
        .save(&AggregationOptions::default().with_grand_total(true))
        .unwrap();

    let api = AggregationApi::new();
    let result = api
        .aggregate_with_config(path.to_str().unwrap(), &config)
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.result_rows.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_file_is_reported_not_raised() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let api = AggregationApi::new();

    let preview = api.preview(missing.to_str().unwrap()).await.unwrap();
    assert!(!preview.required_columns_found);
    assert_eq!(preview.missing_columns.len(), 14);

    let result = api
        .aggregate(missing.to_str().unwrap(), &AggregationOptions::default())
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(
        serde_json::to_value(&result).unwrap()["errorCode"],
        "FILE_NOT_FOUND"
    );
}
