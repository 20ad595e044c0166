// ==========================================
// Excel 输入/输出测试
// ==========================================
// 测试目标: xlsx 输入经 calamine 读取，结果写为 xlsx 并可读回
// ==========================================


use calamine::{open_workbook_auto, Data, Reader};
use cell_kpi_stats::config::AggregationOptions;
use cell_kpi_stats::importer::StatsPipelineImpl;
use cell_kpi_stats::logging;
use tempfile::TempDir;
use test_helpers::{simple_row, write_xlsx_input};

#[test]
fn test_xlsx_in_xlsx_out() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let rows = vec![
        simple_row("2024-03-01 08:00:00", "4G", "1.5", "10", "99"),
        simple_row("2024-03-01 09:00:00", "4G", "2.5", "20", "97"),
        simple_row("2024-03-02 08:00:00", "5G", "4", "30", "95"),
    ];
    let input = write_xlsx_input(dir.path(), "cells.xlsx", &rows);

    let pipeline = StatsPipelineImpl::new();
    let validation = pipeline.run_preview(&input);
    assert!(validation.required_columns_found);
    assert_eq!(validation.preview_rows.len(), 4);

    let options = AggregationOptions::default().with_grand_total(true);
    let result = pipeline.run_aggregation(&input, &options);
    assert!(result.success, "{:?}", result.message);
    assert_eq!(result.processed_rows, 3);

    let output = result.output_path.unwrap();
    assert_eq!(output, dir.path().join("cells-统计.xlsx"));

    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["统计结果".to_string()]);
    let range = workbook.worksheet_range("统计结果").unwrap();

    assert_eq!(range.height(), 4);
    assert_eq!(range.get((0, 0)), Some(&Data::String("时间".to_string())));
    assert_eq!(range.get((0, 2)), Some(&Data::String("总流量(GB)".to_string())));

    // 日期列为日期单元格
    match range.get((1, 0)) {
        Some(Data::DateTime(dt)) => {
            let date = dt.as_datetime().unwrap().date();
            assert_eq!(date.to_string(), "2024-03-01");
        }
        other => panic!("时间列应为日期单元格: {:?}", other),
    }
    assert_eq!(range.get((1, 1)), Some(&Data::String("4G".to_string())));
    assert_eq!(range.get((1, 2)), Some(&Data::Float(4.0)));
    assert_eq!(range.get((1, 8)), Some(&Data::Float(98.0)));

    // 总计行为文本
    assert_eq!(range.get((3, 0)), Some(&Data::String("总计".to_string())));
    assert_eq!(range.get((3, 3)), Some(&Data::Float(60.0)));
}

#[test]
fn test_xlsx_missing_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("partial.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "时间").unwrap();
    sheet.write_string(0, 1, "网络").unwrap();
    workbook.save(&input).unwrap();

    let validation = StatsPipelineImpl::new().run_preview(&input);
    assert!(!validation.required_columns_found);
    assert_eq!(validation.missing_columns.len(), 12);
}
