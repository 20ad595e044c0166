// ==========================================
// 小区性能统计工具 - Excel 输出
// ==========================================
// 工作表 "统计结果"：首行冻结、表头加粗
// 日期列写为日期单元格，数值列写为数字单元格
// ==========================================

use crate::domain::{OutputColumn, OutputRow};
use crate::importer::error::ImportResult;
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

pub const SHEET_NAME: &str = "统计结果";

const TIME_COLUMN_WIDTH: f64 = 14.0;
const NETWORK_COLUMN_WIDTH: f64 = 12.0;
const NUMERIC_COLUMN_WIDTH: f64 = 16.0;

/// 生成 xlsx 文件内容
pub fn render_workbook(rows: &[OutputRow]) -> ImportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, column) in OutputColumn::ALL.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.name(), &header_format)?;
        let width = match column {
            OutputColumn::Time => TIME_COLUMN_WIDTH,
            OutputColumn::Network => NETWORK_COLUMN_WIDTH,
            OutputColumn::Measure(_) => NUMERIC_COLUMN_WIDTH,
        };
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, row) in rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        write_time_cell(worksheet, row_num, &row.time, &date_format)?;
        worksheet.write_string(row_num, 1, row.network.as_str())?;

        for (offset, value) in row.fields().iter().enumerate().skip(2) {
            let col = offset as u16;
            match value.parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    worksheet.write_number(row_num, col, number)?;
                }
                // 空值保持空单元格
                _ if value.is_empty() => {}
                _ => {
                    worksheet.write_string(row_num, col, *value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// 时间列：日期写为日期单元格，其它（空串 / 总计）写为文本
fn write_time_cell(
    worksheet: &mut Worksheet,
    row: u32,
    time: &str,
    date_format: &Format,
) -> ImportResult<()> {
    if time.is_empty() {
        return Ok(());
    }

    let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
        .ok()
        .and_then(|d| {
            ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8).ok()
        });
    match date {
        Some(date) => {
            worksheet.write_datetime_with_format(row, 0, &date, date_format)?;
        }
        None => {
            worksheet.write_string(row, 0, time)?;
        }
    }
    Ok(())
}
