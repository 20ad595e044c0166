// ==========================================
// 小区性能统计工具 - 结果输出层
// ==========================================
// 职责: 选择不冲突的输出路径并写出统计结果
// 分隔文本: 沿用输入的编码、BOM 与分隔符
// 电子表格: 一律输出 .xlsx
// ==========================================

pub mod delimited_writer;
pub mod output_path;
pub mod xlsx_writer;

pub use delimited_writer::{write_delimited, TranscodingWriter};
pub use output_path::choose_output_path;
pub use xlsx_writer::render_workbook;

use crate::domain::{InputFormat, OutputRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::FileDialect;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 写出统计结果，返回实际写入的路径
///
/// 文件以 create_new 打开；写入中途失败时删除残留文件
pub fn write_output(
    input_path: &Path,
    format: InputFormat,
    dialect: &FileDialect,
    rows: &[OutputRow],
) -> ImportResult<PathBuf> {
    let output_path = match format {
        InputFormat::Delimited => choose_output_path(input_path, None)?,
        InputFormat::Spreadsheet => choose_output_path(input_path, Some("xlsx"))?,
    };

    write_new_file(&output_path, |file| match format {
        InputFormat::Delimited => write_text(file, dialect, rows),
        InputFormat::Spreadsheet => write_xlsx(file, rows),
    })?;

    info!(path = %output_path.display(), rows = rows.len(), "结果文件写出完成");
    Ok(output_path)
}

/// 以 create_new 打开目标文件并写入；写入失败时删除残留文件
fn write_new_file<F>(path: &Path, write: F) -> ImportResult<()>
where
    F: FnOnce(File) -> ImportResult<()>,
{
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| ImportError::WriteError(format!("{}: {}", path.display(), e)))?;

    if let Err(err) = write(file) {
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "残留输出文件删除失败");
        }
        return Err(err);
    }
    Ok(())
}

fn write_text(file: File, dialect: &FileDialect, rows: &[OutputRow]) -> ImportResult<()> {
    let mut sink = write_delimited(
        BufWriter::new(file),
        rows,
        dialect.delimiter,
        dialect.encoding.encoding,
        dialect.encoding.has_bom,
    )?;
    sink.flush()
        .map_err(|e| ImportError::WriteError(e.to_string()))
}

fn write_xlsx(mut file: File, rows: &[OutputRow]) -> ImportResult<()> {
    let bytes = render_workbook(rows)?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|e| ImportError::WriteError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Delimiter;
    use crate::importer::encoding_detector::DetectedEncoding;
    use tempfile::TempDir;

    fn dialect(encoding: &'static encoding_rs::Encoding, has_bom: bool) -> FileDialect {
        FileDialect {
            encoding: DetectedEncoding { encoding, has_bom },
            delimiter: Delimiter::Tab,
        }
    }

    #[test]
    fn test_write_output_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("kpi.csv");
        fs::write(dir.path().join("kpi-统计.csv"), "keep").unwrap();

        let rows = vec![OutputRow::new("2024-03-01", "4G")];
        let path = write_output(&input, InputFormat::Delimited, &dialect(encoding_rs::UTF_8, false), &rows)
            .unwrap();

        assert_eq!(path, dir.path().join("kpi-统计(1).csv"));
        assert_eq!(fs::read_to_string(dir.path().join("kpi-统计.csv")).unwrap(), "keep");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("时间\t网络\t"));
    }

    #[test]
    fn test_write_output_reemits_utf8_bom() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("kpi.csv");
        let path = write_output(&input, InputFormat::Delimited, &dialect(encoding_rs::UTF_8, true), &[])
            .unwrap();
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kpi-统计.csv");

        let err = write_new_file(&path, |mut file| {
            file.write_all("时间,网络\n".as_bytes())
                .map_err(|e| ImportError::WriteError(e.to_string()))?;
            Err(ImportError::WriteError("磁盘已满".to_string()))
        })
        .unwrap_err();

        assert_eq!(err.error_code(), crate::domain::ErrorCode::WriteFailed);
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_target_is_not_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kpi-统计.csv");
        fs::write(&path, "keep").unwrap();

        let err = write_new_file(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(err, ImportError::WriteError(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[test]
    fn test_spreadsheet_output_uses_xlsx_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("kpi.xls");
        let path = write_output(&input, InputFormat::Spreadsheet, &FileDialect::spreadsheet(), &[])
            .unwrap();
        assert_eq!(path, dir.path().join("kpi-统计.xlsx"));
        assert!(fs::metadata(path).unwrap().len() > 0);
    }
}
