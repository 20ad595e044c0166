// ==========================================
// 小区性能统计工具 - 文件解析器实现
// ==========================================
// 支持: 分隔文本（CSV/TSV 等，任意编码） / Excel (.xlsx/.xls/.ods)
// 两个阶段:
//   preview   - 有界前缀，识别编码/分隔符并校验表头
//   open_rows - 全量流式行游标（第 0 行为表头）
// ==========================================

use crate::config::limits::PREVIEW_MAX_ROWS;
use crate::domain::{Delimiter, InputFormat, ValidationResult};
use crate::importer::delimiter_detector::detect_delimiter;
use crate::importer::encoding_detector::{
    decode_sample, detect_encoding, read_prefix, DetectedEncoding,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_validator::get_missing_columns;
use crate::importer::stats_pipeline_trait::{FileParser, RowStream};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use encoding_rs::UTF_8;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// 解析期得到的文件方言（编码 + 分隔符）
#[derive(Debug, Clone, Copy)]
pub struct FileDialect {
    pub encoding: DetectedEncoding,
    pub delimiter: Delimiter,
}

impl FileDialect {
    /// 电子表格不涉及编码/分隔符，使用默认值
    pub fn spreadsheet() -> Self {
        Self {
            encoding: DetectedEncoding {
                encoding: UTF_8,
                has_bom: false,
            },
            delimiter: Delimiter::Comma,
        }
    }
}

/// 根据预览结果还原方言
pub fn dialect_of(result: &ValidationResult) -> ImportResult<FileDialect> {
    let encoding = encoding_rs::Encoding::for_label(result.encoding.as_bytes())
        .ok_or_else(|| ImportError::EncodingError(result.encoding.clone()))?;
    Ok(FileDialect {
        encoding: DetectedEncoding {
            encoding,
            has_bom: result.has_bom,
        },
        delimiter: result.delimiter,
    })
}

fn build_validation(
    dialect: &FileDialect,
    preview_rows: Vec<Vec<String>>,
) -> ValidationResult {
    let missing_columns = match preview_rows.first() {
        Some(header) => get_missing_columns(header),
        None => get_missing_columns::<String>(&[]),
    };

    ValidationResult {
        encoding: dialect.encoding.name().to_string(),
        delimiter: dialect.delimiter,
        has_bom: dialect.encoding.has_bom,
        preview_rows,
        required_columns_found: missing_columns.is_empty(),
        missing_columns,
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 识别编码与分隔符（不解析行）
    pub fn detect_dialect(&self, path: &Path) -> ImportResult<(FileDialect, String)> {
        let prefix = read_prefix(path)?;
        let encoding = detect_encoding(&prefix);
        let sample_text = decode_sample(&prefix, &encoding);
        let delimiter = detect_delimiter(&sample_text);

        info!(
            encoding = encoding.name(),
            has_bom = encoding.has_bom,
            delimiter = %delimiter,
            "编码与分隔符识别完成"
        );
        Ok((FileDialect { encoding, delimiter }, sample_text))
    }
}

impl FileParser for CsvParser {
    fn preview(&self, path: &Path) -> ImportResult<ValidationResult> {
        let (dialect, sample_text) = self.detect_dialect(path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(dialect.delimiter.as_byte())
            .from_reader(sample_text.as_bytes());

        let mut preview_rows = Vec::new();
        for result in reader.records().take(PREVIEW_MAX_ROWS + 1) {
            let record = result?;
            preview_rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(rows = preview_rows.len(), "预览行解析完成");
        Ok(build_validation(&dialect, preview_rows))
    }

    fn open_rows(&self, path: &Path, dialect: &FileDialect) -> ImportResult<RowStream> {
        let file = File::open(path)?;
        let transcoded = DecodeReaderBytesBuilder::new()
            .encoding(Some(dialect.encoding.encoding))
            .build(file);

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(dialect.delimiter.as_byte())
            .from_reader(transcoded);

        let rows = reader.into_records().map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(ImportError::from)
        });
        Ok(Box::new(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 读取第一个工作表
    fn first_sheet(&self, path: &Path) -> ImportResult<Range<Data>> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        debug!(sheet = %sheet_name, height = range.height(), width = range.width(), "工作表读取完成");
        Ok(range)
    }
}

impl FileParser for ExcelParser {
    fn preview(&self, path: &Path) -> ImportResult<ValidationResult> {
        let range = self.first_sheet(path)?;
        let preview_rows: Vec<Vec<String>> = SheetRows::new(range)
            .take(PREVIEW_MAX_ROWS + 1)
            .collect();

        Ok(build_validation(&FileDialect::spreadsheet(), preview_rows))
    }

    fn open_rows(&self, path: &Path, _dialect: &FileDialect) -> ImportResult<RowStream> {
        let range = self.first_sheet(path)?;
        Ok(Box::new(SheetRows::new(range).map(Ok)))
    }
}

/// 工作表行游标（按行转换为文本）
struct SheetRows {
    range: Range<Data>,
    next_row: usize,
}

impl SheetRows {
    fn new(range: Range<Data>) -> Self {
        Self { range, next_row: 0 }
    }
}

impl Iterator for SheetRows {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.range.height() {
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;

        let cells = (0..self.range.width())
            .map(|col| {
                self.range
                    .get((row, col))
                    .map(cell_to_string)
                    .unwrap_or_default()
            })
            .collect();
        Some(cells)
    }
}

/// 单元格转文本（日期单元格输出 YYYY-MM-DD HH:MM:SS）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parser_for(path: &Path) -> Box<dyn FileParser> {
        match InputFormat::from_path(path) {
            InputFormat::Spreadsheet => Box::new(ExcelParser),
            InputFormat::Delimited => Box::new(CsvParser),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn preview(&self, path: &Path) -> ImportResult<ValidationResult> {
        Self::parser_for(path).preview(path)
    }

    fn open_rows(&self, path: &Path, dialect: &FileDialect) -> ImportResult<RowStream> {
        Self::parser_for(path).open_rows(path, dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequiredColumn;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header_line(delimiter: char) -> String {
        RequiredColumn::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(&delimiter.to_string())
    }

    #[test]
    fn test_csv_preview_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", header_line(';')).unwrap();
        writeln!(temp_file, "2024-03-01 00:00;460-1;4G;\"A;B\";1;2;3;4;5;6;7;8;9;10").unwrap();

        let result = CsvParser.preview(temp_file.path()).unwrap();

        assert_eq!(result.delimiter, Delimiter::Semicolon);
        assert_eq!(result.encoding, "UTF-8");
        assert!(result.required_columns_found);
        assert_eq!(result.preview_rows.len(), 2);
        // 引号内分隔符不切分
        assert_eq!(result.preview_rows[1][3], "A;B");
    }

    #[test]
    fn test_csv_preview_limits_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", header_line(',')).unwrap();
        for _ in 0..300 {
            writeln!(temp_file, "2024-03-01,1,4G,a,1,2,3,4,5,6,7,8,9,10").unwrap();
        }

        let result = CsvParser.preview(temp_file.path()).unwrap();
        assert_eq!(result.preview_rows.len(), PREVIEW_MAX_ROWS + 1);
    }

    #[test]
    fn test_csv_open_rows_streams_gb18030() {
        let text = format!("{}\n2024-03-01,1,移动4G,朝阳,1,2,3,4,5,6,7,8,9,10\n", header_line(','));
        let (bytes, _, _) = encoding_rs::GB18030.encode(&text);
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&bytes).unwrap();

        let dialect = FileDialect {
            encoding: DetectedEncoding {
                encoding: encoding_rs::GB18030,
                has_bom: false,
            },
            delimiter: Delimiter::Comma,
        };
        let rows: Vec<Vec<String>> = CsvParser
            .open_rows(temp_file.path(), &dialect)
            .unwrap()
            .collect::<ImportResult<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "时间");
        assert_eq!(rows[1][2], "移动4G");
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String(" 4G ".into())), "4G");
    }

    #[test]
    fn test_universal_parser_dispatch_by_extension() {
        let mut temp_file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(temp_file, "a|b").unwrap();
        writeln!(temp_file, "1|2").unwrap();

        let result = UniversalFileParser.preview(temp_file.path()).unwrap();
        assert_eq!(result.delimiter, Delimiter::Pipe);
        assert!(!result.required_columns_found);
        assert_eq!(result.missing_columns.len(), 14);
    }
}
