// ==========================================
// 商品目录批量导入 - 文件解析器实现
// ==========================================
// 阶段 0: 文件字节 → 表头 + 原始行
// 支持: CSV (分隔文本) / Excel (.xlsx/.xls/.ods，仅第一个工作表)
// ==========================================

use crate::config::ImportConfig;
use crate::domain::table::{ParsedTable, RawRow};
use crate::domain::types::FileFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use chrono::{NaiveDateTime, Timelike};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<ParsedTable> {
        // Excel 导出的 CSV 常带 BOM
        let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(self.delimiter)
            .from_reader(payload);

        let mut records = reader.records();

        // 读取表头（第一条记录）
        let header_record = match records.next() {
            Some(result) => result?,
            None => return Err(ImportError::MissingHeaderRow),
        };
        let headers: Vec<String> = header_record.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeaderRow);
        }

        // 读取数据行
        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in records {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(rows.len() + skipped + 2);
            let row = RawRow::new(line, record.iter().map(|c| c.to_string()).collect());

            // 跳过完全空白的行
            if row.is_blank() {
                skipped += 1;
                continue;
            }

            rows.push(row);
        }

        debug!(
            headers = headers.len(),
            rows = rows.len(),
            skipped = skipped,
            "CSV 解析完成"
        );
        Ok(ParsedTable::new(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<ParsedTable> {
        let cursor = Cursor::new(payload.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)?;

        // 只读第一个工作表
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))??;

        // 区域可能不从 A1 开始，行号按区域起点换算
        let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let mut sheet_rows = range.rows().enumerate();

        // 提取表头（第一行）
        let headers: Vec<String> = match sheet_rows.next() {
            Some((_, header_row)) => header_row
                .iter()
                .map(|cell| cell_to_string(cell).trim().to_string())
                .collect(),
            None => return Err(ImportError::MissingHeaderRow),
        };
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeaderRow);
        }

        // 读取数据行
        let mut rows = Vec::new();
        for (offset, data_row) in sheet_rows {
            let row = RawRow::new(
                start_row + offset + 1,
                data_row.iter().map(cell_to_string).collect(),
            );

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        debug!(headers = headers.len(), rows = rows.len(), "Excel 解析完成");
        Ok(ParsedTable::new(headers, rows))
    }
}

/// 单元格统一转为字符串（数值 / 日期在此仅做字符串化）
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ==========================================
// 通用文件解析器（按格式分派）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置创建（CSV 分隔符）
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            csv: CsvParser::with_delimiter(config.delimiter_byte()),
            excel: ExcelParser,
        }
    }

    /// 按外部判定的格式解析文件字节
    pub fn parse_bytes(&self, payload: &[u8], format: FileFormat) -> ImportResult<ParsedTable> {
        let table = match format {
            FileFormat::DelimitedText => self.csv.parse_bytes(payload)?,
            FileFormat::Spreadsheet => self.excel.parse_bytes(payload)?,
        };

        info!(
            format = %format,
            headers = table.headers.len(),
            rows = table.rows.len(),
            "文件解析完成"
        );
        Ok(table)
    }

    /// 读取磁盘文件并按扩展名推断格式
    pub fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedTable> {
        let path = file_path.as_ref();
        let file_name = path.to_string_lossy();
        let format = FileFormat::from_file_name(&file_name).ok_or_else(|| {
            ImportError::UnsupportedFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )
        })?;

        self.parse_path_as(path, format)
    }

    /// 读取磁盘文件并按指定格式解析
    pub fn parse_path_as<P: AsRef<Path>>(
        &self,
        file_path: P,
        format: FileFormat,
    ) -> ImportResult<ParsedTable> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let payload = std::fs::read(path)?;
        self.parse_bytes(&payload, format)
    }
}
