// ==========================================
// 商品目录批量导入 - 解析后的表格
// ==========================================
// 用途: 表格解析器输出（表头 + 原始行），格式无关
// 红线: 单元格一律为字符串，类型转换在行转换阶段完成
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub line: usize,        // 源文件行号（1 起）
    pub cells: Vec<String>, // 按列位置对齐表头，可能短于表头
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// 读取指定列；缺失的尾部单元格视为空字符串
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// 是否所有单元格均为空或空白
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

// ==========================================
// ParsedTable - 表头 + 数据行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// 表头所在列（重复表头取最右一列）
    pub fn column_of(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers.iter().rposition(|h| h.trim() == wanted)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
