// ==========================================
// 商品目录批量导入 - 通用枚举类型
// ==========================================
// 职责: 文件格式 / 引用实体种类
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// FileFormat - 上传文件格式
// ==========================================
// 由外部上传组件判定；核心只按判定结果解码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    DelimitedText, // 分隔文本（CSV）
    Spreadsheet,   // 电子表格（xlsx/xls/ods）
}

impl FileFormat {
    /// 按文件扩展名推断格式（大小写不敏感）
    ///
    /// # 返回
    /// - Some(FileFormat): 支持的扩展名
    /// - None: 不支持
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Some(FileFormat::DelimitedText),
            "xlsx" | "xls" | "xlsm" | "ods" => Some(FileFormat::Spreadsheet),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::DelimitedText => write!(f, "csv"),
            FileFormat::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

// ==========================================
// ReferenceKind - 按名称引用的实体种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Category,       // 分类
    Brand,          // 品牌
    Vendor,         // 供应商
    ParentCategory, // 品牌父分类（只透传名称，不解析 id）
}

impl ReferenceKind {
    /// 是否需要对照快照解析为 id
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, ReferenceKind::ParentCategory)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Category => "category",
            ReferenceKind::Brand => "brand",
            ReferenceKind::Vendor => "vendor",
            ReferenceKind::ParentCategory => "parent_category",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
