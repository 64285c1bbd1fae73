// ==========================================
// 商品目录批量导入 - 导入配置
// ==========================================
// 职责: 强制转换常量、占位符、CSV 分隔符、语言
// 存储: JSON 文件（缺省字段取默认值）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// 默认值
pub const DEFAULT_MAX_IMAGES: usize = 5;
pub const DEFAULT_MISSING_NAME: &str = "[Missing Name]";
pub const DEFAULT_MISSING_CODE: &str = "[Missing Code]";
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// ImportConfig - 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportConfig {
    pub max_images: usize,                // 每个商品最多保留的图片数
    pub truthy_tokens: Vec<String>,       // 布尔真值词表（小写比较）
    pub missing_name_placeholder: String, // 缺失名称占位符
    pub missing_code_placeholder: String, // 缺失编码占位符
    pub csv_delimiter: char,              // CSV 分隔符（ASCII）
    pub locale: String,                   // 警告消息语言（ImportSession::start 时生效）
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_images: DEFAULT_MAX_IMAGES,
            truthy_tokens: ["true", "1", "yes", "y"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            missing_name_placeholder: DEFAULT_MISSING_NAME.to_string(),
            missing_code_placeholder: DEFAULT_MISSING_CODE.to_string(),
            csv_delimiter: ',',
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ImportConfig {
    /// 从 JSON 字符串加载（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let config: ImportConfig =
            serde_json::from_str(raw).map_err(|e| ImportError::ConfigValueError {
                key: "<root>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if self.max_images == 0 {
            return Err(ImportError::ConfigValueError {
                key: "maxImages".to_string(),
                message: "必须 >= 1".to_string(),
            });
        }

        if self.truthy_tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(ImportError::ConfigValueError {
                key: "truthyTokens".to_string(),
                message: "至少需要一个真值词".to_string(),
            });
        }

        if !self.csv_delimiter.is_ascii() {
            return Err(ImportError::ConfigValueError {
                key: "csvDelimiter".to_string(),
                message: format!("必须为 ASCII 字符: {}", self.csv_delimiter),
            });
        }

        Ok(())
    }

    /// CSV 分隔符字节
    pub fn delimiter_byte(&self) -> u8 {
        // validate() 保证为 ASCII
        self.csv_delimiter as u8
    }

    /// 布尔真值判定（TRIM + 小写）
    pub fn is_truthy(&self, value: &str) -> bool {
        let normalized = value.trim().to_lowercase();
        self.truthy_tokens
            .iter()
            .any(|t| t.trim().to_lowercase() == normalized)
    }
}
