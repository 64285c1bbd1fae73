// ==========================================
// 商品目录批量导入 - 配置层
// ==========================================
// 职责: 导入配置加载与校验
// 存储: JSON 文件（可选），缺省取内置默认值
// ==========================================

pub mod import_config;

// 重导出
pub use import_config::{
    ImportConfig, DEFAULT_LOCALE, DEFAULT_MAX_IMAGES, DEFAULT_MISSING_CODE, DEFAULT_MISSING_NAME,
};

use std::path::PathBuf;

/// 默认配置文件路径（<config_dir>/catalog-import/import_config.json）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("catalog-import").join("import_config.json"))
}
