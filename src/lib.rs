// ==========================================
// 商品目录批量导入 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + tokio
// 系统定位: 导入草稿生成（人工复核后由外部提交）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 解析 / 映射 / 转换 / 暂存
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FileFormat, ReferenceKind};

// 领域实体
pub use domain::{
    AttributePair, DraftPatch, DraftProduct, DraftWarning, EntityReferenceOutcome,
    FieldDefinition, FieldDomain, FieldValue, MetaFieldDescriptor, MetaValueType, ParsedTable,
    RawRow, ReferenceEntity, ReferenceResolution, ReferenceSnapshot, WarningCode,
};

// 导入管道
pub use importer::{
    FieldCatalog, ImportError, ImportResult, ImportSession, ImportSummary, MappingSession,
    ReferenceSource, RowTransformer, SessionStage, StagingStore, UniversalFileParser,
};

// 配置
pub use config::ImportConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品目录批量导入";
