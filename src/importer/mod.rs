// ==========================================
// 商品目录批量导入 - 导入层
// ==========================================
// 职责: 表格文件 → 可复核的草稿商品
// 流程: 解析 → 字段目录 → 人工映射 → 行转换（强制转换 + 引用解析）→ 暂存
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod coercion;
pub mod error;
pub mod field_catalog;
pub mod file_parser;
pub mod import_session;
pub mod importer_trait;
pub mod mapping_session;
pub mod reference_resolver;
pub mod reference_source;
pub mod row_transformer;
pub mod staging_store;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_catalog::{core_fields, meta_field_key, FieldCatalog, CODE_FIELD, NAME_FIELD};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_session::{ImportSession, SessionStage};
pub use mapping_session::{Mapping, MappingSession};
pub use reference_resolver::ReferenceResolver;
pub use reference_source::{JsonFileReferenceSource, ReferenceDocument, StaticReferenceSource};
pub use row_transformer::RowTransformer;
pub use staging_store::{ImportSummary, StagingStore};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, ReferenceSource};
