// ==========================================
// 商品目录批量导入 - 领域模型层
// ==========================================
// 职责: 定义字段目录、草稿商品、引用快照等纯数据结构
// 红线: 不含解析逻辑，不含 I/O
// ==========================================

pub mod draft;
pub mod field;
pub mod reference;
pub mod table;
pub mod types;

// 重导出核心类型
pub use draft::{
    AttributePair, DraftPatch, DraftProduct, DraftWarning, EntityReferenceOutcome, FieldValue,
    ReferenceResolution, WarningCode,
};
pub use field::{FieldDefinition, FieldDomain, MetaFieldDescriptor, MetaValueType};
pub use reference::{ReferenceEntity, ReferenceSnapshot};
pub use table::{ParsedTable, RawRow};
pub use types::{FileFormat, ReferenceKind};
