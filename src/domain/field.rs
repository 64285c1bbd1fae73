// ==========================================
// 商品目录批量导入 - 字段定义领域模型
// ==========================================
// 职责: 可导入目标字段的键 / 标签 / 值域
// 红线: 字段目录在会话期间只读
// ==========================================

use crate::domain::types::ReferenceKind;
use serde::{Deserialize, Serialize};

// ==========================================
// MetaValueType - 元字段取值类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaValueType {
    Text,   // 字符串
    Number, // 数值（含带单位的 mm/inch/pcs/box/feet）
}

impl MetaValueType {
    /// 由外部元字段描述的 fieldType 推断取值类型
    ///
    /// # 规则
    /// - None / "string" → Text
    /// - 其他（number, mm, inch, pcs, box, feet ...）→ Number
    pub fn from_field_type(field_type: Option<&str>) -> Self {
        match field_type.map(|t| t.trim().to_lowercase()) {
            None => MetaValueType::Text,
            Some(t) if t.is_empty() || t == "string" || t == "text" => MetaValueType::Text,
            Some(_) => MetaValueType::Number,
        }
    }
}

// ==========================================
// FieldDomain - 字段值域（带标签的联合类型）
// ==========================================
// 行转换按值域分派强制转换，不按字段逐个分支
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "kebab-case")]
pub enum FieldDomain {
    Text,
    Number,
    Boolean,
    JsonObject,
    CommaList,
    ImageUrlList,
    EntityReference {
        kind: ReferenceKind,
    },
    MetaScalar {
        slug: String,
        value_type: MetaValueType,
    },
}

// ==========================================
// FieldDefinition - 可导入字段定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,   // 稳定字段键（映射目标）
    pub label: String, // 显示标签
    #[serde(flatten)]
    pub domain: FieldDomain,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, domain: FieldDomain) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            domain,
        }
    }

    /// 元字段的外部 slug（非元字段为 None）
    pub fn meta_slug(&self) -> Option<&str> {
        match &self.domain {
            FieldDomain::MetaScalar { slug, .. } => Some(slug.as_str()),
            _ => None,
        }
    }

    /// 引用字段的实体种类（非引用字段为 None）
    pub fn reference_kind(&self) -> Option<ReferenceKind> {
        match &self.domain {
            FieldDomain::EntityReference { kind } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_meta(&self) -> bool {
        self.meta_slug().is_some()
    }
}

// ==========================================
// MetaFieldDescriptor - 外部元字段描述
// ==========================================
// 来源: 会话开始前由外部接口拉取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaFieldDescriptor {
    pub id: String,
    pub slug: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

impl MetaFieldDescriptor {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            label: label.into(),
            field_type: None,
        }
    }

    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn value_type(&self) -> MetaValueType {
        MetaValueType::from_field_type(self.field_type.as_deref())
    }
}
