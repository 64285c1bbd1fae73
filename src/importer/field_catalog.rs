// ==========================================
// 商品目录批量导入 - 字段目录
// ==========================================
// 职责: 核心字段（静态）+ 元字段（外部描述驱动）组成的只读注册表
// 红线: 会话开始时组装一次，会话期间不变
// ==========================================

use crate::domain::field::{FieldDefinition, FieldDomain, MetaFieldDescriptor};
use crate::domain::types::ReferenceKind;
use std::collections::HashMap;
use tracing::warn;

// 核心字段键
pub const NAME_FIELD: &str = "name";
pub const CODE_FIELD: &str = "product_code";
pub const META_FIELD_PREFIX: &str = "meta_";

/// 静态核心字段集
pub fn core_fields() -> Vec<FieldDefinition> {
    use FieldDomain::*;

    vec![
        FieldDefinition::new(NAME_FIELD, "Product Name", Text),
        FieldDefinition::new(CODE_FIELD, "Product Code", Text),
        FieldDefinition::new("description", "Description", Text),
        FieldDefinition::new("quantity", "Quantity", Number),
        FieldDefinition::new("alert_quantity", "Low Stock Alert", Number),
        FieldDefinition::new("tax", "Tax (%)", Number),
        FieldDefinition::new("status", "Status", Text),
        FieldDefinition::new("isFeatured", "Featured", Boolean),
        FieldDefinition::new("discountType", "Discount Type", Text),
        FieldDefinition::new(
            "category",
            "Category (by name)",
            EntityReference {
                kind: ReferenceKind::Category,
            },
        ),
        FieldDefinition::new(
            "brand",
            "Brand (by name)",
            EntityReference {
                kind: ReferenceKind::Brand,
            },
        ),
        FieldDefinition::new(
            "vendor",
            "Vendor (by name)",
            EntityReference {
                kind: ReferenceKind::Vendor,
            },
        ),
        FieldDefinition::new(
            "brand_parentcategories",
            "Parent Category (by name)",
            EntityReference {
                kind: ReferenceKind::ParentCategory,
            },
        ),
        FieldDefinition::new("isMaster", "Is Master Product", Boolean),
        FieldDefinition::new("masterProductName", "Master Product Name", Text),
        FieldDefinition::new("variantAttributes", "Variant Attributes (JSON)", JsonObject),
        FieldDefinition::new("keywords", "Keywords (comma-separated)", CommaList),
        FieldDefinition::new("images", "Images (comma-separated URLs)", ImageUrlList),
    ]
}

/// 元字段的可导入字段键
pub fn meta_field_key(descriptor_id: &str) -> String {
    format!("{}{}", META_FIELD_PREFIX, descriptor_id.trim())
}

// ==========================================
// FieldCatalog - 字段目录
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
    core_len: usize,
}

impl FieldCatalog {
    /// 组装目录：静态核心字段 + 外部元字段描述
    ///
    /// # 规则
    /// - slug 为空的描述跳过
    /// - id 重复时保留第一条
    pub fn assemble(meta_descriptors: &[MetaFieldDescriptor]) -> Self {
        let fields = core_fields();
        let core_len = fields.len();
        let mut catalog = Self {
            index: HashMap::with_capacity(fields.len() + meta_descriptors.len()),
            fields: Vec::with_capacity(fields.len() + meta_descriptors.len()),
            core_len,
        };
        for field in fields {
            catalog.push(field);
        }

        for descriptor in meta_descriptors {
            let slug = descriptor.slug.trim();
            if slug.is_empty() || descriptor.id.trim().is_empty() {
                warn!(meta_id = %descriptor.id, "元字段描述缺少 id 或 slug，已跳过");
                continue;
            }

            let key = meta_field_key(&descriptor.id);
            if catalog.index.contains_key(&key) {
                warn!(field_key = %key, "元字段 id 重复，保留第一条");
                continue;
            }

            catalog.push(FieldDefinition::new(
                key,
                descriptor.label.clone(),
                FieldDomain::MetaScalar {
                    slug: slug.to_string(),
                    value_type: descriptor.value_type(),
                },
            ));
        }

        catalog
    }

    /// 仅含核心字段的目录
    pub fn core_only() -> Self {
        Self::assemble(&[])
    }

    fn push(&mut self, field: FieldDefinition) {
        self.index.insert(field.key.clone(), self.fields.len());
        self.fields.push(field);
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|pos| &self.fields[*pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// 全部字段（核心在前，元字段按描述顺序在后）
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    pub fn core(&self) -> &[FieldDefinition] {
        &self.fields[..self.core_len]
    }

    pub fn meta(&self) -> &[FieldDefinition] {
        &self.fields[self.core_len..]
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
