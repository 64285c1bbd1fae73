// ==========================================
// 商品目录批量导入 - 草稿商品领域模型
// ==========================================
// 用途: 行转换产物，暂存区内供人工复核/编辑
// 生命周期: 行转换时创建 → 暂存区独占 → 外部提交或丢弃
// ==========================================

use crate::domain::types::ReferenceKind;
use crate::i18n;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

// ==========================================
// FieldValue - 强制转换后的单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    #[serde(serialize_with = "serialize_number")]
    Number(f64),
    Text(String),
    List(Vec<String>),
    Json(Value),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn to_json(&self) -> Value {
        // FieldValue 的序列化不会失败
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// 整数值输出为 25 而不是 25.0
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// ==========================================
// AttributePair - JSON 对象拆出的可编辑属性行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePair {
    pub key: String,
    pub value: Value,
}

// ==========================================
// ReferenceResolution / EntityReferenceOutcome
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceResolution {
    #[serde(rename_all = "camelCase")]
    Resolved { resolved_id: String },
    #[serde(rename_all = "camelCase")]
    ToCreate { name_to_create: String },
}

impl ReferenceResolution {
    pub fn resolved_id(&self) -> Option<&str> {
        match self {
            ReferenceResolution::Resolved { resolved_id } => Some(resolved_id.as_str()),
            ReferenceResolution::ToCreate { .. } => None,
        }
    }

    pub fn name_to_create(&self) -> Option<&str> {
        match self {
            ReferenceResolution::ToCreate { name_to_create } => Some(name_to_create.as_str()),
            ReferenceResolution::Resolved { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReferenceOutcome {
    pub field_key: String,
    pub kind: ReferenceKind,
    #[serde(flatten)]
    pub resolution: ReferenceResolution,
}

// ==========================================
// WarningCode / DraftWarning - 非致命警告
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    NumberDefaulted,   // 核心数值解析失败，取 0
    NumberTruncated,   // 数值后附文本被忽略（"25 pcs" → 25）
    MetaNumberInvalid, // 元字段数值解析失败，取 null
    JsonInvalid,       // JSON 解析失败，原文保存在 *Note
    InvalidImageUrl,   // 非 http(s) 图片地址被丢弃
    ImagesTruncated,   // 图片超过上限被截断
    MissingName,       // 缺少名称，使用占位符
    MissingCode,       // 缺少编码，使用占位符
}

impl WarningCode {
    /// 对应的 i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            WarningCode::NumberDefaulted => "warning.number_defaulted",
            WarningCode::NumberTruncated => "warning.number_truncated",
            WarningCode::MetaNumberInvalid => "warning.meta_number_invalid",
            WarningCode::JsonInvalid => "warning.json_invalid",
            WarningCode::InvalidImageUrl => "warning.invalid_image_url",
            WarningCode::ImagesTruncated => "warning.images_truncated",
            WarningCode::MissingName => "warning.missing_name",
            WarningCode::MissingCode => "warning.missing_code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftWarning {
    pub code: WarningCode,
    pub field_key: String,
    pub message: String,
}

impl DraftWarning {
    /// 创建警告，消息按当前语言渲染
    ///
    /// # 参数
    /// - code: 警告代码
    /// - field_key: 相关字段键
    /// - detail: 插入消息的细节（原值 / 数量等）
    pub fn new(code: WarningCode, field_key: &str, detail: &str) -> Self {
        let message = i18n::t_with_args(
            code.message_key(),
            &[("field", field_key), ("detail", detail)],
        );
        Self {
            code,
            field_key: field_key.to_string(),
            message,
        }
    }
}

// ==========================================
// DraftProduct - 草稿商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftProduct {
    pub row_index: usize, // 源文件行号（1 起，含表头行）
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>, // 核心标量字段
    #[serde(default)]
    pub meta: BTreeMap<String, FieldValue>, // slug → 值
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attribute_rows: BTreeMap<String, Vec<AttributePair>>,
    #[serde(default)]
    pub references: Vec<EntityReferenceOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_name: Option<String>,
    #[serde(default)]
    pub warnings: Vec<DraftWarning>,
}

impl DraftProduct {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            fields: BTreeMap::new(),
            meta: BTreeMap::new(),
            images: Vec::new(),
            attribute_rows: BTreeMap::new(),
            references: Vec::new(),
            parent_category_name: None,
            warnings: Vec::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(FieldValue::as_str)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.field(key).and_then(FieldValue::as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.field(key).and_then(FieldValue::as_bool)
    }

    pub fn reference(&self, field_key: &str) -> Option<&ReferenceResolution> {
        self.references
            .iter()
            .find(|r| r.field_key == field_key)
            .map(|r| &r.resolution)
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// 合并局部修改（人工复核编辑）
    ///
    /// # 规则
    /// - fields / meta: 按键覆盖
    /// - images / parent_category_name: 提供则整体替换
    /// - references: 按 field_key 替换或追加
    /// - row_index / warnings 不变
    pub fn apply_patch(&mut self, patch: DraftPatch) {
        self.fields.extend(patch.fields);
        self.meta.extend(patch.meta);

        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(parent) = patch.parent_category_name {
            self.parent_category_name = Some(parent);
        }

        for outcome in patch.references {
            match self
                .references
                .iter_mut()
                .find(|r| r.field_key == outcome.field_key)
            {
                Some(existing) => *existing = outcome,
                None => self.references.push(outcome),
            }
        }
    }

    /// 输出给外部提交组件的商品创建载荷
    ///
    /// # 结构
    /// - 核心字段平铺
    /// - meta: slug → 值
    /// - images: 已校验 URL
    /// - 每个引用字段: {"resolvedId": ..} 或 {"nameToCreate": ..}
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("rowIndex".to_string(), json!(self.row_index));

        for (key, value) in &self.fields {
            payload.insert(key.clone(), value.to_json());
        }

        let meta: Map<String, Value> = self
            .meta
            .iter()
            .map(|(slug, value)| (slug.clone(), value.to_json()))
            .collect();
        payload.insert("meta".to_string(), Value::Object(meta));
        payload.insert("images".to_string(), json!(self.images));

        for (field_key, rows) in &self.attribute_rows {
            payload.insert(format!("{}Rows", field_key), json!(rows));
        }

        for outcome in &self.references {
            payload.insert(outcome.field_key.clone(), json!(outcome.resolution));
        }

        if let Some(parent) = &self.parent_category_name {
            payload.insert("brand_parentcategoriesName".to_string(), json!(parent));
        }

        payload.insert("warnings".to_string(), json!(self.warnings));
        Value::Object(payload)
    }
}

// ==========================================
// DraftPatch - 草稿局部修改
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub meta: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub references: Vec<EntityReferenceOutcome>,
    #[serde(default)]
    pub parent_category_name: Option<String>,
}

impl DraftPatch {
    pub fn field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn meta(mut self, slug: impl Into<String>, value: FieldValue) -> Self {
        self.meta.insert(slug.into(), value);
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn reference(mut self, outcome: EntityReferenceOutcome) -> Self {
        self.references.push(outcome);
        self
    }
}
