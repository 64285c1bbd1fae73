// ==========================================
// 商品目录批量导入 - 行转换器
// ==========================================
// 阶段 2: 原始行 + 映射 + 引用快照 → 草稿商品
// 规则: 按字段域表驱动分派；引用在整行装配完成后统一解析
// 红线: 不返回错误，单元格问题一律降级为默认值 + 警告
// ==========================================

use crate::config::ImportConfig;
use crate::domain::draft::{DraftProduct, DraftWarning, FieldValue, WarningCode};
use crate::domain::field::{FieldDefinition, FieldDomain};
use crate::domain::reference::ReferenceSnapshot;
use crate::domain::table::{ParsedTable, RawRow};
use crate::domain::types::ReferenceKind;
use crate::importer::coercion::{
    coerce_boolean, coerce_comma_list, coerce_image_urls, coerce_json_object, coerce_meta,
    coerce_number, coerce_text, JsonOutcome,
};
use crate::importer::field_catalog::{FieldCatalog, CODE_FIELD, NAME_FIELD};
use crate::importer::mapping_session::Mapping;
use crate::importer::reference_resolver::ReferenceResolver;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 已绑定到列位置的映射项
#[derive(Debug, Clone)]
struct BoundColumn {
    column: usize,
    field: FieldDefinition,
}

// ==========================================
// RowTransformer - 行转换器
// ==========================================
// 构造时预先计算 表头 → 列位置，转换时只做查表
pub struct RowTransformer<'a> {
    snapshot: &'a ReferenceSnapshot,
    config: &'a ImportConfig,
    bindings: Vec<BoundColumn>,
}

impl<'a> RowTransformer<'a> {
    /// 创建行转换器
    ///
    /// # 参数
    /// - catalog: 会话字段目录
    /// - snapshot: 会话引用快照（只读）
    /// - config: 导入配置
    /// - table: 解析结果（只用表头）
    /// - mapping: 表头 → 字段键
    ///
    /// # 说明
    /// - 表头不存在或字段键未知的映射项被忽略
    /// - 绑定按列位置升序，多列写同一字段时最右一列生效
    pub fn new(
        catalog: &FieldCatalog,
        snapshot: &'a ReferenceSnapshot,
        config: &'a ImportConfig,
        table: &ParsedTable,
        mapping: &Mapping,
    ) -> Self {
        let mut bindings = Vec::with_capacity(mapping.len());

        for (header, field_key) in mapping {
            let Some(column) = table.column_of(header) else {
                debug!(header = %header, "映射的表头不在文件中，忽略");
                continue;
            };
            let Some(field) = catalog.get(field_key) else {
                warn!(header = %header, field_key = %field_key, "映射指向未知字段，忽略");
                continue;
            };
            bindings.push(BoundColumn {
                column,
                field: field.clone(),
            });
        }

        bindings.sort_by_key(|b| b.column);

        Self {
            snapshot,
            config,
            bindings,
        }
    }

    /// 转换一行
    ///
    /// # 返回
    /// - 草稿商品（row_index = 源文件行号）
    pub fn transform(&self, row: &RawRow) -> DraftProduct {
        let mut draft = DraftProduct::new(row.line);
        // 字段键 → (种类, 名称)；整行装配完后再解析
        let mut pending: BTreeMap<&str, (ReferenceKind, String)> = BTreeMap::new();

        for binding in &self.bindings {
            let raw = row.cell(binding.column);
            if raw.trim().is_empty() {
                continue;
            }

            let key = binding.field.key.as_str();
            match &binding.field.domain {
                FieldDomain::Text => {
                    draft
                        .fields
                        .insert(key.to_string(), FieldValue::Text(coerce_text(raw)));
                }
                FieldDomain::Number => {
                    let (value, warnings) = coerce_number(raw, key);
                    draft.fields.insert(key.to_string(), value);
                    draft.warnings.extend(warnings);
                }
                FieldDomain::Boolean => {
                    draft.fields.insert(
                        key.to_string(),
                        FieldValue::Bool(coerce_boolean(raw, self.config)),
                    );
                }
                FieldDomain::CommaList => {
                    draft
                        .fields
                        .insert(key.to_string(), FieldValue::List(coerce_comma_list(raw)));
                }
                FieldDomain::JsonObject => {
                    let note_key = format!("{}Note", key);
                    let (outcome, warnings) = coerce_json_object(raw, key);
                    match outcome {
                        JsonOutcome::Parsed { value, pairs } => {
                            draft.fields.remove(&note_key);
                            draft.fields.insert(key.to_string(), FieldValue::Json(value));
                            draft.attribute_rows.insert(key.to_string(), pairs);
                        }
                        JsonOutcome::Note(text) => {
                            draft.fields.remove(key);
                            draft.attribute_rows.remove(key);
                            draft.fields.insert(note_key, FieldValue::Text(text));
                        }
                    }
                    draft.warnings.extend(warnings);
                }
                FieldDomain::ImageUrlList => {
                    let (urls, warnings) = coerce_image_urls(raw, self.config.max_images, key);
                    draft.images = urls;
                    draft.warnings.extend(warnings);
                }
                FieldDomain::EntityReference { kind } => {
                    let name = coerce_text(raw);
                    if kind.is_resolvable() {
                        pending.insert(key, (*kind, name));
                    } else {
                        // 父分类只携带名称，交由外部提交方处理
                        draft.parent_category_name = Some(name);
                    }
                }
                FieldDomain::MetaScalar { slug, value_type } => {
                    let (value, warnings) = coerce_meta(raw, key, *value_type);
                    draft.meta.insert(slug.clone(), value);
                    draft.warnings.extend(warnings);
                }
            }
        }

        let resolver = ReferenceResolver::new(self.snapshot);
        for (field_key, (kind, name)) in pending {
            if let Some(outcome) = resolver.resolve(kind, field_key, &name) {
                draft.references.push(outcome);
            }
        }

        self.apply_placeholders(&mut draft);
        draft
    }

    /// 转换全部行（全空白行不产生草稿）
    pub fn transform_all(&self, rows: &[RawRow]) -> Vec<DraftProduct> {
        let drafts: Vec<DraftProduct> = rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| self.transform(row))
            .collect();

        debug!(
            rows = rows.len(),
            drafts = drafts.len(),
            bindings = self.bindings.len(),
            "行转换完成"
        );
        drafts
    }

    // 名称 / 编码缺失时用占位符，保证每行都可复核
    fn apply_placeholders(&self, draft: &mut DraftProduct) {
        for (field_key, placeholder, code) in [
            (
                NAME_FIELD,
                &self.config.missing_name_placeholder,
                WarningCode::MissingName,
            ),
            (
                CODE_FIELD,
                &self.config.missing_code_placeholder,
                WarningCode::MissingCode,
            ),
        ] {
            if draft.text(field_key).is_none() {
                draft
                    .fields
                    .insert(field_key.to_string(), FieldValue::Text(placeholder.clone()));
                draft
                    .warnings
                    .push(DraftWarning::new(code, field_key, placeholder));
            }
        }
    }
}
