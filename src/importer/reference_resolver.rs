// ==========================================
// 商品目录批量导入 - 引用解析器
// ==========================================
// 职责: 名称 → 快照中的实体 id；未命中时标记待创建
// 匹配: 大小写不敏感的精确匹配（两端 TRIM），不做模糊匹配
// ==========================================

use crate::domain::draft::{EntityReferenceOutcome, ReferenceResolution};
use crate::domain::reference::ReferenceSnapshot;
use crate::domain::types::ReferenceKind;

/// ReferenceResolver - 引用解析器（借用会话快照）
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    snapshot: &'a ReferenceSnapshot,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(snapshot: &'a ReferenceSnapshot) -> Self {
        Self { snapshot }
    }

    /// 解析一个名称
    ///
    /// # 参数
    /// - kind: 引用种类（父分类不可解析，返回 None）
    /// - field_key: 所属字段键
    /// - raw_name: 单元格文本
    ///
    /// # 返回
    /// - Some(Resolved): 快照命中，携带实体 id
    /// - Some(ToCreate): 未命中，携带 TRIM 后的原名（保留大小写）
    /// - None: 名称为空或种类不可解析
    pub fn resolve(
        &self,
        kind: ReferenceKind,
        field_key: &str,
        raw_name: &str,
    ) -> Option<EntityReferenceOutcome> {
        let name = raw_name.trim();
        if name.is_empty() || !kind.is_resolvable() {
            return None;
        }

        let resolution = match self.snapshot.find_by_name(kind, name) {
            Some(entity) => ReferenceResolution::Resolved {
                resolved_id: entity.id.clone(),
            },
            None => ReferenceResolution::ToCreate {
                name_to_create: name.to_string(),
            },
        };

        Some(EntityReferenceOutcome {
            field_key: field_key.to_string(),
            kind,
            resolution,
        })
    }
}
