// ==========================================
// 商品目录批量导入 - 引用数据快照
// ==========================================
// 用途: 分类 / 品牌 / 供应商 名称 → id 解析
// 红线: 会话开始时拉取一次，之后只读，不随会话刷新
// ==========================================

use crate::domain::types::ReferenceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// ReferenceEntity - 已存在的引用实体
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub id: String,
    pub name: String,
}

impl ReferenceEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ==========================================
// ReferenceSnapshot - 引用数据只读快照
// ==========================================
// 名称索引按小写名构建；同名多条时保留列表中的第一条
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    categories: Vec<ReferenceEntity>,
    brands: Vec<ReferenceEntity>,
    vendors: Vec<ReferenceEntity>,
    index: HashMap<(ReferenceKind, String), usize>,
}

impl ReferenceSnapshot {
    pub fn new(
        categories: Vec<ReferenceEntity>,
        brands: Vec<ReferenceEntity>,
        vendors: Vec<ReferenceEntity>,
    ) -> Self {
        let mut index = HashMap::new();
        for (kind, list) in [
            (ReferenceKind::Category, &categories),
            (ReferenceKind::Brand, &brands),
            (ReferenceKind::Vendor, &vendors),
        ] {
            for (pos, entity) in list.iter().enumerate() {
                index
                    .entry((kind, normalize_name(&entity.name)))
                    .or_insert(pos);
            }
        }

        Self {
            categories,
            brands,
            vendors,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 指定种类的实体列表（父分类不在快照中，返回空）
    pub fn entities(&self, kind: ReferenceKind) -> &[ReferenceEntity] {
        match kind {
            ReferenceKind::Category => &self.categories,
            ReferenceKind::Brand => &self.brands,
            ReferenceKind::Vendor => &self.vendors,
            ReferenceKind::ParentCategory => &[],
        }
    }

    /// 大小写不敏感的精确名称匹配
    pub fn find_by_name(&self, kind: ReferenceKind, name: &str) -> Option<&ReferenceEntity> {
        self.index
            .get(&(kind, normalize_name(name)))
            .and_then(|pos| self.entities(kind).get(*pos))
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.brands.len() + self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 名称归一化（仅小写，不做 trim 以外的模糊处理）
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ReferenceSnapshot {
        ReferenceSnapshot::new(
            vec![ReferenceEntity::new("c1", "Floor Tiles")],
            vec![
                ReferenceEntity::new("b1", "Acme"),
                ReferenceEntity::new("b2", "ACME"),
            ],
            vec![ReferenceEntity::new("v1", "Northwind")],
        )
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let snap = snapshot();
        let found = snap.find_by_name(ReferenceKind::Category, "floor tiles");
        assert_eq!(found.map(|e| e.id.as_str()), Some("c1"));
    }

    #[test]
    fn test_find_by_name_first_wins() {
        let snap = snapshot();
        let found = snap.find_by_name(ReferenceKind::Brand, "acme");
        assert_eq!(found.map(|e| e.id.as_str()), Some("b1"));
    }

    #[test]
    fn test_find_by_name_kind_scoped() {
        let snap = snapshot();
        assert!(snap.find_by_name(ReferenceKind::Vendor, "Acme").is_none());
        assert!(snap
            .find_by_name(ReferenceKind::ParentCategory, "Floor Tiles")
            .is_none());
    }

    #[test]
    fn test_no_partial_match() {
        let snap = snapshot();
        assert!(snap.find_by_name(ReferenceKind::Brand, "Acme2").is_none());
        assert!(snap.find_by_name(ReferenceKind::Brand, "Acm").is_none());
    }
}
