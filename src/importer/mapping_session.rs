// ==========================================
// 商品目录批量导入 - 列映射会话
// ==========================================
// 职责: 保存 表头 → 字段键 的人工指定
// 红线: 纯状态，无 I/O；只校验字段键是否存在
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_catalog::{FieldCatalog, CODE_FIELD, NAME_FIELD};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 表头 → 字段键
pub type Mapping = BTreeMap<String, String>;

// ==========================================
// MappingSession - 映射会话
// ==========================================
#[derive(Debug, Clone)]
pub struct MappingSession {
    catalog: Arc<FieldCatalog>,
    mapping: Mapping,
}

impl MappingSession {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self {
            catalog,
            mapping: Mapping::new(),
        }
    }

    /// 设置或清除一个表头的映射
    ///
    /// # 参数
    /// - header: 源文件表头（按 trim 后的文本存储）
    /// - field_key: Some(键) 指定映射；None 清除
    ///
    /// # 返回
    /// - Err(UnknownField): 字段键不在目录中
    pub fn set_mapping(&mut self, header: &str, field_key: Option<&str>) -> ImportResult<()> {
        let header = header.trim().to_string();

        match field_key {
            Some(key) => {
                if !self.catalog.contains(key) {
                    return Err(ImportError::UnknownField(key.to_string()));
                }
                self.mapping.insert(header, key.to_string());
            }
            None => {
                self.mapping.remove(&header);
            }
        }

        Ok(())
    }

    /// 批量设置（任一键未知则整体不生效）
    pub fn set_all<'a, I>(&mut self, assignments: I) -> ImportResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut next = self.mapping.clone();
        for (header, key) in assignments {
            if !self.catalog.contains(key) {
                return Err(ImportError::UnknownField(key.to_string()));
            }
            next.insert(header.trim().to_string(), key.to_string());
        }
        self.mapping = next;
        Ok(())
    }

    /// 当前完整映射
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn clear(&mut self) {
        self.mapping.clear();
    }

    /// 进入转换阶段的前置条件: 至少映射名称或编码之一
    pub fn ensure_ready(&self) -> ImportResult<()> {
        let has_required = self
            .mapping
            .values()
            .any(|key| key == NAME_FIELD || key == CODE_FIELD);

        if has_required {
            Ok(())
        } else {
            Err(ImportError::InsufficientMapping)
        }
    }

    /// 被多个表头选中的字段键（只报告，不拦截）
    ///
    /// # 返回
    /// - Vec<(字段键, 表头列表)>，按字段键排序
    pub fn conflicts(&self) -> Vec<(String, Vec<String>)> {
        let mut by_field: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (header, key) in &self.mapping {
            by_field.entry(key.as_str()).or_default().push(header.clone());
        }

        by_field
            .into_iter()
            .filter(|(_, headers)| headers.len() > 1)
            .map(|(key, headers)| (key.to_string(), headers))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MappingSession {
        MappingSession::new(Arc::new(FieldCatalog::core_only()))
    }

    #[test]
    fn test_set_and_clear_mapping() {
        let mut session = session();

        session.set_mapping("Product Name", Some("name")).unwrap();
        session.set_mapping(" Qty ", Some("quantity")).unwrap();
        assert_eq!(session.mapping().get("Qty"), Some(&"quantity".to_string()));

        session.set_mapping("Product Name", Some("description")).unwrap();
        assert_eq!(
            session.mapping().get("Product Name"),
            Some(&"description".to_string())
        );

        session.set_mapping("Product Name", None).unwrap();
        assert!(session.mapping().get("Product Name").is_none());
        assert_eq!(session.mapping().len(), 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut session = session();
        let result = session.set_mapping("Price", Some("price"));
        assert!(matches!(result, Err(ImportError::UnknownField(_))));
        assert!(session.mapping().is_empty());
    }

    #[test]
    fn test_set_all_is_atomic() {
        let mut session = session();
        let result = session.set_all([("Name", "name"), ("Price", "price")]);
        assert!(result.is_err());
        assert!(session.mapping().is_empty());
    }

    #[test]
    fn test_ensure_ready() {
        let mut session = session();
        session.set_mapping("Qty", Some("quantity")).unwrap();
        assert!(matches!(
            session.ensure_ready(),
            Err(ImportError::InsufficientMapping)
        ));

        session.set_mapping("Code", Some("product_code")).unwrap();
        assert!(session.ensure_ready().is_ok());
    }

    #[test]
    fn test_conflicts_reported_not_enforced() {
        let mut session = session();
        session.set_mapping("Name", Some("name")).unwrap();
        session.set_mapping("Title", Some("name")).unwrap();
        session.set_mapping("Code", Some("product_code")).unwrap();

        let conflicts = session.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, "name");
        assert_eq!(conflicts[0].1, vec!["Name".to_string(), "Title".to_string()]);
        assert_eq!(session.mapping().len(), 3);
    }
}
