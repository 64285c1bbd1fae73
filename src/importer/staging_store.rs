// ==========================================
// 商品目录批量导入 - 草稿暂存区
// ==========================================
// 职责: 持有转换结果，支持按序号查看 / 修改 / 删除
// 红线: 不涉及持久化；修改只作用于目标草稿，不触发重新解析
// 并发: 变更方法取 &mut self，同一会话内的修改天然串行
// ==========================================

use crate::domain::draft::{DraftPatch, DraftProduct};
use crate::domain::reference::normalize_name;
use crate::domain::types::ReferenceKind;
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

// ==========================================
// StagingStore - 暂存区
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StagingStore {
    drafts: Vec<DraftProduct>,
}

impl StagingStore {
    pub fn new(drafts: Vec<DraftProduct>) -> Self {
        Self { drafts }
    }

    /// 当前全部草稿（有序）
    pub fn list(&self) -> &[DraftProduct] {
        &self.drafts
    }

    pub fn get(&self, index: usize) -> Option<&DraftProduct> {
        self.drafts.get(index)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// 合并人工编辑
    ///
    /// # 返回
    /// - Err(StagingIndexOutOfRange): 序号越界
    pub fn patch(&mut self, index: usize, patch: DraftPatch) -> ImportResult<&DraftProduct> {
        let len = self.drafts.len();
        let draft = self
            .drafts
            .get_mut(index)
            .ok_or(ImportError::StagingIndexOutOfRange { index, len })?;

        draft.apply_patch(patch);
        debug!(index = index, row_index = draft.row_index, "草稿已修改");
        Ok(draft)
    }

    /// 删除一条草稿，后续序号前移
    pub fn remove(&mut self, index: usize) -> ImportResult<DraftProduct> {
        let len = self.drafts.len();
        if index >= len {
            return Err(ImportError::StagingIndexOutOfRange { index, len });
        }

        let removed = self.drafts.remove(index);
        debug!(index = index, row_index = removed.row_index, "草稿已删除");
        Ok(removed)
    }

    /// 交出全部草稿（交给外部提交方）
    pub fn into_drafts(self) -> Vec<DraftProduct> {
        self.drafts
    }

    /// 待创建引用汇总: 每种引用按小写名去重，保留首次出现的写法
    ///
    /// # 说明
    /// - 只读视图，不改变各草稿上的标记
    pub fn pending_creations(&self) -> BTreeMap<ReferenceKind, Vec<String>> {
        let mut seen: HashSet<(ReferenceKind, String)> = HashSet::new();
        let mut pending: BTreeMap<ReferenceKind, Vec<String>> = BTreeMap::new();

        for outcome in self.drafts.iter().flat_map(|d| d.references.iter()) {
            let Some(name) = outcome.resolution.name_to_create() else {
                continue;
            };
            if seen.insert((outcome.kind, normalize_name(name))) {
                pending
                    .entry(outcome.kind)
                    .or_default()
                    .push(name.to_string());
            }
        }

        pending
    }
}

// ==========================================
// ImportSummary - 导入摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,         // 解析得到的数据行
    pub drafts: usize,             // 当前暂存草稿数
    pub rows_with_warnings: usize, // 至少带一条警告的草稿
    pub warnings: usize,           // 警告总数
    pub to_create: BTreeMap<ReferenceKind, usize>, // 每种引用的去重待创建数
}

impl ImportSummary {
    pub fn collect(total_rows: usize, store: &StagingStore) -> Self {
        let drafts = store.list();

        Self {
            total_rows,
            drafts: drafts.len(),
            rows_with_warnings: drafts.iter().filter(|d| !d.warnings.is_empty()).count(),
            warnings: drafts.iter().map(|d| d.warnings.len()).sum(),
            to_create: store
                .pending_creations()
                .into_iter()
                .map(|(kind, names)| (kind, names.len()))
                .collect(),
        }
    }
}
