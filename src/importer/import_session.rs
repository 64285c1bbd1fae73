// ==========================================
// 商品目录批量导入 - 导入会话
// ==========================================
// 流程: 拉取参考数据 → 组装字段目录 → 人工映射 → 行转换 → 暂存复核
// 阶段: Mapping ──transform()──▶ Review ──back_to_mapping()──▶ Mapping
// 红线: 参考数据拉取失败则会话不成立；快照在会话内只读
// ==========================================

use crate::config::ImportConfig;
use crate::domain::draft::DraftProduct;
use crate::domain::reference::ReferenceSnapshot;
use crate::domain::table::ParsedTable;
use crate::i18n;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_catalog::FieldCatalog;
use crate::importer::importer_trait::ReferenceSource;
use crate::importer::mapping_session::{Mapping, MappingSession};
use crate::importer::row_transformer::RowTransformer;
use crate::importer::staging_store::{ImportSummary, StagingStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SessionStage - 会话阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    Mapping, // 人工映射中
    Review,  // 草稿复核中
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStage::Mapping => write!(f, "mapping"),
            SessionStage::Review => write!(f, "review"),
        }
    }
}

// ==========================================
// ImportSession - 导入会话
// ==========================================
pub struct ImportSession {
    session_id: String,
    started_at: DateTime<Utc>,
    config: Arc<ImportConfig>,

    // 会话内只读
    table: ParsedTable,
    catalog: Arc<FieldCatalog>,
    snapshot: Arc<ReferenceSnapshot>,

    // 会话状态
    mapping: MappingSession,
    stage: SessionStage,
    staging: StagingStore,
}

impl ImportSession {
    /// 开始导入会话
    ///
    /// # 参数
    /// - table: 已解析的表格
    /// - source: 参考数据源（分类 / 品牌 / 供应商 / 元字段并发拉取）
    /// - config: 导入配置（其 locale 在此生效，决定警告消息语言）
    ///
    /// # 返回
    /// - Ok(ImportSession): 处于 Mapping 阶段
    /// - Err(SnapshotFetchError): 任一拉取失败
    #[instrument(skip(table, source, config), fields(session_id))]
    pub async fn start<S>(
        table: ParsedTable,
        source: &S,
        config: ImportConfig,
    ) -> ImportResult<Self>
    where
        S: ReferenceSource + ?Sized,
    {
        config.validate()?;
        // locale 为进程级状态，后续警告消息按此渲染
        i18n::set_locale(&config.locale);

        let session_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("session_id", session_id.as_str());
        let start_time = Instant::now();

        let (categories, brands, vendors, meta_fields) = futures::try_join!(
            source.fetch_categories(),
            source.fetch_brands(),
            source.fetch_vendors(),
            source.fetch_meta_fields(),
        )
        .map_err(|e| {
            error!(error = %e, "参考数据拉取失败，会话无法开始");
            ImportError::SnapshotFetchError(format!("{:#}", e))
        })?;

        let catalog = Arc::new(FieldCatalog::assemble(&meta_fields));
        let snapshot = Arc::new(ReferenceSnapshot::new(categories, brands, vendors));

        info!(
            locale = %config.locale,
            headers = table.headers.len(),
            rows = table.row_count(),
            fields = catalog.len(),
            meta_fields = catalog.meta().len(),
            references = snapshot.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "导入会话已开始"
        );

        Ok(Self {
            session_id,
            started_at: Utc::now(),
            config: Arc::new(config),
            table,
            mapping: MappingSession::new(Arc::clone(&catalog)),
            catalog,
            snapshot,
            stage: SessionStage::Mapping,
            staging: StagingStore::default(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn table(&self) -> &ParsedTable {
        &self.table
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> &ReferenceSnapshot {
        &self.snapshot
    }

    pub fn mapping_session(&self) -> &MappingSession {
        &self.mapping
    }

    /// 当前映射
    pub fn mapping(&self) -> &Mapping {
        self.mapping.mapping()
    }

    /// 设置或清除一个表头的映射（仅 Mapping 阶段）
    pub fn set_mapping(&mut self, header: &str, field_key: Option<&str>) -> ImportResult<()> {
        self.require_stage(SessionStage::Mapping)?;
        self.mapping.set_mapping(header, field_key)
    }

    /// 批量设置映射（仅 Mapping 阶段）
    pub fn set_all_mappings<'a, I>(&mut self, assignments: I) -> ImportResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.require_stage(SessionStage::Mapping)?;
        self.mapping.set_all(assignments)
    }

    /// 执行行转换，进入 Review 阶段
    ///
    /// # 返回
    /// - Err(InsufficientMapping): 未映射名称或编码，停留在 Mapping 阶段
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn transform(&mut self) -> ImportResult<&StagingStore> {
        self.require_stage(SessionStage::Mapping)?;
        self.mapping.ensure_ready()?;

        for (field_key, headers) in self.mapping.conflicts() {
            warn!(field_key = %field_key, headers = ?headers, "多个表头映射到同一字段，最右一列生效");
        }

        let start_time = Instant::now();
        let transformer = RowTransformer::new(
            &self.catalog,
            &self.snapshot,
            &self.config,
            &self.table,
            self.mapping.mapping(),
        );
        let drafts = transformer.transform_all(&self.table.rows);

        self.staging = StagingStore::new(drafts);
        self.stage = SessionStage::Review;

        let summary = self.summary();
        info!(
            total_rows = summary.total_rows,
            drafts = summary.drafts,
            rows_with_warnings = summary.rows_with_warnings,
            warnings = summary.warnings,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "行转换完成，进入复核阶段"
        );

        Ok(&self.staging)
    }

    /// 回到映射阶段（丢弃已暂存草稿）
    pub fn back_to_mapping(&mut self) {
        if self.stage == SessionStage::Review && !self.staging.is_empty() {
            info!(
                session_id = %self.session_id,
                discarded = self.staging.len(),
                "返回映射阶段，暂存草稿已丢弃"
            );
        }
        self.staging = StagingStore::default();
        self.stage = SessionStage::Mapping;
    }

    /// 暂存区（仅 Review 阶段）
    pub fn staging(&self) -> ImportResult<&StagingStore> {
        self.require_stage(SessionStage::Review)?;
        Ok(&self.staging)
    }

    /// 可修改的暂存区（仅 Review 阶段）
    pub fn staging_mut(&mut self) -> ImportResult<&mut StagingStore> {
        self.require_stage(SessionStage::Review)?;
        Ok(&mut self.staging)
    }

    /// 导入摘要
    pub fn summary(&self) -> ImportSummary {
        ImportSummary::collect(self.table.row_count(), &self.staging)
    }

    /// 结束会话，交出草稿（仅 Review 阶段）
    pub fn into_drafts(self) -> ImportResult<Vec<DraftProduct>> {
        self.require_stage(SessionStage::Review)?;
        Ok(self.staging.into_drafts())
    }

    fn require_stage(&self, expected: SessionStage) -> ImportResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ImportError::InvalidStage {
                expected: expected.to_string(),
                actual: self.stage.to_string(),
            })
        }
    }
}
