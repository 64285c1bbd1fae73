// ==========================================
// 商品目录批量导入 - 参考数据源实现
// ==========================================
// StaticReferenceSource: 内存数据（测试 / 嵌入调用方）
// JsonFileReferenceSource: 单个 JSON 文档（命令行）
// ==========================================

use crate::domain::field::MetaFieldDescriptor;
use crate::domain::reference::ReferenceEntity;
use crate::importer::importer_trait::ReferenceSource;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::debug;

// ==========================================
// ReferenceDocument - 参考数据文档
// ==========================================
// {"categories": [...], "brands": [...], "vendors": [...], "metaFields": [...]}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceDocument {
    pub categories: Vec<ReferenceEntity>,
    pub brands: Vec<ReferenceEntity>,
    pub vendors: Vec<ReferenceEntity>,
    pub meta_fields: Vec<MetaFieldDescriptor>,
}

// ==========================================
// StaticReferenceSource
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceSource {
    document: ReferenceDocument,
}

impl StaticReferenceSource {
    pub fn new(document: ReferenceDocument) -> Self {
        Self { document }
    }

    pub fn with_brands(mut self, brands: Vec<ReferenceEntity>) -> Self {
        self.document.brands = brands;
        self
    }

    pub fn with_categories(mut self, categories: Vec<ReferenceEntity>) -> Self {
        self.document.categories = categories;
        self
    }

    pub fn with_vendors(mut self, vendors: Vec<ReferenceEntity>) -> Self {
        self.document.vendors = vendors;
        self
    }

    pub fn with_meta_fields(mut self, meta_fields: Vec<MetaFieldDescriptor>) -> Self {
        self.document.meta_fields = meta_fields;
        self
    }
}

#[async_trait]
impl ReferenceSource for StaticReferenceSource {
    async fn fetch_categories(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document.categories.clone())
    }

    async fn fetch_brands(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document.brands.clone())
    }

    async fn fetch_vendors(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document.vendors.clone())
    }

    async fn fetch_meta_fields(&self) -> anyhow::Result<Vec<MetaFieldDescriptor>> {
        Ok(self.document.meta_fields.clone())
    }
}

// ==========================================
// JsonFileReferenceSource
// ==========================================
// 文档只读取一次，四个拉取方法共享
#[derive(Debug)]
pub struct JsonFileReferenceSource {
    path: PathBuf,
    document: OnceCell<ReferenceDocument>,
}

impl JsonFileReferenceSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document: OnceCell::new(),
        }
    }

    async fn document(&self) -> anyhow::Result<&ReferenceDocument> {
        self.document
            .get_or_try_init(|| async {
                let raw = tokio::fs::read_to_string(&self.path)
                    .await
                    .with_context(|| format!("读取参考数据失败: {}", self.path.display()))?;
                let document: ReferenceDocument = serde_json::from_str(&raw)
                    .with_context(|| format!("参考数据格式错误: {}", self.path.display()))?;

                debug!(
                    path = %self.path.display(),
                    categories = document.categories.len(),
                    brands = document.brands.len(),
                    vendors = document.vendors.len(),
                    meta_fields = document.meta_fields.len(),
                    "参考数据文档已加载"
                );
                Ok::<_, anyhow::Error>(document)
            })
            .await
    }
}

#[async_trait]
impl ReferenceSource for JsonFileReferenceSource {
    async fn fetch_categories(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document().await?.categories.clone())
    }

    async fn fetch_brands(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document().await?.brands.clone())
    }

    async fn fetch_vendors(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(self.document().await?.vendors.clone())
    }

    async fn fetch_meta_fields(&self) -> anyhow::Result<Vec<MetaFieldDescriptor>> {
        Ok(self.document().await?.meta_fields.clone())
    }
}
