// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供夹具路径、临时文件、参考数据源等测试公用设施
// ==========================================
#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use catalog_import::importer::{ImportSession, StaticReferenceSource};
use catalog_import::{
    ImportConfig, MetaFieldDescriptor, ParsedTable, ReferenceEntity, ReferenceSource,
};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// 夹具文件路径
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 写入临时 CSV 文件
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn write_temp_csv(content: &str) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp csv");
    temp_file
        .write_all(content.as_bytes())
        .expect("Failed to write temp csv");
    temp_file
}

/// 与 sample_reference.json 内容一致的内存数据源
pub fn sample_reference_source() -> StaticReferenceSource {
    StaticReferenceSource::default()
        .with_categories(vec![
            ReferenceEntity::new("c1", "Tiles"),
            ReferenceEntity::new("c2", "Sanitary"),
        ])
        .with_brands(vec![ReferenceEntity::new("b1", "Acme")])
        .with_vendors(vec![ReferenceEntity::new("v1", "North Supply")])
        .with_meta_fields(vec![
            MetaFieldDescriptor::new("11", "barcode", "Barcode").with_field_type("string"),
            MetaFieldDescriptor::new("12", "sellingPrice", "Selling Price")
                .with_field_type("number"),
        ])
}

/// sample_products.csv 的完整映射
pub fn sample_mapping() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Product Name", "name"),
        ("Code", "product_code"),
        ("Qty", "quantity"),
        ("Tax", "tax"),
        ("Featured", "isFeatured"),
        ("Brand", "brand"),
        ("Category", "category"),
        ("Vendor", "vendor"),
        ("Parent Category", "brand_parentcategories"),
        ("Keywords", "keywords"),
        ("Images", "images"),
        ("Attributes", "variantAttributes"),
        ("Barcode", "meta_11"),
        ("Selling Price", "meta_12"),
    ]
}

/// 开始会话并应用映射
pub async fn start_mapped_session(
    table: ParsedTable,
    source: &dyn ReferenceSource,
    mapping: &[(&str, &str)],
) -> ImportSession {
    let mut session = ImportSession::start(table, source, ImportConfig::default())
        .await
        .expect("Failed to start session");
    session
        .set_all_mappings(mapping.iter().copied())
        .expect("Failed to apply mapping");
    session
}

// ==========================================
// FailingReferenceSource - 模拟外部接口故障
// ==========================================
#[derive(Debug, Default)]
pub struct FailingReferenceSource;

#[async_trait]
impl ReferenceSource for FailingReferenceSource {
    async fn fetch_categories(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(Vec::new())
    }

    async fn fetch_brands(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Err(anyhow!("brands endpoint returned 503"))
    }

    async fn fetch_vendors(&self) -> anyhow::Result<Vec<ReferenceEntity>> {
        Ok(Vec::new())
    }

    async fn fetch_meta_fields(&self) -> anyhow::Result<Vec<MetaFieldDescriptor>> {
        Ok(Vec::new())
    }
}
