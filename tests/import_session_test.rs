// ==========================================
// ImportSession 集成测试
// ==========================================
// 测试目标: 文件 → 会话 → 映射 → 行转换 → 暂存复核 的完整流程
// ==========================================

mod test_helpers;

use catalog_import::importer::{
    ImportSession, JsonFileReferenceSource, StaticReferenceSource, UniversalFileParser,
};
use catalog_import::{
    DraftPatch, FieldValue, ImportConfig, ImportError, ParsedTable, RawRow, ReferenceEntity,
    ReferenceKind, SessionStage, WarningCode,
};
use catalog_import::logging;
use serde_json::json;
use test_helpers::{
    fixture_path, sample_mapping, sample_reference_source, start_mapped_session,
    FailingReferenceSource,
};

fn sample_table() -> ParsedTable {
    UniversalFileParser::new()
        .parse_path(fixture_path("sample_products.csv"))
        .expect("Failed to parse sample csv")
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    logging::init_test();

    let table = ParsedTable::new(
        vec![
            "Product Name".to_string(),
            "Code".to_string(),
            "Qty".to_string(),
            "Brand".to_string(),
        ],
        vec![RawRow::new(
            2,
            vec![
                "Tile A".to_string(),
                "T-001".to_string(),
                "25".to_string(),
                "Acme".to_string(),
            ],
        )],
    );
    let source = StaticReferenceSource::default()
        .with_brands(vec![ReferenceEntity::new("b9", "Zenith")]);

    let mut session = start_mapped_session(
        table,
        &source,
        &[
            ("Product Name", "name"),
            ("Code", "product_code"),
            ("Qty", "quantity"),
            ("Brand", "brand"),
        ],
    )
    .await;

    session.transform().expect("Transform should succeed");
    let drafts = session.into_drafts().unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(
        drafts[0].to_payload(),
        json!({
            "rowIndex": 2,
            "name": "Tile A",
            "product_code": "T-001",
            "quantity": 25,
            "brand": {"nameToCreate": "Acme"},
            "meta": {},
            "images": [],
            "warnings": []
        })
    );
}

#[tokio::test]
async fn test_sample_csv_full_mapping() {
    logging::init_test();

    let source = sample_reference_source();
    let mut session = start_mapped_session(sample_table(), &source, &sample_mapping()).await;

    let staging = session.transform().expect("Transform should succeed");
    assert_eq!(staging.len(), 3, "blank row must not produce a draft");

    // 第 1 行: 全部命中
    let first = staging.get(0).unwrap();
    assert_eq!(first.row_index, 2);
    assert_eq!(first.number("quantity"), Some(25.0));
    assert_eq!(first.number("tax"), Some(5.0));
    assert_eq!(first.flag("isFeatured"), Some(true));
    assert_eq!(first.reference("brand").unwrap().resolved_id(), Some("b1"));
    assert_eq!(first.reference("category").unwrap().resolved_id(), Some("c1"));
    assert_eq!(first.reference("vendor").unwrap().resolved_id(), Some("v1"));
    assert_eq!(first.parent_category_name.as_deref(), Some("Flooring"));
    assert_eq!(first.images, vec!["https://cdn.example.com/a1.png"]);
    assert!(first.has_warning(WarningCode::InvalidImageUrl));
    assert_eq!(first.attribute_rows["variantAttributes"].len(), 2);
    assert_eq!(
        first.meta.get("barcode"),
        Some(&FieldValue::Text("8901234".to_string()))
    );
    assert_eq!(first.meta.get("sellingPrice"), Some(&FieldValue::Number(12.5)));

    // 第 2 行: 降级 + 警告
    let second = staging.get(1).unwrap();
    assert_eq!(second.row_index, 3);
    assert_eq!(second.number("quantity"), Some(0.0));
    assert!(second.field("tax").is_none());
    assert_eq!(second.flag("isFeatured"), Some(false));
    assert_eq!(second.reference("brand").unwrap().name_to_create(), Some("Nova"));
    assert_eq!(second.reference("category").unwrap().resolved_id(), Some("c1"));
    assert_eq!(second.text("variantAttributesNote"), Some("{broken"));
    assert_eq!(second.meta.get("sellingPrice"), Some(&FieldValue::Null));
    assert!(second.has_warning(WarningCode::NumberDefaulted));
    assert!(second.has_warning(WarningCode::JsonInvalid));
    assert!(second.has_warning(WarningCode::MetaNumberInvalid));

    // 第 3 行: 空行之后，行号保持源文件位置
    let third = staging.get(2).unwrap();
    assert_eq!(third.row_index, 5);
    assert_eq!(third.text("name"), Some("[Missing Name]"));
    assert!(third.has_warning(WarningCode::MissingName));
    assert_eq!(third.reference("vendor").unwrap().name_to_create(), Some("South Trade"));

    let summary = session.summary();
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.drafts, 3);
    assert_eq!(summary.rows_with_warnings, 3);
    assert_eq!(summary.warnings, 5);
    assert_eq!(summary.to_create.get(&ReferenceKind::Brand), Some(&1));
    assert_eq!(summary.to_create.get(&ReferenceKind::Category), Some(&1));
    assert_eq!(summary.to_create.get(&ReferenceKind::Vendor), Some(&1));
}

#[tokio::test]
async fn test_json_file_reference_source_matches_static() {
    let json_source = JsonFileReferenceSource::new(fixture_path("sample_reference.json"));
    let static_source = sample_reference_source();

    let mut from_json = start_mapped_session(sample_table(), &json_source, &sample_mapping()).await;
    let mut from_static =
        start_mapped_session(sample_table(), &static_source, &sample_mapping()).await;

    from_json.transform().unwrap();
    from_static.transform().unwrap();

    let left: Vec<_> = from_json.into_drafts().unwrap();
    let right: Vec<_> = from_static.into_drafts().unwrap();
    assert_eq!(left, right);
}

#[tokio::test]
async fn test_snapshot_fetch_failure_is_fatal() {
    let result =
        ImportSession::start(sample_table(), &FailingReferenceSource, ImportConfig::default())
            .await;

    match result {
        Err(ImportError::SnapshotFetchError(message)) => assert!(message.contains("503")),
        other => panic!("expected SnapshotFetchError, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_insufficient_mapping_blocks_transform() {
    let source = sample_reference_source();
    let mut session =
        start_mapped_session(sample_table(), &source, &[("Qty", "quantity"), ("Brand", "brand")])
            .await;

    assert!(matches!(
        session.transform(),
        Err(ImportError::InsufficientMapping)
    ));
    assert_eq!(session.stage(), SessionStage::Mapping);

    session.set_mapping("Code", Some("product_code")).unwrap();
    assert!(session.transform().is_ok());
    assert_eq!(session.stage(), SessionStage::Review);
}

#[tokio::test]
async fn test_unknown_field_rejected() {
    let source = sample_reference_source();
    let mut session = ImportSession::start(sample_table(), &source, ImportConfig::default())
        .await
        .unwrap();

    // meta_99 不在元字段描述中
    let result = session.set_mapping("Barcode", Some("meta_99"));
    assert!(matches!(result, Err(ImportError::UnknownField(_))));
}

#[tokio::test]
async fn test_review_edits_do_not_touch_other_rows() {
    let source = sample_reference_source();
    let mut session = start_mapped_session(sample_table(), &source, &sample_mapping()).await;
    session.transform().unwrap();

    let before_last = session.staging().unwrap().get(2).unwrap().clone();

    let staging = session.staging_mut().unwrap();
    staging
        .patch(
            1,
            DraftPatch::default()
                .field("quantity", FieldValue::Number(12.0))
                .images(vec!["https://cdn.example.com/b1.png".to_string()]),
        )
        .unwrap();
    let removed = staging.remove(0).unwrap();
    assert_eq!(removed.row_index, 2);

    let staging = session.staging().unwrap();
    assert_eq!(staging.len(), 2);
    assert_eq!(staging.get(0).unwrap().row_index, 3);
    assert_eq!(staging.get(0).unwrap().number("quantity"), Some(12.0));
    assert_eq!(staging.get(1).unwrap(), &before_last);

    assert!(matches!(
        session.staging_mut().unwrap().remove(5),
        Err(ImportError::StagingIndexOutOfRange { index: 5, len: 2 })
    ));
}

#[tokio::test]
async fn test_to_create_markers_not_deduplicated_per_draft() {
    let source = sample_reference_source();
    let mut session = start_mapped_session(sample_table(), &source, &sample_mapping()).await;
    session.transform().unwrap();

    let staging = session.staging().unwrap();
    assert_eq!(
        staging.get(1).unwrap().reference("brand").unwrap().name_to_create(),
        Some("Nova")
    );
    assert_eq!(
        staging.get(2).unwrap().reference("brand").unwrap().name_to_create(),
        Some("nova")
    );
    assert_eq!(
        staging.pending_creations()[&ReferenceKind::Brand],
        vec!["Nova".to_string()]
    );
}

#[tokio::test]
async fn test_transform_twice_is_identical() {
    let source = sample_reference_source();
    let mut session = start_mapped_session(sample_table(), &source, &sample_mapping()).await;

    let first = session.transform().unwrap().list().to_vec();
    session.back_to_mapping();
    let second = session.transform().unwrap().list().to_vec();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_mapping_fixture_matches_helper() {
    let raw = std::fs::read_to_string(fixture_path("sample_mapping.json")).unwrap();
    let from_file: std::collections::BTreeMap<String, String> =
        serde_json::from_str(&raw).unwrap();

    let from_helper: std::collections::BTreeMap<String, String> = sample_mapping()
        .into_iter()
        .map(|(h, k)| (h.to_string(), k.to_string()))
        .collect();

    assert_eq!(from_file, from_helper);
}
