// ==========================================
// 文件解析器集成测试
// ==========================================
// 测试目标: CSV / Excel 夹具解析为统一的表头 + 原始行
// ==========================================

mod test_helpers;

use catalog_import::importer::{ImportSession, UniversalFileParser};
use catalog_import::{FileFormat, ImportConfig, ImportError, ReferenceKind};
use test_helpers::{fixture_path, sample_reference_source, write_temp_csv};

#[test]
fn test_parse_sample_csv() {
    let table = UniversalFileParser::new()
        .parse_path(fixture_path("sample_products.csv"))
        .unwrap();

    assert_eq!(table.headers.len(), 14);
    assert_eq!(table.headers[0], "Product Name");
    assert_eq!(table.row_count(), 3);

    let lines: Vec<usize> = table.rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 3, 5]);

    // 引号内的逗号与转义引号
    assert_eq!(table.rows[0].cell(9), "floor, matte");
    assert_eq!(table.rows[0].cell(11), r#"{"size":"60x60","color":"Grey"}"#);
}

#[test]
fn test_parse_sample_xlsx() {
    let table = UniversalFileParser::new()
        .parse_path(fixture_path("sample_products.xlsx"))
        .unwrap();

    assert_eq!(table.headers, vec!["Product Name", "Code", "Qty", "Brand"]);
    assert_eq!(table.row_count(), 3);

    let first = &table.rows[0];
    assert_eq!(first.line, 2);
    assert_eq!(first.cells, vec!["Tile A", "T-001", "25", "Acme"]);

    assert_eq!(table.rows[1].cell(2), "2.5");

    // 第 4 行为空，第 3 条数据保持源行号
    assert_eq!(table.rows[2].line, 5);
    assert_eq!(table.rows[2].cell(3), "");
}

#[test]
fn test_format_override_and_mismatch() {
    let parser = UniversalFileParser::new();
    let csv_path = fixture_path("sample_products.csv");

    let table = parser
        .parse_path_as(&csv_path, FileFormat::DelimitedText)
        .unwrap();
    assert_eq!(table.row_count(), 3);

    // CSV 内容按 Excel 解码必然失败
    let err = parser
        .parse_path_as(&csv_path, FileFormat::Spreadsheet)
        .unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_configured_delimiter() {
    let temp_file = write_temp_csv("Name;Code;Qty\nTile A;T-001;3\n");
    let config = ImportConfig {
        csv_delimiter: ';',
        ..ImportConfig::default()
    };

    let table = UniversalFileParser::from_config(&config)
        .parse_path(temp_file.path())
        .unwrap();

    assert_eq!(table.headers, vec!["Name", "Code", "Qty"]);
    assert_eq!(table.rows[0].cells, vec!["Tile A", "T-001", "3"]);
}

#[test]
fn test_header_only_and_empty_files() {
    let parser = UniversalFileParser::new();

    let header_only = write_temp_csv("Name,Code\n");
    let table = parser.parse_path(header_only.path()).unwrap();
    assert_eq!(table.row_count(), 0);

    let empty = write_temp_csv("");
    assert!(matches!(
        parser.parse_path(empty.path()),
        Err(ImportError::MissingHeaderRow)
    ));
}

#[tokio::test]
async fn test_xlsx_through_session() {
    let table = UniversalFileParser::new()
        .parse_path(fixture_path("sample_products.xlsx"))
        .unwrap();
    let source = sample_reference_source();

    let mut session = ImportSession::start(table, &source, ImportConfig::default())
        .await
        .unwrap();
    session
        .set_all_mappings([
            ("Product Name", "name"),
            ("Code", "product_code"),
            ("Qty", "quantity"),
            ("Brand", "brand"),
        ])
        .unwrap();

    let staging = session.transform().unwrap();

    assert_eq!(staging.len(), 3);
    assert_eq!(staging.get(1).unwrap().number("quantity"), Some(2.5));
    assert!(staging.get(2).unwrap().references.is_empty());
    assert_eq!(
        staging.pending_creations().get(&ReferenceKind::Brand),
        Some(&vec!["Nova".to_string()])
    );
}
