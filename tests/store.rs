mod common;

use common::{TestWorkspace, fixture_path};
use mapping_ledger::{
    MappingStatus,
    store::{DocumentFormat, load_mapping_file, parse_mapping_file, save_mapping_file},
};

#[test]
fn json_and_yaml_fixtures_load_the_same_sheet() {
    let from_json = load_mapping_file(&fixture_path("sample_mappings.json")).expect("load json");
    let from_yaml = load_mapping_file(&fixture_path("sample_mappings.yaml")).expect("load yaml");
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json.name, "CRM to warehouse");
    assert_eq!(from_json.rows.len(), 4);
    assert_eq!(from_json.rows[2].join.as_deref(), Some("orders.cust_id = customer.cust_id"));
    assert!(from_json.rows[3].is_direct_copy());
}

#[test]
fn bare_row_lists_are_accepted() {
    let raw = r#"[{"id": "r1",
                   "sourceColumn": {"malcode": "A", "table": "T1", "column": "c1", "dataType": "int"},
                   "targetColumn": {"malcode": "B", "table": "T2", "column": "c1", "dataType": "int"}}]"#;
    let sheet = parse_mapping_file(raw, DocumentFormat::Json).expect("parse rows");
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.rows[0].status, MappingStatus::Draft);
    assert!(sheet.rows[0].comments.is_empty());
}

#[test]
fn format_follows_extension() {
    let workspace = TestWorkspace::new();
    assert_eq!(
        DocumentFormat::from_path(&workspace.path().join("a.YML")),
        DocumentFormat::Yaml
    );
    assert_eq!(
        DocumentFormat::from_path(&workspace.path().join("a.json")),
        DocumentFormat::Json
    );
    assert_eq!(
        DocumentFormat::from_path(&workspace.path().join("mappings")),
        DocumentFormat::Json
    );
}

#[test]
fn saved_yaml_reloads_after_edit() {
    let workspace = TestWorkspace::new();
    let mut sheet = load_mapping_file(&fixture_path("sample_mappings.json")).expect("load json");
    sheet
        .record_mut("m-3")
        .expect("row m-3")
        .comments
        .push("Pod: Growth".to_string());

    let path = workspace.path().join("edited.yaml");
    save_mapping_file(&path, &sheet).expect("save yaml");
    let reloaded = load_mapping_file(&path).expect("reload yaml");
    assert_eq!(reloaded, sheet);
}

#[test]
fn malformed_documents_report_the_path() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("broken.json", "{ \"rows\": [ { \"id\": 1 } ] }");
    let err = load_mapping_file(&path).expect_err("should fail");
    assert!(format!("{err:#}").contains("broken.json"));
}
