//! Integration test: load QAJSON documents end to end through
//! `QajsonParser` with the bundled schemas, covering each failure stage.

use std::path::PathBuf;

use qajson_core::{DataLevelName, Record};
use qajson_schema::{
    minimal_document, InMemorySchemas, LoadError, QajsonParser, SchemaError, SchemaLocator,
    SchemaValidator, ROOT_SCHEMA_FILE,
};
use serde_json::{json, Value};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_value() -> Value {
    let text = std::fs::read_to_string(fixture("qa_json_test.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn load_fixture_document() {
    let validator = SchemaValidator::bundled();
    let parsed = QajsonParser::open(fixture("qa_json_test.json"), &validator).unwrap();
    assert_eq!(parsed.version(), "0.1.4");

    let qa = &parsed.root().qa;
    assert_eq!(qa.raw_data.checks.len(), 2);
    assert_eq!(qa.survey_products.checks.len(), 1);
    assert!(qa.get_data_level(DataLevelName::ChartAdequacy).is_some());

    let check = qa
        .raw_data
        .get_check("7761e08b-1380-46fa-a7eb-f1f41db38541")
        .unwrap();
    let outputs = check.outputs.as_ref().unwrap();
    assert_eq!(outputs.execution.status, "completed");
    assert_eq!(outputs.check_state.as_deref(), Some("pass"));
    assert_eq!(
        check.info.group.as_ref().map(|g| g.id.as_str()),
        Some("naming")
    );

    let density = qa
        .raw_data
        .get_check("4a3f3fe6-8c4d-4e43-8d46-5ab0d56a2ee0")
        .unwrap();
    assert!(density.outputs.is_none());
    let param = density
        .inputs
        .as_ref()
        .and_then(|i| i.get_param("Percentage of nodes"))
        .unwrap();
    assert_eq!(param.value, json!(95));
    assert_eq!(param.options.as_ref().map(Vec::len), Some(3));
}

#[test]
fn fixture_round_trips_to_identical_json() {
    let validator = SchemaValidator::bundled();
    let original = fixture_value();
    let parsed = QajsonParser::parse_value(&original, &validator).unwrap();
    assert_eq!(parsed.root().to_json(), original);
}

#[test]
fn serialized_document_reloads() {
    let validator = SchemaValidator::bundled();
    let parsed = QajsonParser::open(fixture("qa_json_test.json"), &validator).unwrap();
    let text = parsed.root().to_json_string_pretty().unwrap();

    let reloaded = QajsonParser::parse_str(&text, &validator).unwrap();
    assert_eq!(reloaded.root(), parsed.root());
}

#[test]
fn unknown_version_yields_no_document() {
    let validator = SchemaValidator::bundled();
    let mut doc = fixture_value();
    doc["qa"]["version"] = json!("9.9.9");

    let err = QajsonParser::parse_value(&doc, &validator).unwrap_err();
    match err {
        LoadError::Schema(SchemaError::UnknownVersion { requested, known }) => {
            assert_eq!(requested, "9.9.9");
            assert!(known.contains(&"0.1.4".to_string()));
        }
        other => panic!("expected UnknownVersion, got {other:?}"),
    }
}

#[test]
fn missing_execution_status_lists_path() {
    let validator = SchemaValidator::bundled();
    let mut doc = fixture_value();
    doc["qa"]["survey_products"]["checks"][0]["outputs"]["execution"]
        .as_object_mut()
        .unwrap()
        .remove("status");

    let err = QajsonParser::parse_value(&doc, &validator).unwrap_err();
    let violations = err.violations().expect("validation report");
    assert!(violations.has_path("/qa/survey_products/checks/0/outputs/execution"));
    assert!(err.to_string().contains("/qa/survey_products/checks/0/outputs/execution"));
}

#[test]
fn missing_version_is_reported() {
    let validator = SchemaValidator::bundled();
    let err = QajsonParser::parse_str(r#"{"qa": {"raw_data": {"checks": []}}}"#, &validator)
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingVersion));

    let err = QajsonParser::parse_str(r#"{"qa": {"version": 14}}"#, &validator).unwrap_err();
    assert!(matches!(err, LoadError::MissingVersion));
}

#[test]
fn malformed_json_reports_position() {
    let validator = SchemaValidator::bundled();
    let err = QajsonParser::parse_str("{\n  \"qa\": {\n    \"version\": \n}", &validator)
        .unwrap_err();
    match err {
        LoadError::MalformedJson { line, column, .. } => {
            assert_eq!(line, 4);
            assert!(column >= 1);
        }
        other => panic!("expected MalformedJson, got {other:?}"),
    }
}

#[test]
fn unreadable_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = QajsonParser::open(&missing, &SchemaValidator::bundled()).unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("absent.json")),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn minimal_document_is_valid_and_loads() {
    let validator = SchemaValidator::bundled();
    let root = minimal_document(validator.locator()).unwrap();
    assert_eq!(root.qa.version, validator.locator().latest_version().unwrap());

    let text = root.to_json_string_pretty().unwrap();
    let parsed = QajsonParser::parse_str(&text, &validator).unwrap();
    assert_eq!(parsed.into_root(), root);
}

#[test]
fn schema_directory_matches_bundled_schemas() {
    let schemas = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas");
    let validator = SchemaValidator::new(SchemaLocator::from_dir(&schemas));
    assert_eq!(validator.locator().versions().unwrap(), vec!["0.1.4"]);
    QajsonParser::open(fixture("qa_json_test.json"), &validator).unwrap();
}

#[test]
fn broken_bundle_is_definition_error_not_validation_failure() {
    let source = InMemorySchemas::new("<broken>")
        .with_document("v0.1.4", ROOT_SCHEMA_FILE, r#"{"type": "object"}"#)
        .with_document("v0.1.4", "check.schema.json", r#"{"definitions": "#);
    let validator = SchemaValidator::new(SchemaLocator::new(source));
    let err = QajsonParser::parse_value(&fixture_value(), &validator).unwrap_err();
    assert!(err.violations().is_none());
    assert!(
        matches!(err, LoadError::Schema(SchemaError::Definition { .. })),
        "got: {err:?}"
    );
}

#[test]
fn numbers_keep_their_written_form() {
    let validator = SchemaValidator::bundled();
    let mut doc = fixture_value();
    let outputs = &mut doc["qa"]["raw_data"]["checks"][0]["outputs"];
    outputs["percentage"] = json!(50);
    outputs["count"] = json!(3.0);
    doc["qa"]["survey_products"]["checks"][0]["outputs"]["count"] = json!(u64::MAX);

    let parsed = QajsonParser::parse_value(&doc, &validator).unwrap();
    assert_eq!(parsed.root().to_json(), doc);

    let outputs = parsed.root().qa.raw_data.checks[0].outputs.as_ref().unwrap();
    assert_eq!(outputs.percentage_f64(), Some(50.0));
    assert_eq!(outputs.count_i64(), Some(3));
}
