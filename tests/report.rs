//! Multi-collection reports as produced by `collection-validator validate`.

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use booking_schemas::{
    CollectionValidator, JsonFileFetcher, RecognizedCollections, SchemaError, SchemaRegistry,
    ValidationReport,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_report_shape_with_one_invalid_document() {
    let data = tempdir().unwrap();
    fs::write(
        data.path().join("notifications.json"),
        r#"[
            {"id": "n1", "userId": "u1", "title": "Booked", "message": "See you", "read": false},
            {"id": "n2", "userId": "u1", "title": "Reminder", "message": "Tomorrow", "read": "no"}
        ]"#,
    )
    .unwrap();
    fs::write(
        data.path().join("users.json"),
        r#"[{"id": "u1", "email": "ana@example.com", "role": "patient"}]"#,
    )
    .unwrap();

    let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
    let validator = CollectionValidator::with_tracing(JsonFileFetcher::new(data.path()));

    let report = ValidationReport::collect(
        &validator,
        &registry,
        &names(&["notifications", "users"]),
        "export",
    )
    .await
    .unwrap();

    assert!(!report.all_valid());

    let rendered = report.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert!(value["generated_at"].is_string());
    assert_eq!(value["data_dir"], json!("export"));

    let notifications = &value["collections"]["notifications"];
    assert_eq!(
        notifications["summary"],
        json!({"total": 2, "valid": 1, "invalid": 1, "errors": 0})
    );
    assert_eq!(notifications["results"][0], json!({"id": "n1", "status": "valid"}));
    assert_eq!(notifications["results"][1]["status"], json!("invalid"));
    assert_eq!(notifications["results"][1]["errors"][0]["field"], json!("read"));

    assert_eq!(value["collections"]["users"]["summary"]["valid"], json!(1));
}

#[tokio::test]
async fn test_all_valid_report() {
    let data = tempdir().unwrap();
    fs::write(
        data.path().join("users.json"),
        r#"[{"id": "u1", "email": "ana@example.com", "role": "admin"}]"#,
    )
    .unwrap();

    let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
    let validator = CollectionValidator::with_tracing(JsonFileFetcher::new(data.path()));

    let report = ValidationReport::collect(&validator, &registry, &names(&["users"]), "export")
        .await
        .unwrap();

    assert!(report.all_valid());
    assert_eq!(report.collections.len(), 1);
}

#[tokio::test]
async fn test_missing_export_fails_the_run() {
    let data = tempdir().unwrap();
    let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
    let validator = CollectionValidator::with_tracing(JsonFileFetcher::new(data.path()));

    let report = ValidationReport::collect(&validator, &registry, &names(&["doctors"]), "export")
        .await
        .unwrap();

    assert!(!report.all_valid());
    assert_eq!(report.collections["doctors"].summary.errors, 1);
}

#[tokio::test]
async fn test_misspelled_collection_is_rejected_before_fetching() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("users.json"), "[{").unwrap();

    let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
    let validator = CollectionValidator::with_tracing(JsonFileFetcher::new(data.path()));

    let err = ValidationReport::collect(
        &validator,
        &registry,
        &names(&["users", "apointments"]),
        "export",
    )
    .await
    .unwrap_err();

    let name = match err {
        SchemaError::UnknownCollection(name) => name,
        other => panic!("expected UnknownCollection, got {:?}", other),
    };
    assert_eq!(name, "apointments");
    assert_eq!(
        registry.unknown_collection_message(&name),
        "Unknown collection: apointments (did you mean 'appointments'?)"
    );
}
