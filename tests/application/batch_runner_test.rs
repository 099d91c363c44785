use std::sync::Arc;

use serde_json::json;

use anchorspan::application::services::{
    BatchError, BatchRunner, DocumentExtractor, FallbackPolicy,
};
use anchorspan::domain::ExtractionLimits;
use anchorspan::infrastructure::llm::DisabledCompleter;
use anchorspan::infrastructure::storage::LocalDocumentStore;
use anchorspan::infrastructure::text_processing::JsonWordExtractor;

use crate::helpers::fixtures::{registration_page, token_document};

fn runner(root: &std::path::Path) -> BatchRunner {
    let extractor = Arc::new(DocumentExtractor::new(
        Arc::new(DisabledCompleter),
        FallbackPolicy::default(),
        ExtractionLimits::default(),
    ));
    BatchRunner::new(
        Arc::new(LocalDocumentStore::new(root.to_path_buf()).unwrap()),
        Arc::new(JsonWordExtractor::new()),
        extractor,
    )
}

#[tokio::test]
async fn given_mixed_dataset_when_running_then_each_item_gets_its_own_outcome() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ficha.json"), token_document(&[registration_page()])).unwrap();
    std::fs::write(dir.path().join("quebrado.json"), b"not json").unwrap();
    let dataset = json!([
        {"document_path": "ficha.json", "extraction_schema": {"nome": "", "cpf": ""}},
        {"pdf_path": "ausente.json", "extraction_schema": {"nome": ""}},
        {"document_path": "ficha.json"},
        {"document_path": "quebrado.json", "extraction_schema": {"nome": ""}},
        42
    ]);

    let outputs = runner(dir.path()).run(&dataset).await.unwrap();

    assert_eq!(outputs.len(), 5);
    let first = &outputs[0];
    assert!(first.error.is_none());
    assert_eq!(
        serde_json::Value::Object(first.result.clone().unwrap()),
        json!({"nome": "Maria Silva", "cpf": "123.456.789-00"})
    );
    assert_eq!(first.timing.as_ref().unwrap().per_page_seconds.len(), 1);

    let errors: Vec<Option<&str>> = outputs.iter().map(|o| o.error.as_deref()).collect();
    assert_eq!(
        errors,
        vec![
            None,
            Some("document_not_found"),
            Some("schema_missing"),
            Some("word_extraction_failed"),
            Some("invalid_item")
        ]
    );
    assert!(outputs[1].result.is_none());
}

#[tokio::test]
async fn given_dataset_that_is_not_a_list_when_running_then_run_fails() {
    let dir = tempfile::tempdir().unwrap();

    let result = runner(dir.path()).run(&json!({"document_path": "x"})).await;

    assert!(matches!(result, Err(BatchError::DatasetNotList)));
}

#[tokio::test]
async fn given_dataset_file_when_loading_then_json_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.json");
    std::fs::write(&path, r#"[{"document_path": "a.json"}]"#).unwrap();

    let dataset = BatchRunner::load_dataset(&path).await.unwrap();

    assert_eq!(dataset.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn given_invalid_dataset_file_when_loading_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.json");
    std::fs::write(&path, "[{").unwrap();

    let result = BatchRunner::load_dataset(&path).await;

    assert!(matches!(result, Err(BatchError::Parse(_))));
}
