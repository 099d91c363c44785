use std::sync::Arc;

use serde_json::{Value, json};

use anchorspan::application::services::{DocumentExtractor, FallbackPolicy};
use anchorspan::domain::{ExtractionLimits, Schema};
use anchorspan::infrastructure::llm::DisabledCompleter;

use crate::helpers::fixtures::{line, page, registration_page, word};
use crate::helpers::scripted_completer::ScriptedCompleter;

fn schema(value: Value) -> Schema {
    Schema::parse(&value)
}

fn geometry_only() -> DocumentExtractor {
    DocumentExtractor::new(
        Arc::new(DisabledCompleter),
        FallbackPolicy::default(),
        ExtractionLimits::default(),
    )
}

#[tokio::test]
async fn given_printed_labels_when_extracting_without_completer_then_geometry_fills_values() {
    let schema = schema(json!({"nome": "", "cpf": "", "telefone": ""}));

    let extraction = geometry_only().extract(&[registration_page()], &schema).await;

    assert_eq!(
        Value::Object(extraction.values),
        json!({"nome": "Maria Silva", "cpf": "123.456.789-00", "telefone": null})
    );
    assert_eq!(extraction.per_page_seconds.len(), 1);
    assert_eq!(extraction.stats.successes, 0);
}

#[tokio::test]
async fn given_schema_order_when_extracting_then_output_keeps_it() {
    let schema = schema(json!({"telefone": "", "cpf": "", "nome": ""}));

    let extraction = geometry_only().extract(&[registration_page()], &schema).await;

    let order: Vec<&str> = extraction.values.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["telefone", "cpf", "nome"]);
}

#[tokio::test]
async fn given_missing_field_when_document_pass_answers_then_gap_is_filled_without_clobbering() {
    let completer = Arc::new(ScriptedCompleter::with_document(json!({
        "nome": "Outra Pessoa",
        "telefone": "(81) 3333-4444"
    })));
    let extractor = DocumentExtractor::new(
        completer.clone(),
        FallbackPolicy::default(),
        ExtractionLimits::default(),
    );
    let schema = schema(json!({"nome": "", "cpf": "", "telefone": ""}));

    let extraction = extractor.extract(&[registration_page()], &schema).await;

    assert_eq!(extraction.values["nome"], json!("Maria Silva"));
    assert_eq!(extraction.values["telefone"], json!("(81) 3333-4444"));
    assert_eq!(
        completer.calls(),
        vec![
            "bulk:nome,cpf,telefone".to_string(),
            "document:nome,telefone".to_string()
        ]
    );
}

#[tokio::test]
async fn given_label_without_value_when_extracting_then_field_completion_is_consulted() {
    let completer = Arc::new(ScriptedCompleter::with_field(Some("999")));
    let extractor = DocumentExtractor::new(
        completer.clone(),
        FallbackPolicy::default(),
        ExtractionLimits::default(),
    );
    let page = page(vec![word(10.0, 10.0, "CPF")]);

    let extraction = extractor.extract(&[page], &schema(json!({"cpf": ""}))).await;

    assert_eq!(extraction.values["cpf"], json!("999"));
    assert_eq!(completer.calls()[0], "field:cpf");
    assert!(extraction.stats.successes >= 1);
}

#[tokio::test]
async fn given_value_on_several_pages_when_extracting_then_first_page_wins() {
    let second = page(line(10.0, 10.0, &["Nome:", "Outra"]));

    let extraction = geometry_only()
        .extract(&[registration_page(), second], &schema(json!({"nome": ""})))
        .await;

    assert_eq!(extraction.values["nome"], json!("Maria Silva"));
    assert_eq!(extraction.per_page_seconds.len(), 2);
    assert!(extraction.mean_seconds >= 0.0);
}

#[tokio::test]
async fn given_no_pages_when_extracting_then_every_value_is_null() {
    let extraction = geometry_only()
        .extract(&[], &schema(json!({"nome": "", "cpf": ""})))
        .await;

    assert_eq!(Value::Object(extraction.values), json!({"nome": null, "cpf": null}));
    assert!(extraction.per_page_seconds.is_empty());
    assert_eq!(extraction.mean_seconds, 0.0);
}
