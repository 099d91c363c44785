use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use anchorspan::application::services::{
    FallbackOrchestrator, FallbackPolicy, FallbackStats, field_context, locate_schema_anchor,
};
use anchorspan::domain::{
    Anchor, AnchorOrigin, ExtractionLimits, ExtractionState, LayoutConfig, Schema,
};

use crate::helpers::fixtures::{keys, line, page, word};
use crate::helpers::scripted_completer::ScriptedCompleter;

fn orchestrator(completer: &Arc<ScriptedCompleter>, policy: FallbackPolicy) -> FallbackOrchestrator {
    FallbackOrchestrator::new(completer.clone(), policy, ExtractionLimits::default())
}

fn state_for(fields: &[&str]) -> ExtractionState {
    ExtractionState::new(&Schema::from_keys(fields.iter().copied()))
}

fn schema_anchor() -> Anchor {
    let page = page(line(10.0, 10.0, &["CPF", "123"]));
    locate_schema_anchor("cpf", &page, &ExtractionLimits::default()).unwrap()
}

#[tokio::test]
async fn given_date_in_context_when_completing_field_then_fast_path_answers_without_completer() {
    let completer = Arc::new(ScriptedCompleter::with_field(Some("ignored")));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut stats = FallbackStats::default();

    let value = fallback
        .complete_field("data_nascimento", "nasceu em 10/05/1990 no Recife", &mut stats)
        .await;

    assert_eq!(value.as_deref(), Some("10/05/1990"));
    assert_eq!(
        stats,
        FallbackStats {
            attempts: 1,
            successes: 1,
            fast_path_hits: 1
        }
    );
    assert!(completer.calls().is_empty());
}

#[tokio::test]
async fn given_completer_answer_when_completing_field_then_value_is_trimmed_and_counted() {
    let completer = Arc::new(ScriptedCompleter::with_field(Some("  Maria Silva ")));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut stats = FallbackStats::default();

    let value = fallback.complete_field("nome", "Nome Maria Silva", &mut stats).await;

    assert_eq!(value.as_deref(), Some("Maria Silva"));
    assert_eq!(stats.successes, 1);
    assert_eq!(stats.fast_path_hits, 0);
    assert_eq!(completer.calls(), vec!["field:nome".to_string()]);
}

#[tokio::test]
async fn given_failing_completer_when_completing_field_then_no_value_and_no_success() {
    let completer = Arc::new(ScriptedCompleter::default());
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut stats = FallbackStats::default();

    let value = fallback.complete_field("cpf", "CPF", &mut stats).await;

    assert!(value.is_none());
    assert_eq!(stats.attempts, 1);
    assert_eq!(stats.successes, 0);
}

#[tokio::test]
async fn given_blank_context_when_completing_field_then_completer_is_not_called() {
    let completer = Arc::new(ScriptedCompleter::with_field(Some("x")));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut stats = FallbackStats::default();

    let value = fallback.complete_field("nome", "   ", &mut stats).await;

    assert!(value.is_none());
    assert!(completer.calls().is_empty());
}

#[test]
fn given_anchor_origins_when_deciding_field_call_then_policy_is_respected() {
    let completer = Arc::new(ScriptedCompleter::default());
    let strict = orchestrator(&completer, FallbackPolicy::default());
    let loose = orchestrator(
        &completer,
        FallbackPolicy {
            per_field_schema_only: false,
            ..FallbackPolicy::default()
        },
    );
    let schema = schema_anchor();
    let generic = Anchor {
        origin: AnchorOrigin::Generic("CPF".to_string()),
        ..schema.clone()
    };

    assert!(strict.wants_field_call(&schema, false));
    assert!(!strict.wants_field_call(&generic, false));
    assert!(strict.wants_field_call(&generic, true));
    assert!(loose.wants_field_call(&generic, false));
}

#[tokio::test]
async fn given_empty_raw_value_when_bulk_answers_then_value_is_filled() {
    let completer = Arc::new(ScriptedCompleter::with_bulk(&["10/05/1990"]));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut state = state_for(&["data"]);
    let mut stats = FallbackStats::default();
    let page_raw = BTreeMap::from([("data".to_string(), String::new())]);

    fallback
        .bulk_pass(&keys(&["data"]), "nasceu em 10/05/1990", &page_raw, &mut state, &mut stats)
        .await;

    assert_eq!(state.get("data"), Some("10/05/1990"));
    assert_eq!(stats.attempts, 1);
    assert_eq!(stats.successes, 1);
}

#[tokio::test]
async fn given_sanitize_existing_when_bulk_answers_then_dirty_value_is_replaced() {
    let completer = Arc::new(ScriptedCompleter::with_bulk(&["Maria"]));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut state = state_for(&["nome"]);
    state.fill_if_absent("nome", "Nome: Maria");
    let mut stats = FallbackStats::default();
    let page_raw = BTreeMap::from([("nome".to_string(), "Nome: Maria".to_string())]);

    fallback
        .bulk_pass(&keys(&["nome"]), "Nome: Maria", &page_raw, &mut state, &mut stats)
        .await;

    assert_eq!(state.get("nome"), Some("Maria"));
}

#[tokio::test]
async fn given_sanitize_disabled_when_bulk_answers_then_existing_value_is_kept() {
    let completer = Arc::new(ScriptedCompleter::with_bulk(&["Maria"]));
    let fallback = orchestrator(
        &completer,
        FallbackPolicy {
            sanitize_existing: false,
            ..FallbackPolicy::default()
        },
    );
    let mut state = state_for(&["nome"]);
    state.fill_if_absent("nome", "Nome: Maria");
    let mut stats = FallbackStats::default();
    let page_raw = BTreeMap::from([("nome".to_string(), "Nome: Maria".to_string())]);

    fallback
        .bulk_pass(&keys(&["nome"]), "Nome: Maria", &page_raw, &mut state, &mut stats)
        .await;

    assert_eq!(state.get("nome"), Some("Nome: Maria"));
}

#[tokio::test]
async fn given_short_bulk_answer_when_merging_then_missing_positions_count_as_null() {
    let completer = Arc::new(ScriptedCompleter::with_bulk(&["Maria"]));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut state = state_for(&["nome", "cpf"]);
    let mut stats = FallbackStats::default();

    fallback
        .bulk_pass(&keys(&["nome", "cpf"]), "texto", &BTreeMap::new(), &mut state, &mut stats)
        .await;

    assert_eq!(state.get("nome"), Some("Maria"));
    assert_eq!(state.get("cpf"), None);
}

#[tokio::test]
async fn given_bulk_disabled_when_running_bulk_pass_then_completer_is_not_called() {
    let completer = Arc::new(ScriptedCompleter::with_bulk(&["Maria"]));
    let fallback = orchestrator(
        &completer,
        FallbackPolicy {
            bulk_enabled: false,
            ..FallbackPolicy::default()
        },
    );
    let mut state = state_for(&["nome"]);
    let mut stats = FallbackStats::default();

    fallback
        .bulk_pass(&keys(&["nome"]), "texto", &BTreeMap::new(), &mut state, &mut stats)
        .await;

    assert!(completer.calls().is_empty());
    assert_eq!(stats.attempts, 0);
}

#[tokio::test]
async fn given_filled_value_when_document_pass_answers_then_value_is_never_replaced() {
    let completer = Arc::new(ScriptedCompleter::with_document(
        json!({"nome": "Outra Pessoa", "cpf": "123.456.789-09"}),
    ));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut state = state_for(&["nome", "cpf"]);
    state.fill_if_absent("nome", "Maria Silva");
    state.mark_composed("nome");
    let mut stats = FallbackStats::default();

    fallback
        .document_pass(&["Nome Maria Silva".to_string()], &mut state, &mut stats)
        .await;

    assert_eq!(state.get("nome"), Some("Maria Silva"));
    assert_eq!(state.get("cpf"), Some("123.456.789-09"));
    assert_eq!(completer.calls(), vec!["document:nome,cpf".to_string()]);
    assert_eq!(stats.successes, 1);
}

#[tokio::test]
async fn given_composed_excluded_when_document_pass_runs_then_only_missing_keys_are_requested() {
    let completer = Arc::new(ScriptedCompleter::with_document(json!({"cpf": null})));
    let fallback = orchestrator(
        &completer,
        FallbackPolicy {
            document_pass_includes_composed: false,
            ..FallbackPolicy::default()
        },
    );
    let mut state = state_for(&["nome", "cpf"]);
    state.fill_if_absent("nome", "Maria Silva");
    state.mark_composed("nome");
    let mut stats = FallbackStats::default();

    fallback.document_pass(&["texto".to_string()], &mut state, &mut stats).await;

    assert_eq!(completer.calls(), vec!["document:cpf".to_string()]);
    assert_eq!(state.get("cpf"), None);
}

#[tokio::test]
async fn given_every_key_filled_when_document_pass_runs_then_completer_is_not_called() {
    let completer = Arc::new(ScriptedCompleter::with_document(json!({})));
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let mut state = state_for(&["cpf"]);
    state.fill_if_absent("cpf", "123");
    let mut stats = FallbackStats::default();

    fallback.document_pass(&["texto".to_string()], &mut state, &mut stats).await;

    assert!(completer.calls().is_empty());
    assert_eq!(stats, FallbackStats::default());
}

#[test]
fn given_long_page_when_building_document_text_then_middle_is_elided() {
    let completer = Arc::new(ScriptedCompleter::default());
    let fallback = orchestrator(&completer, FallbackPolicy::default());

    let text = fallback.document_text(&["a".repeat(5000)]);

    assert!(text.contains("\n...\n"));
    assert_eq!(text.chars().count(), 3000 + "\n...\n".len());
}

#[test]
fn given_many_pages_when_building_document_text_then_total_is_capped() {
    let completer = Arc::new(ScriptedCompleter::default());
    let fallback = orchestrator(&completer, FallbackPolicy::default());
    let pages = vec!["b".repeat(3000); 3];

    let text = fallback.document_text(&pages);

    assert_eq!(text.chars().count(), 7000 + "\n...\n".len());
    assert!(text.starts_with('b') && text.ends_with('b'));
}

#[test]
fn given_anchor_with_nearby_value_when_building_context_then_far_tokens_are_left_out() {
    let mut tokens = line(10.0, 10.0, &["CPF", "123.456.789-09"]);
    tokens.push(word(10.0, 300.0, "rodapé"));
    let page = page(tokens);
    let limits = ExtractionLimits::default();
    let anchor = locate_schema_anchor("cpf", &page, &limits).unwrap();

    let context = field_context(&page, &anchor, &LayoutConfig::from_median_height(12.0), &limits);

    assert_eq!(context, "CPF 123.456.789-09");
}
