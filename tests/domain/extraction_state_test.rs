use serde_json::{Value, json};

use anchorspan::domain::{ClaimedTokens, ExtractionState, Schema};

fn state(keys: &[&str]) -> ExtractionState {
    ExtractionState::new(&Schema::from_keys(keys.iter().copied()))
}

#[test]
fn given_filled_field_when_filling_again_then_first_value_is_kept() {
    let mut state = state(&["nome"]);

    assert!(state.fill_if_absent("nome", "Maria"));
    assert!(!state.fill_if_absent("nome", "Joana"));

    assert_eq!(state.get("nome"), Some("Maria"));
}

#[test]
fn given_blank_value_when_filling_then_field_stays_missing() {
    let mut state = state(&["nome"]);

    assert!(!state.fill_if_absent("nome", "   "));

    assert_eq!(state.missing_keys(), vec!["nome".to_string()]);
}

#[test]
fn given_unknown_key_when_filling_then_nothing_is_stored() {
    let mut state = state(&["nome"]);

    assert!(!state.fill_if_absent("cpf", "123"));
    assert!(!state.overwrite("cpf", "123"));

    assert_eq!(state.get("cpf"), None);
}

#[test]
fn given_filled_field_when_overwriting_then_value_is_replaced() {
    let mut state = state(&["nome"]);
    state.fill_if_absent("nome", "Nome: Maria");

    assert!(state.overwrite("nome", "Maria"));

    assert_eq!(state.get("nome"), Some("Maria"));
}

#[test]
fn given_composed_field_when_listing_then_it_is_eligible_for_the_document_pass() {
    let mut state = state(&["nome", "cpf", "data"]);
    state.fill_if_absent("nome", "Maria Silva");
    state.mark_composed("nome");
    state.fill_if_absent("data", "10/05/1990");

    assert_eq!(state.missing_keys(), vec!["cpf".to_string()]);
    assert_eq!(
        state.missing_or_composed_keys(),
        vec!["nome".to_string(), "cpf".to_string()]
    );
}

#[test]
fn given_partial_state_when_finishing_then_values_follow_schema_order_with_nulls() {
    let mut state = state(&["b", "a", "c"]);
    state.fill_if_absent("a", "1");
    state.fill_if_absent("c", "null");

    let values = state.into_values();

    let keys: Vec<&String> = values.keys().collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_eq!(Value::Object(values), json!({"b": null, "a": "1", "c": null}));
}

#[test]
fn given_claimed_tokens_when_claiming_more_then_set_grows() {
    let claimed = ClaimedTokens::new().claim(&[1, 2]).claim(&[2, 5]);

    assert_eq!(claimed.len(), 3);
    assert!(claimed.contains(5));
    assert!(!claimed.contains(3));
}
