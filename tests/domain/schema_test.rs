use serde_json::{Value, json};

use anchorspan::domain::Schema;

#[test]
fn given_object_when_parsing_then_keys_keep_their_order() {
    let schema = Schema::parse(&json!({"nome": "Nome completo", "cpf": "", "data": null}));

    assert_eq!(schema.keys(), vec!["nome", "cpf", "data"]);
}

#[test]
fn given_json_string_when_parsing_then_inner_object_is_used() {
    let schema = Schema::parse(&Value::String(r#"{"telefone": "phone"}"#.to_string()));

    assert_eq!(schema.keys(), vec!["telefone"]);
}

#[test]
fn given_invalid_input_when_parsing_then_schema_is_empty() {
    assert!(Schema::parse(&Value::String("not json".to_string())).is_empty());
    assert!(Schema::parse(&json!(["nome"])).is_empty());
    assert!(Schema::parse(&Value::Null).is_empty());
}

#[test]
fn given_keys_when_nulling_then_each_maps_to_null() {
    let keys = vec!["cpf".to_string(), "nome".to_string()];

    let nulled = Schema::nulled(&keys);

    assert_eq!(Value::Object(nulled), json!({"cpf": null, "nome": null}));
}
