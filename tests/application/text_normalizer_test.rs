use anchorspan::application::services::label_variants;
use anchorspan::application::services::text_normalizer::{
    head_tail, normalize_label, normalize_text, sanitize_value_text, split_key_words,
    truncate_chars,
};

#[test]
fn given_same_key_when_generating_variants_twice_then_lists_are_identical() {
    assert_eq!(label_variants("data_nascimento"), label_variants("data_nascimento"));
}

#[test]
fn given_key_when_generating_variants_then_list_is_non_empty_and_longest_first() {
    let variants = label_variants("dataNascimento");

    assert!(!variants.is_empty());
    for pair in variants.windows(2) {
        let (a, b) = (pair[0].chars().count(), pair[1].chars().count());
        assert!(a > b || (a == b && pair[0] < pair[1]), "{pair:?}");
    }
}

#[test]
fn given_key_when_generating_variants_then_common_printed_forms_are_included() {
    let variants = label_variants("data_nascimento");

    for expected in ["data nascimento", "datanascimento", "data. nasc.", "dat. nas.", "data"] {
        assert!(variants.iter().any(|v| v == expected), "missing {expected}");
    }
}

#[test]
fn given_key_with_accents_when_generating_variants_then_they_are_stripped() {
    let variants = label_variants("Endereço");

    assert!(variants.iter().any(|v| v == "endereco"));
    assert!(variants.iter().all(|v| !v.contains('ç')));
}

#[test]
fn given_key_without_words_when_generating_variants_then_list_is_empty() {
    assert!(label_variants("__").is_empty());
}

#[test]
fn given_variants_when_listing_then_there_are_no_duplicates() {
    let variants = label_variants("numero_inscricao");
    let mut deduped = variants.clone();
    deduped.sort();
    deduped.dedup();

    assert_eq!(deduped.len(), variants.len());
}

#[test]
fn given_camel_and_snake_keys_when_splitting_then_words_match() {
    assert_eq!(split_key_words("dataNascimento"), "data Nascimento");
    assert_eq!(split_key_words("data_nascimento"), "data nascimento");
}

#[test]
fn given_label_with_punctuation_when_normalizing_then_symbols_become_spaces() {
    assert_eq!(normalize_label("N°  Inscrição:"), "n inscricao");
    assert_eq!(normalize_text("  São   PAULO "), "sao paulo");
}

#[test]
fn given_value_with_label_prefix_when_sanitizing_then_prefix_is_removed() {
    assert_eq!(sanitize_value_text(": Maria Silva"), "Maria Silva");
    assert_eq!(sanitize_value_text("Nome: Maria Silva"), "Maria Silva");
    assert_eq!(sanitize_value_text("— 10/05/1990"), "10/05/1990");
    assert_eq!(sanitize_value_text("Rua das Flores, 12"), "Rua das Flores, 12");
}

#[test]
fn given_multibyte_text_when_truncating_then_cut_lands_on_char_boundary() {
    assert_eq!(truncate_chars("ação", 2), "aç");
    assert_eq!(truncate_chars("abc", 10), "abc");
}

#[test]
fn given_long_text_when_keeping_head_and_tail_then_middle_is_elided() {
    assert_eq!(head_tail("abcdefghij", 3, 2, "|"), "abc|ij");
    assert_eq!(head_tail("abcde", 3, 2, "|"), "abcde");
}
