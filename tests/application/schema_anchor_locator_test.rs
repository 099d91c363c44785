use anchorspan::application::services::locate_schema_anchor;
use anchorspan::domain::{AnchorOrigin, ExtractionLimits};

use crate::helpers::fixtures::{line, page, word};

#[test]
fn given_label_with_colon_when_locating_then_anchor_covers_label_token() {
    let page = page(line(10.0, 10.0, &["Nome:", "Maria", "Silva"]));

    let anchor = locate_schema_anchor("nome", &page, &ExtractionLimits::default()).unwrap();

    assert_eq!(anchor.origin, AnchorOrigin::Schema);
    assert_eq!(anchor.label_span.iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(anchor.score, 10.0);
}

#[test]
fn given_label_split_over_tokens_when_locating_then_window_covers_both() {
    let page = page(line(10.0, 10.0, &["Data", "Nascimento:", "10/05/1990"]));

    let anchor =
        locate_schema_anchor("data_nascimento", &page, &ExtractionLimits::default()).unwrap();

    assert_eq!(anchor.label_span.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn given_only_first_word_printed_when_locating_then_single_word_matches_exactly() {
    let page = page(line(10.0, 10.0, &["Data", "de", "Nascimento:", "10/05/1990"]));

    let anchor =
        locate_schema_anchor("data_nascimento", &page, &ExtractionLimits::default()).unwrap();

    assert_eq!(anchor.label_span.iter().copied().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn given_abbreviated_label_when_locating_then_matches_dotted_prefix() {
    let page = page(line(10.0, 10.0, &["Data", "Nasc.", "10/05/1990"]));

    let anchor =
        locate_schema_anchor("data_nascimento", &page, &ExtractionLimits::default()).unwrap();

    assert_eq!(anchor.label_span.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn given_exact_and_containing_windows_when_locating_then_exact_wins() {
    let page = page(vec![
        word(10.0, 10.0, "Cpfs"),
        word(10.0, 60.0, "CPF"),
        word(60.0, 60.0, "123.456.789-09"),
    ]);

    let anchor = locate_schema_anchor("cpf", &page, &ExtractionLimits::default()).unwrap();

    assert_eq!(anchor.label_span.iter().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn given_page_without_label_when_locating_then_returns_none() {
    let page = page(line(10.0, 10.0, &["Rua", "das", "Flores"]));

    assert!(locate_schema_anchor("telefone", &page, &ExtractionLimits::default()).is_none());
}

#[test]
fn given_empty_page_when_locating_then_returns_none() {
    let page = page(Vec::new());

    assert!(locate_schema_anchor("nome", &page, &ExtractionLimits::default()).is_none());
}
