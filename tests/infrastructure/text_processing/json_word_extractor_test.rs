use anchorspan::application::ports::{WordExtractionError, WordExtractor};
use anchorspan::infrastructure::text_processing::JsonWordExtractor;

#[test]
fn given_wrapped_pages_when_extracting_then_pages_are_numbered_from_one() {
    let data = br#"{"pages": [
        {"tokens": [{"x0": 1, "y0": 2, "x1": 30, "y1": 14, "text": "Nome:", "bold": true}]},
        {"tokens": [{"x0": 1, "y0": 2, "x1": 30, "y1": 14, "text": "CPF"}]}
    ]}"#;

    let pages = JsonWordExtractor::new().extract_pages(data).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[1].number, 2);
    assert!(pages[0].tokens[0].bold);
    assert!(!pages[1].tokens[0].bold);
    assert_eq!(pages[0].tokens[0].bbox.x1, 30.0);
}

#[test]
fn given_bare_lists_when_extracting_then_pages_are_read() {
    let data = br#"[[{"x0": 0, "y0": 0, "x1": 10, "y1": 10, "text": "a"}]]"#;

    let pages = JsonWordExtractor::new().extract_pages(data).unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].tokens[0].text, "a");
}

#[test]
fn given_blank_and_noisy_tokens_when_extracting_then_text_is_cleaned_and_blanks_dropped() {
    let data = r#"{"pages": [{"tokens": [
        {"x0": 0, "y0": 0, "x1": 10, "y1": 10, "text": "   "},
        {"x0": 12, "y0": 0, "x1": 40, "y1": 10, "text": " ﬁcha\t n° "}
    ]}]}"#;

    let pages = JsonWordExtractor::new().extract_pages(data.as_bytes()).unwrap();

    assert_eq!(pages[0].len(), 1);
    assert_eq!(pages[0].tokens[0].text, "ficha n°");
}

#[test]
fn given_empty_input_when_extracting_then_unsupported() {
    let result = JsonWordExtractor::new().extract_pages(b"  \n");

    assert!(matches!(result, Err(WordExtractionError::Unsupported(_))));
}

#[test]
fn given_invalid_json_when_extracting_then_extraction_failed() {
    let result = JsonWordExtractor::new().extract_pages(b"%PDF-1.7");

    assert!(matches!(result, Err(WordExtractionError::ExtractionFailed(_))));
}
