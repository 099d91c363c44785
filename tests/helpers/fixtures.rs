use anchorspan::domain::{BoundingBox, Page, Token};

pub const GLYPH_WIDTH: f64 = 7.0;
pub const LINE_HEIGHT: f64 = 12.0;

/// A regular-weight word of height 12 whose box starts at `(x, y)`.
pub fn word(x: f64, y: f64, text: &str) -> Token {
    let width = GLYPH_WIDTH * text.chars().count() as f64;
    Token::new(BoundingBox::new(x, y, x + width, y + LINE_HEIGHT), text, false)
}

pub fn bold_word(x: f64, y: f64, text: &str) -> Token {
    Token {
        bold: true,
        ..word(x, y, text)
    }
}

/// Words laid out left to right on one line with a 5-unit gap.
pub fn line(x: f64, y: f64, words: &[&str]) -> Vec<Token> {
    let mut cursor = x;
    words
        .iter()
        .map(|w| {
            let token = word(cursor, y, w);
            cursor = token.bbox.x1 + 5.0;
            token
        })
        .collect()
}

pub fn page(tokens: Vec<Token>) -> Page {
    Page::new(1, tokens)
}

pub fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Serialized token dump in the shape the JSON word extractor reads.
pub fn token_document(pages: &[Page]) -> Vec<u8> {
    let pages: Vec<serde_json::Value> = pages
        .iter()
        .map(|p| serde_json::json!({ "tokens": p.tokens }))
        .collect();
    serde_json::to_vec(&serde_json::json!({ "pages": pages })).unwrap()
}

/// "Nome: Maria Silva" over "CPF: 123.456.789-00".
pub fn registration_page() -> Page {
    let mut tokens = line(10.0, 10.0, &["Nome:", "Maria", "Silva"]);
    tokens.extend(line(10.0, 30.0, &["CPF:", "123.456.789-00"]));
    page(tokens)
}
