use serde::Deserialize;

use crate::application::ports::{WordExtractionError, WordExtractor};
use crate::domain::{Page, Token};

use super::text_sanitizer::sanitize_token_text;

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenDocument {
    Wrapped { pages: Vec<RawPage> },
    Bare(Vec<RawPage>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPage {
    Wrapped { tokens: Vec<Token> },
    Bare(Vec<Token>),
}

impl RawPage {
    fn into_tokens(self) -> Vec<Token> {
        match self {
            RawPage::Wrapped { tokens } | RawPage::Bare(tokens) => tokens,
        }
    }
}

/// Reads positioned words from a JSON token dump:
/// `{"pages":[{"tokens":[{"x0":..,"y0":..,"x1":..,"y1":..,"text":"..","bold":false}]}]}`
/// or a bare list of pages, where a page may itself be a bare token list.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWordExtractor;

impl JsonWordExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl WordExtractor for JsonWordExtractor {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<Page>, WordExtractionError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(WordExtractionError::Unsupported(
                "empty token document".to_string(),
            ));
        }

        let document: TokenDocument = serde_json::from_slice(data).map_err(|e| {
            WordExtractionError::ExtractionFailed(format!("invalid token JSON: {e}"))
        })?;
        let raw_pages = match document {
            TokenDocument::Wrapped { pages } | TokenDocument::Bare(pages) => pages,
        };

        let pages: Vec<Page> = raw_pages
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                let tokens = raw
                    .into_tokens()
                    .into_iter()
                    .filter_map(|mut token| {
                        token.text = sanitize_token_text(&token.text);
                        (!token.text.is_empty()).then_some(token)
                    })
                    .collect();
                Page::new(i + 1, tokens)
            })
            .collect();

        tracing::debug!(
            pages = pages.len(),
            tokens = pages.iter().map(Page::len).sum::<usize>(),
            "Token document parsed"
        );
        Ok(pages)
    }
}
