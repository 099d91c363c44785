mod json_word_extractor;
mod text_sanitizer;

pub use json_word_extractor::JsonWordExtractor;
pub use text_sanitizer::sanitize_token_text;
