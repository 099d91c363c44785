use unicode_normalization::UnicodeNormalization;

/// NFKC-normalizes a token's text and collapses every whitespace run to a
/// single space. Returns an empty string for whitespace-only input.
pub fn sanitize_token_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}
