use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_CHARS: usize = 100;

static CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(bearer\s+|api[-_]key[:=]\s*|password=|secret=|token=)[^\s&"']+"#).unwrap()
});

/// CPF, with or without punctuation.
static CPF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}\.?\d{3}\.?\d{3}-?\d{2}\b").unwrap());

/// Shortens prompt or answer text for logging and masks credentials and
/// CPF numbers.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let visible = match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((cut, _)) => format!(
            "{}... ({} chars total)",
            &trimmed[..cut],
            trimmed.chars().count()
        ),
        None => trimmed.to_string(),
    };

    let redacted = CREDENTIAL.replace_all(&visible, "${1}[REDACTED]");
    CPF.replace_all(&redacted, "[CPF]").into_owned()
}
