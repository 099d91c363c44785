use std::sync::LazyLock;

use regex::Regex;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\(?\d{2}\)?\s*)?\d{4,5}[-\s]?\d{4}\b").unwrap());
static SHORT_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{3,6}\b").unwrap());
static CPF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}\.?\d{3}\.\d{3}-?\d{2}\b").unwrap());
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-3]?\d[/.-][01]?\d[/.-][12]\d{3}\b").unwrap());

const REGISTRATION_HINTS: [&str; 4] = ["inscricao", "n_registro", "registro", "oab"];

/// Pattern-matches well-formed values (phones, registration numbers, CPFs,
/// dates) straight out of a context window, keyed by hints in the field key.
pub fn fast_path_value(key: &str, context: &str) -> Option<String> {
    let key = key.to_lowercase();
    let rules: [(bool, &Regex); 4] = [
        (key.contains("telefone"), &*PHONE),
        (REGISTRATION_HINTS.iter().any(|h| key.contains(h)), &*SHORT_NUMBER),
        (key.contains("cpf"), &*CPF),
        (key.contains("data"), &*DATE),
    ];
    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .find_map(|(_, pattern)| pattern.find(context))
        .map(|m| m.as_str().to_string())
}

