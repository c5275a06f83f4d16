//! Normalizzazione dell'input testuale condivisa dai DTO

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref LIKE_SPECIAL_RE: Regex = Regex::new(r"([\\%_])").unwrap();
}

/// Trim e collasso degli spazi multipli. Ritorna `None` se il testo resta vuoto.
pub fn normalize_text(input: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(input.trim(), " ").into_owned();
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Escape dei caratteri speciali di LIKE/ILIKE (`\`, `%`, `_`)
pub fn escape_like(input: &str) -> String {
    LIKE_SPECIAL_RE.replace_all(input, r"\$1").into_owned()
}
