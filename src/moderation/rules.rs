//! Controlli statici sul testo di un annuncio (spam, contenuti per adulti, link, testo casuale)
//!
//! Ogni controllo fallito aggiunge un motivo in polacco, mostrato all'autore.

use lazy_static::lazy_static;
use regex::Regex;

const MIN_TITLE_CHARS: usize = 10;
const MIN_DESCRIPTION_CHARS: usize = 20;
const MAX_EMOJI: usize = 10;
const MAX_EXCLAMATIONS: usize = 10;
const MAX_WORD_CHARS: usize = 30;

/// Periodo massimo cercato per le sequenze ripetute
const MAX_REPEAT_PERIOD: usize = 20;

lazy_static! {
    static ref SPAM_RES: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(viagra|cialis|casino|lottery|winner)\b").unwrap(),
        Regex::new(r"(?i)\b(click here|buy now|limited offer)\b").unwrap(),
        Regex::new(r"(?i)\b(super okazja|najleps|gwarantujemy|pilnie pilnie|dzwoń teraz)\b").unwrap(),
        Regex::new(r"(?i)\b(bez faktury|gotówką od ręki)\b").unwrap(),
    ];
    static ref ADULT_RES: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(seks|sex|ruchanie|pieprzenie|jebanie|kurwa|anal|oralny|cipka|pizda|chuj|kutas|penis|wagina)\b").unwrap(),
        Regex::new(r"(?i)\b(escort|prostytutka|dziwka|masaż erotyczny|masaz erotyczny|spotkania intymne)\b").unwrap(),
        Regex::new(r"(?i)\b(orgazm|wytrysk|masturbacja|porno|pornografia|gangbang|blowjob|lodzik|lodzika)\b").unwrap(),
        Regex::new(r"(?i)\b(onanizm|fetysz|bdsm|dominacja|bondage|swingers|biseksualn|gej|lesbijk)\b").unwrap(),
        Regex::new(r"(?i)\b(kamgirl|camgirl|onlyfans|webcam|striptiz|striptizerka|lap dance)\b").unwrap(),
    ];
    static ref URL_RES: Vec<Regex> = vec![
        Regex::new(r"(?i)https?://\S+").unwrap(),
        Regex::new(r"(?i)www\.\S+").unwrap(),
        Regex::new(r"(?i)[a-z0-9-]+\.(com|pl|org|net|io|co|eu|de)\S*").unwrap(),
    ];
    static ref KEYBOARD_RES: Vec<Regex> = vec![
        Regex::new(r"(?i)qwert|asdfg|zxcvb").unwrap(),
        Regex::new(r"(?i)poiuy|lkjhg|mnbvc").unwrap(),
        Regex::new(r"(?i)wertyuiop|sdfghjkl|xcvbnm").unwrap(),
    ];
}

/// Motivi di violazione; vuoto se il testo supera tutti i controlli
pub fn check_text(title: &str, description: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    let full_text = format!("{} {}", title, description);

    let title_len = title.chars().count();
    if title_len < MIN_TITLE_CHARS {
        reasons.push(format!("Tytuł zbyt krótki (min. {} znaków)", MIN_TITLE_CHARS));
    }
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        reasons.push(format!("Opis zbyt krótki (min. {} znaków)", MIN_DESCRIPTION_CHARS));
    }

    let uppercase = title.chars().filter(|c| c.is_uppercase()).count();
    if title_len > MIN_TITLE_CHARS && uppercase as f64 / title_len as f64 > 0.7 {
        reasons.push("Zbyt dużo wielkich liter w tytule".to_string());
    }

    if ADULT_RES.iter().any(|re| re.is_match(&full_text)) {
        reasons.push("Treści dla dorosłych nie są dozwolone".to_string());
    }

    let spam_patterns = SPAM_RES.iter().filter(|re| re.is_match(&full_text)).count()
        + usize::from(has_char_run(&full_text, 6));
    if spam_patterns > 0 {
        reasons.push(format!("Wykryto {} wzorców spamu", spam_patterns));
    }

    let urls: usize = URL_RES.iter().map(|re| re.find_iter(&full_text).count()).sum();
    if urls > 0 {
        reasons.push(format!("Wykryto {} linków (linki nie są dozwolone)", urls));
    }

    let emoji = full_text
        .chars()
        .filter(|c| ('\u{1F300}'..='\u{1F9FF}').contains(c))
        .count();
    if emoji > MAX_EMOJI {
        reasons.push("Zbyt dużo emoji".to_string());
    }
    if full_text.matches('!').count() > MAX_EXCLAMATIONS {
        reasons.push("Zbyt dużo wykrzykników".to_string());
    }

    let words: Vec<&str> = description.split_whitespace().collect();
    let short_words = words.iter().filter(|w| w.chars().count() < 3).count();
    if words.len() > 5 && short_words as f64 / words.len() as f64 > 0.7 {
        reasons.push("Opis wygląda na bezsensowny".to_string());
    }

    if let Some(ratio) = vowel_ratio(&full_text) {
        // tekst polski ha circa il 38-45% di vocali
        if !(0.15..=0.60).contains(&ratio) {
            reasons.push("Tekst zawiera zbyt wiele losowych znaków".to_string());
        }
    }

    if words.iter().any(|w| w.chars().count() > MAX_WORD_CHARS) {
        reasons.push("Wykryto podejrzanie długie słowa (możliwy spam)".to_string());
    }

    if has_repeated_sequence(&full_text, 4) {
        reasons.push("Wykryto powtarzające się wzorce".to_string());
    }

    let keyboard_mash: usize = KEYBOARD_RES
        .iter()
        .map(|re| re.find_iter(&full_text).count())
        .sum();
    if keyboard_mash >= 2 {
        reasons.push("Tekst wygląda na przypadkowe uderzenia w klawiaturę".to_string());
    }

    reasons
}

/// Rapporto vocali/lettere polacche, `None` sotto le 21 lettere
fn vowel_ratio(text: &str) -> Option<f64> {
    let letters: Vec<char> = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || "ąćęłńóśźż".contains(*c))
        .collect();
    if letters.len() <= 20 {
        return None;
    }
    let vowels = letters.iter().filter(|c| "aąeęioóuy".contains(**c)).count();
    Some(vowels as f64 / letters.len() as f64)
}

/// Stesso carattere ripetuto almeno `min_len` volte di seguito
fn has_char_run(text: &str, min_len: usize) -> bool {
    let mut run = 0;
    let mut previous = None;
    for c in text.chars().flat_map(char::to_lowercase) {
        if Some(c) == previous {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run >= min_len {
            return true;
        }
    }
    false
}

/// Sequenza di almeno 2 caratteri ripetuta `times` volte consecutive
fn has_repeated_sequence(text: &str, times: usize) -> bool {
    let chars: Vec<char> = text.chars().collect();
    for period in 2..=MAX_REPEAT_PERIOD {
        let span = period * times;
        if span > chars.len() {
            break;
        }
        for start in 0..=chars.len() - span {
            let unit = &chars[start..start + period];
            if (1..times).all(|k| &chars[start + k * period..start + (k + 1) * period] == unit) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_TITLE: &str = "Naprawa kranów w Krakowie";
    const CLEAN_DESCRIPTION: &str =
        "Szybka i solidna naprawa kranów oraz baterii łazienkowych, dojazd do klienta gratis.";

    #[test]
    fn clean_post_passes() {
        assert!(check_text(CLEAN_TITLE, CLEAN_DESCRIPTION).is_empty());
    }

    #[test]
    fn short_fields_are_reported() {
        let reasons = check_text("Kran", "Naprawa");
        assert!(reasons.contains(&"Tytuł zbyt krótki (min. 10 znaków)".to_string()));
        assert!(reasons.contains(&"Opis zbyt krótki (min. 20 znaków)".to_string()));
    }

    #[test]
    fn links_are_counted() {
        let reasons = check_text(CLEAN_TITLE, "Więcej informacji na stronie https://example.com oraz tutaj");
        assert!(reasons.iter().any(|r| r.starts_with("Wykryto") && r.contains("linków")));
    }

    #[test]
    fn adult_content_is_rejected() {
        let reasons = check_text("Masaż erotyczny w centrum", CLEAN_DESCRIPTION);
        assert!(reasons.contains(&"Treści dla dorosłych nie są dozwolone".to_string()));
    }

    #[test]
    fn spam_phrases_and_character_runs_are_counted() {
        let reasons = check_text(CLEAN_TITLE, "Super okazja, dzwoń teraz!!! Naprawa kranów aaaaaaa");
        assert!(reasons.contains(&"Wykryto 2 wzorców spamu".to_string()));
    }

    #[test]
    fn shouting_title_is_reported() {
        let reasons = check_text("NAPRAWA KRANÓW TANIO", CLEAN_DESCRIPTION);
        assert!(reasons.contains(&"Zbyt dużo wielkich liter w tytule".to_string()));
    }

    #[test]
    fn keyboard_mashing_is_detected() {
        let reasons = check_text(CLEAN_TITLE, "qwerty asdfgh naprawa kranów i baterii");
        assert!(reasons.contains(&"Tekst wygląda na przypadkowe uderzenia w klawiaturę".to_string()));
    }

    #[test]
    fn repeated_sequences_are_detected() {
        assert!(has_repeated_sequence("abababab", 4));
        assert!(has_repeated_sequence("x 123123123123 y", 4));
        assert!(!has_repeated_sequence("ababab", 4));
    }

    #[test]
    fn consonant_soup_fails_the_vowel_ratio() {
        let reasons = check_text(CLEAN_TITLE, "xkcd brrr pfft grr hmm szcz tsk krw trzmsl bzdrk pstrk");
        assert!(reasons.contains(&"Tekst zawiera zbyt wiele losowych znaków".to_string()));
    }
}
