//! Text rendering of the compliment card.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Card heading, personalised when a first name is known.
pub fn heading(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{name}, aqui está seu elogio!"),
        None => "Seu elogio personalizado".to_string(),
    }
}

/// Split after `.`, `!` or `?` followed by whitespace. Pieces are trimmed
/// and empty ones dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in RE_SENTENCE_END.find_iter(text) {
        // The punctuation is a single ASCII byte.
        out.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    out.push(&text[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Render the compliment card: heading, blank line, one sentence per line.
pub fn render_card(compliment: &str, name: Option<&str>) -> String {
    let mut card = heading(name);
    card.push_str("\n\n");
    for sentence in sentences(compliment) {
        card.push_str(sentence);
        card.push('\n');
    }
    card
}
