//! First-name inference from résumé text.
//!
//! Three heuristics are tried in a fixed order and the first one that
//! captures something wins:
//!
//! 1. a `Nome:` label (`Nome completo:` too), case-insensitive
//! 2. a `Currículo de|do|da <nome>` title
//! 3. a short first line made only of letters and spaces
//!
//! The winning capture is trimmed and only its first space-separated token
//! is kept. Finding nothing is a normal outcome; this module has no error
//! path and no state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which heuristic produced the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// `Nome: …`
    Label,
    /// `Currículo de …`
    ResumeTitle,
    /// The document's first line.
    LeadingLine,
}

/// A probable first name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredName {
    /// First token of the candidate.
    pub first_name: String,
    /// The whole trimmed candidate, e.g. `"Maria Souza"`.
    pub candidate: String,
    /// The heuristic that matched.
    pub source: NameSource,
}

impl fmt::Display for InferredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.first_name)
    }
}

// Latin letters including the Latin-1 accented range, minus × and ÷.
macro_rules! letters {
    () => {
        "A-Za-zÀ-ÖØ-öø-ÿ"
    };
}

static RE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bnome(?:[ \t]+completo)?[ \t]*[:\t ][ \t]*([",
        letters!(),
        "][",
        letters!(),
        " ]*)"
    ))
    .unwrap()
});

static RE_RESUME_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bcurr[íi]culo[ \t]+d[eoa][ \t]+([",
        letters!(),
        "][",
        letters!(),
        " ]*)"
    ))
    .unwrap()
});

static RE_NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(concat!("^[", letters!(), " ]{2,30}$")).unwrap());

type Matcher = fn(&str) -> Option<&str>;

/// Heuristics in priority order.
const MATCHERS: &[(NameSource, Matcher)] = &[
    (NameSource::Label, labelled_name),
    (NameSource::ResumeTitle, resume_title),
    (NameSource::LeadingLine, leading_line),
];

/// Infer the document owner's first name.
pub fn infer_name(text: &str) -> Option<InferredName> {
    MATCHERS.iter().find_map(|(source, matcher)| {
        let candidate = matcher(text)?.trim();
        let first = candidate.split(' ').next().filter(|t| !t.is_empty())?;
        Some(InferredName {
            first_name: first.to_string(),
            candidate: candidate.to_string(),
            source: *source,
        })
    })
}

/// Shorthand for [`infer_name`] returning just the first name.
pub fn infer_first_name(text: &str) -> Option<String> {
    infer_name(text).map(|n| n.first_name)
}

// `Nome completo:` with nothing usable after it lets the optional qualifier
// backtrack into the capture; such a match is skipped.
fn labelled_name(text: &str) -> Option<&str> {
    RE_LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.trim().is_empty())
        .find(|s| {
            !s.split_whitespace()
                .next()
                .is_some_and(|first| first.eq_ignore_ascii_case("completo"))
        })
}

fn resume_title(text: &str) -> Option<&str> {
    capture(&RE_RESUME_TITLE, text)
}

fn leading_line(text: &str) -> Option<&str> {
    let line = text.split('\n').next()?.trim();
    RE_NAME_LINE.is_match(line).then_some(line)
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wins() {
        let n = infer_name("Nome: Maria Souza\nTelefone: 1234").unwrap();
        assert_eq!(n.first_name, "Maria");
        assert_eq!(n.candidate, "Maria Souza");
        assert_eq!(n.source, NameSource::Label);
    }

    #[test]
    fn label_is_case_insensitive_and_accepts_completo() {
        assert_eq!(
            infer_first_name("NOME COMPLETO: Álvaro Gonçalves\n").as_deref(),
            Some("Álvaro")
        );
        assert_eq!(infer_first_name("nome   Inês\n").as_deref(), Some("Inês"));
    }

    #[test]
    fn completo_is_never_taken_as_the_name() {
        assert_eq!(infer_name("Nome completo:\nAna Silva\n"), None);
        assert_eq!(infer_name("Nome completo: 12345\nMaria Souza\n"), None);
        assert_eq!(
            infer_first_name("NOME COMPLETO:\nCurrículo de João Pereira\n").as_deref(),
            Some("João")
        );
    }

    #[test]
    fn later_label_is_used_when_first_is_empty() {
        let n = infer_name("Nome completo:\nNome: Carla Reis\n").unwrap();
        assert_eq!(n.first_name, "Carla");
        assert_eq!(n.source, NameSource::Label);
    }

    #[test]
    fn label_must_be_a_whole_word() {
        // "Sobrenome" is not a name label and nothing else matches.
        assert_eq!(
            infer_first_name("Sobrenome: Souza 123\nmais texto"),
            None
        );
    }

    #[test]
    fn label_capture_stops_at_end_of_line() {
        let n = infer_name("Nome:\nEXPERIÊNCIA\n").map(|n| n.source);
        assert_ne!(n, Some(NameSource::Label));
    }

    #[test]
    fn resume_title_when_no_label() {
        let n = infer_name("Currículo de João Pereira\nExperiência 2020").unwrap();
        assert_eq!(n.first_name, "João");
        assert_eq!(n.source, NameSource::ResumeTitle);
    }

    #[test]
    fn resume_title_accepts_do_da_and_unaccented() {
        assert_eq!(
            infer_first_name("curriculo da Fernanda Lima 2024").as_deref(),
            Some("Fernanda")
        );
        assert_eq!(
            infer_first_name("CURRÍCULO DO PEDRO\n").as_deref(),
            Some("PEDRO")
        );
    }

    #[test]
    fn label_beats_resume_title() {
        let text = "Currículo de João Pereira\nNome: Maria Souza\n";
        assert_eq!(infer_first_name(text).as_deref(), Some("Maria"));
    }

    #[test]
    fn leading_line_fallback() {
        let n = infer_name("Ana Silva\nDesenvolvedora 2020-2024\n").unwrap();
        assert_eq!(n.first_name, "Ana");
        assert_eq!(n.source, NameSource::LeadingLine);
    }

    #[test]
    fn leading_line_is_trimmed() {
        assert_eq!(
            infer_first_name("   Bruno Alves  \r\nResumo\n").as_deref(),
            Some("Bruno")
        );
    }

    #[test]
    fn leading_line_too_long_or_with_digits_is_rejected() {
        assert_eq!(
            infer_first_name("Maria Eduarda dos Santos Oliveira Costa\nresto"),
            None
        );
        assert_eq!(infer_first_name("Ana Silva 2024\nresto"), None);
        assert_eq!(infer_first_name("A\nresto"), None);
    }

    #[test]
    fn leading_line_length_bounds_are_inclusive() {
        assert_eq!(infer_first_name("Al\n").as_deref(), Some("Al"));
        let thirty = "Abcdefghij Abcdefghij Abcdefgh";
        assert_eq!(thirty.chars().count(), 30);
        assert_eq!(
            infer_first_name(&format!("{thirty}\n")).as_deref(),
            Some("Abcdefghij")
        );
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(infer_name(""), None);
        assert_eq!(infer_name("\nExperiência profissional 2019"), None);
    }

    #[test]
    fn inference_is_pure() {
        let text = "Currículo de João Pereira\n";
        assert_eq!(infer_name(text), infer_name(text));
    }
}
