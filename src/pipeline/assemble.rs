//! Document text assembly.

use crate::output::{DocumentText, PageText};

/// Concatenate page texts, each followed by `\n`.
///
/// `pages` must already be in ascending page order; the extractor guarantees
/// it and it is not re-checked here. Zero pages assemble to `""`.
pub fn assemble(pages: &[PageText]) -> DocumentText {
    let capacity = pages.iter().map(|p| p.text.len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for page in pages {
        text.push_str(&page.text);
        text.push('\n');
    }
    DocumentText::from(text)
}
