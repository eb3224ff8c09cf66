//! Page text extraction.
//!
//! ## Ordering
//!
//! Pages are visited `1..=N` exactly once each. Within a page, text items are
//! taken in the order the content stream yields them and joined with a
//! single space. Nothing is re-sorted by position: multi-column layouts come
//! out in whatever order the producer wrote them. Text drawn inside form
//! XObjects counts as page text and is taken where the form is placed.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a synchronous C++ library. [`PdfiumParser`] moves the whole
//! parse onto tokio's blocking pool so the async executor never stalls on a
//! large document.

use crate::error::ParseError;
use crate::output::PageText;
use crate::pipeline::engine;
use crate::pipeline::input::RawDocument;
use async_trait::async_trait;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// A parsed paginated document that exposes per-page text items.
pub trait TextContent {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text items of page `page_num` (1-indexed) in content-stream order.
    fn page_items(&self, page_num: usize) -> Result<Vec<String>, ParseError>;
}

/// Extract one [`PageText`] per page, in page order.
///
/// Fails as a whole if any page fails; no partial result is returned.
pub fn extract_pages<D>(doc: &D) -> Result<Vec<PageText>, ParseError>
where
    D: TextContent + ?Sized,
{
    let total = doc.page_count();
    let mut pages = Vec::with_capacity(total);
    for page_num in 1..=total {
        let items = doc.page_items(page_num)?;
        debug!("Page {}: {} text items", page_num, items.len());
        pages.push(PageText::new(page_num, items.join(" ")));
    }
    Ok(pages)
}

/// Turns a loaded document into page text.
///
/// The pipeline talks to this trait so the PDF engine can be swapped out,
/// e.g. for an in-memory document in tests.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, document: RawDocument) -> Result<Vec<PageText>, ParseError>;
}

/// [`DocumentParser`] backed by pdfium.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumParser;

#[async_trait]
impl DocumentParser for PdfiumParser {
    async fn parse(&self, document: RawDocument) -> Result<Vec<PageText>, ParseError> {
        tokio::task::spawn_blocking(move || parse_blocking(document.into_bytes()))
            .await
            .map_err(|e| ParseError::Task(e.to_string()))?
    }
}

/// Blocking implementation of [`PdfiumParser::parse`].
fn parse_blocking(bytes: Vec<u8>) -> Result<Vec<PageText>, ParseError> {
    let pdfium = engine::bind()?;
    let document = pdfium
        .load_pdf_from_byte_vec(bytes, None)
        .map_err(classify_load_error)?;

    let doc = PdfiumDocument {
        document: &document,
    };
    let pages = extract_pages(&doc)?;
    info!("Extracted text from {} pages", pages.len());
    Ok(pages)
}

fn classify_load_error(e: PdfiumError) -> ParseError {
    let detail = format!("{:?}", e);
    if detail.contains("Password") || detail.contains("password") {
        ParseError::PasswordProtected
    } else {
        ParseError::Malformed { detail }
    }
}

struct PdfiumDocument<'a, 'b> {
    document: &'b PdfDocument<'a>,
}

impl TextContent for PdfiumDocument<'_, '_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_items(&self, page_num: usize) -> Result<Vec<String>, ParseError> {
        let page = self
            .document
            .pages()
            .get((page_num - 1) as u16)
            .map_err(|e| ParseError::PageFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })?;

        let mut items = Vec::new();
        collect_text(page.objects().iter(), &mut items);
        Ok(items)
    }
}

/// A page-level content object: either text, a group of nested objects
/// (a form XObject), or something without text.
trait ContentObject: Sized {
    fn text(&self) -> Option<String>;
    fn children(&self) -> Option<Vec<Self>>;
}

impl ContentObject for PdfPageObject<'_> {
    fn text(&self) -> Option<String> {
        self.as_text_object().map(|text| text.text())
    }

    fn children(&self) -> Option<Vec<Self>> {
        match self {
            PdfPageObject::XObjectForm(form) => Some(
                (0..form.len())
                    .map_while(|index| form.get(index).ok())
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Append the text of `objects` in content order, descending into groups
/// where they appear.
fn collect_text<O, I>(objects: I, out: &mut Vec<String>)
where
    O: ContentObject,
    I: IntoIterator<Item = O>,
{
    for object in objects {
        if let Some(text) = object.text() {
            out.push(text);
        } else if let Some(children) = object.children() {
            collect_text(children, out);
        }
    }
}
