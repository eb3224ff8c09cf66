//! Document loading and intake.
//!
//! Two layers live here:
//!
//! * The **loader** ([`load_document`]) drains any async byte source into a
//!   [`RawDocument`] before parsing starts. No partial parse, no
//!   validation: whatever the source yields is the document.
//! * The **intake** ([`open_input`]) is what a front end runs before a
//!   submission. It resolves a local path or an HTTP(S) URL into a
//!   [`DocumentSource`] and refuses empty, oversized or non-PDF files the
//!   way the upload widget does. Runs never re-check these limits.

use crate::config::PipelineConfig;
use crate::error::{ElogioError, ReadError, UploadError};
use futures::StreamExt;
use std::io::{Cursor, SeekFrom};
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, ReadBuf};
use tracing::{debug, info};

const PDF_MAGIC: &[u8] = b"%PDF";

/// The uploaded file, fully read into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct RawDocument {
    bytes: Vec<u8>,
}

impl RawDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for RawDocument {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl std::fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawDocument")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Read `reader` to the end.
///
/// Any error from the source aborts the load; the bytes read so far are
/// discarded.
pub async fn load_document<R>(mut reader: R) -> Result<RawDocument, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    debug!("Loaded document: {} bytes", bytes.len());
    Ok(RawDocument { bytes })
}

/// A validated document ready to be submitted.
#[derive(Debug)]
pub enum DocumentSource {
    /// A local file, positioned at its start.
    File(tokio::fs::File),
    /// A downloaded or in-memory document.
    Memory(Cursor<Vec<u8>>),
}

impl DocumentSource {
    /// Wrap bytes that are already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        DocumentSource::Memory(Cursor::new(bytes))
    }
}

impl AsyncRead for DocumentSource {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            DocumentSource::File(f) => Pin::new(f).poll_read(cx, buf),
            DocumentSource::Memory(c) => Pin::new(c).poll_read(cx, buf),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Apply the upload rules: non-empty, at most `limit` bytes, PDF magic.
///
/// `head` is the first bytes of the file (at least four when available).
pub fn check_upload(size: u64, head: &[u8], limit: u64) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    if !head.starts_with(PDF_MAGIC) {
        return Err(UploadError::NotAPdf {
            magic: head.iter().take(PDF_MAGIC.len()).copied().collect(),
        });
    }
    Ok(())
}

/// Resolve a path or URL into a validated [`DocumentSource`].
pub async fn open_input(
    input: &str,
    config: &PipelineConfig,
) -> Result<DocumentSource, ElogioError> {
    if is_url(input) {
        let bytes = download_url(
            input,
            config.download_timeout_secs,
            config.max_upload_bytes,
        )
        .await?;
        check_upload(bytes.len() as u64, &bytes, config.max_upload_bytes)?;
        Ok(DocumentSource::from_bytes(bytes))
    } else {
        open_local(input, config.max_upload_bytes).await
    }
}

/// Open a local file, validate it, and rewind it for the loader.
async fn open_local(path_str: &str, limit: u64) -> Result<DocumentSource, ElogioError> {
    let path = PathBuf::from(path_str);
    let map_open_err = |e: std::io::Error, path: PathBuf| match e.kind() {
        std::io::ErrorKind::NotFound => ReadError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => ReadError::PermissionDenied { path },
        _ => ReadError::Io { source: e },
    };

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|e| map_open_err(e, path.clone()))?;
    let mut file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| map_open_err(e, path.clone()))?;

    let mut head = Vec::with_capacity(PDF_MAGIC.len());
    (&mut file)
        .take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut head)
        .await
        .map_err(ReadError::from)?;
    check_upload(meta.len(), &head, limit)?;

    file.seek(SeekFrom::Start(0))
        .await
        .map_err(ReadError::from)?;

    debug!("Resolved local PDF: {} ({} bytes)", path.display(), meta.len());
    Ok(DocumentSource::File(file))
}

/// Download a URL into memory, giving up as soon as it is known to exceed
/// `limit` bytes.
async fn download_url(
    url: &str,
    timeout_secs: u64,
    limit: u64,
) -> Result<Vec<u8>, ElogioError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ReadError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let to_read_error = |e: reqwest::Error| {
        if e.is_timeout() {
            ReadError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ReadError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(to_read_error)?;

    if !response.status().is_success() {
        return Err(ReadError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        }
        .into());
    }

    if let Some(size) = response.content_length() {
        if size > limit {
            return Err(UploadError::TooLarge { size, limit }.into());
        }
    }

    let mut bytes = Vec::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(to_read_error)?;
        let size = (bytes.len() + chunk.len()) as u64;
        if size > limit {
            debug!("Download of {} passed {} bytes; aborting", url, limit);
            return Err(UploadError::TooLarge { size, limit }.into());
        }
        bytes.extend_from_slice(&chunk);
    }

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}
