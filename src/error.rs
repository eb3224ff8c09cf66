//! Error types for the elogio library.
//!
//! The taxonomy mirrors the pipeline stages:
//!
//! * [`ReadError`]: the byte source could not be read completely.
//! * [`ParseError`]: the buffer is not a readable PDF, or one of its pages
//!   could not be decoded.
//! * [`GenerationError`]: the compliment backend failed. This one is
//!   **recovered**: the orchestrator substitutes the configured fallback
//!   compliment and keeps the error inside
//!   [`crate::output::ComplimentResult::Fallback`] for reporting.
//! * [`UploadError`]: the intake refused the file before a run started.
//!
//! [`ElogioError`] is the fatal umbrella returned by run entry points. Name
//! inference has no error type: not finding a name is a normal outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by a processing run or by the intake.
#[derive(Debug, Error)]
pub enum ElogioError {
    /// The document could not be loaded.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The intake refused the document.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A newer submission replaced this run before it finished.
    #[error("Run {run} was superseded by a newer submission")]
    Superseded { run: u64 },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The byte source could not be fully read.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader returned an error mid-stream.
    #[error("Failed to read document: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP download of a remote document failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },
}

impl From<std::io::Error> for ReadError {
    fn from(source: std::io::Error) -> Self {
        ReadError::Io { source }
    }
}

/// The document buffer could not be turned into page text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No pdfium library could be bound.
    #[error(
        "PDF engine unavailable: {0}\n\
Install libpdfium system-wide, place it next to the executable,\n\
or set PDFIUM_LIB_PATH=/path/to/libpdfium."
    )]
    EngineUnavailable(String),

    /// Header/trailer/xref is corrupt, or the bytes are not a PDF at all.
    #[error("Document is not a readable PDF: {detail}")]
    Malformed { detail: String },

    /// The PDF is encrypted with a user password.
    #[error("Document is password protected")]
    PasswordProtected,

    /// A single page could not be decoded; the whole extraction fails.
    #[error("Page {page} could not be read: {detail}")]
    PageFailed { page: usize, detail: String },

    /// The blocking extraction task died.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// The compliment backend failed. Recovered with a fallback compliment.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum GenerationError {
    /// Connection, DNS or TLS failure.
    #[error("Compliment service unreachable: {detail}")]
    Transport { detail: String },

    /// The optional request timeout elapsed.
    #[error("Compliment request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Non-2xx HTTP status.
    #[error("Compliment service answered HTTP {status}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON object.
    #[error("Malformed compliment response: {detail}")]
    MalformedBody { detail: String },

    /// The LLM provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM provider returned an error.
    #[error("LLM API error: {message}")]
    Provider { message: String },
}

/// Rejections made by the intake before a run starts.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Zero-byte upload.
    #[error("File is empty")]
    Empty,

    /// The file exceeds the configured size cap.
    #[error("File is {size} bytes; the maximum is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The file does not start with the PDF magic bytes.
    #[error("File is not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },
}
