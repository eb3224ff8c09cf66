//! # elogio
//!
//! Read a résumé PDF and get back a short, personalised compliment.
//!
//! The text of every page is extracted with pdfium, joined into one
//! document, and sent to a compliment backend: the hosted JSON service by
//! default, or any `edgequake-llm` provider. A first name is inferred from
//! the same text so the result can be addressed to the person.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Load      drain the byte source into memory
//!  ├─ 2. Extract   per-page text via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Assemble  pages in order, each followed by a newline
//!  ├─ 4. Name      label / résumé title / leading-line heuristics
//!  └─ 5. Generate  one request; on failure, a fixed fallback compliment
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elogio::{display, process_document, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     elogio::pipeline::engine::init()?;
//!     let report = process_document("curriculo.pdf", &PipelineConfig::default()).await?;
//!     print!("{}", display::render_card(report.compliment.text(), report.first_name()));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `elogio` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! elogio = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod display;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;
pub mod session;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GeneratorBackend, PipelineConfig, PipelineConfigBuilder};
pub use error::{ElogioError, GenerationError, ParseError, ReadError, UploadError};
pub use output::{ComplimentResult, DocumentText, PageText, RunReport, RunStats};
pub use pipeline::input::{open_input, DocumentSource};
pub use pipeline::name::{infer_first_name, infer_name, InferredName, NameSource};
pub use progress::{NoopObserver, Notification, NotificationLevel, RunObserver, SharedObserver};
pub use run::{process_bytes, process_document, Pipeline};
pub use session::{RunHandle, Session, SessionView};
pub use state::RunState;
