//! Orchestration of a single processing run.
//!
//! [`Pipeline::run`] walks one document through
//! `Loading → Extracting → Generating → Done | Failed`:
//!
//! ```text
//! source ─► load ─► parse pages ─► assemble ─┬─► infer name ────┐
//!                                            └─► generate ──────┴─► RunReport
//! ```
//!
//! Load and parse failures abort the run with an error. A generation failure
//! does not: the configured fallback compliment is used, the run ends in
//! `Failed`, and the observer gets a single error notification.
//!
//! For the one-shot helpers ([`process_document`], [`process_bytes`]) see
//! below; for single-flight use across repeated submissions see
//! [`crate::session::Session`].

use crate::config::PipelineConfig;
use crate::error::ElogioError;
use crate::output::{ComplimentResult, RunReport, RunStats};
use crate::pipeline::assemble::assemble;
use crate::pipeline::extract::{DocumentParser, PdfiumParser};
use crate::pipeline::generate::{self, ComplimentGenerator};
use crate::pipeline::{input, name};
use crate::progress::{Notification, NoopObserver, RunObserver};
use crate::state::RunState;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

/// The pipeline's collaborators and configuration.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    parser: Arc<dyn DocumentParser>,
    generator: Arc<dyn ComplimentGenerator>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// A pipeline with the pdfium parser and the backend named in `config`.
    pub fn new(config: PipelineConfig) -> Result<Self, ElogioError> {
        let generator = generate::from_config(&config)
            .map_err(|e| ElogioError::InvalidConfig(e.to_string()))?;
        Ok(Self::with_components(config, Arc::new(PdfiumParser), generator))
    }

    /// A pipeline with explicit collaborators.
    pub fn with_components(
        config: PipelineConfig,
        parser: Arc<dyn DocumentParser>,
        generator: Arc<dyn ComplimentGenerator>,
    ) -> Self {
        Self {
            config,
            parser,
            generator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one document.
    ///
    /// # Errors
    /// Only load and parse failures are returned as `Err`. A failed
    /// generation still returns `Ok` with
    /// [`ComplimentResult::Fallback`].
    pub async fn run<R>(
        &self,
        run_id: u64,
        source: R,
        observer: &dyn RunObserver,
    ) -> Result<RunReport, ElogioError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let total_start = Instant::now();
        info!("Run {}: started", run_id);

        // ── Load ─────────────────────────────────────────────────────────
        observer.on_state_change(run_id, RunState::Loading);
        let load_start = Instant::now();
        let raw = match input::load_document(source).await {
            Ok(raw) => raw,
            Err(e) => return Err(abort(run_id, observer, e.into())),
        };
        let load_duration_ms = load_start.elapsed().as_millis() as u64;
        let document_bytes = raw.len();
        debug!("Run {}: loaded {} bytes", run_id, document_bytes);

        // ── Extract + assemble ───────────────────────────────────────────
        observer.on_state_change(run_id, RunState::Extracting);
        let extract_start = Instant::now();
        let pages = match self.parser.parse(raw).await {
            Ok(pages) => pages,
            Err(e) => return Err(abort(run_id, observer, e.into())),
        };
        let document = assemble(&pages);
        let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
        let char_count = document.char_count();
        info!(
            "Run {}: extracted {} pages, {} chars in {}ms",
            run_id,
            pages.len(),
            char_count,
            extract_duration_ms
        );
        observer.on_text_extracted(run_id, pages.len(), char_count);

        // ── Infer name + generate ────────────────────────────────────────
        observer.on_state_change(run_id, RunState::Generating);
        let inferred = name::infer_name(document.as_str());
        debug!(
            "Run {}: inferred name {:?}",
            run_id,
            inferred.as_ref().map(|n| n.first_name.as_str())
        );

        let generate_start = Instant::now();
        let compliment = match self.generator.generate(document.as_str()).await {
            Ok(text) => ComplimentResult::Generated { text },
            Err(error) => {
                warn!("Run {}: generation failed, using fallback: {}", run_id, error);
                ComplimentResult::Fallback {
                    text: self.config.fallback_compliment.clone(),
                    error,
                }
            }
        };
        let generate_duration_ms = generate_start.elapsed().as_millis() as u64;

        let (state, notification) = if compliment.is_fallback() {
            (RunState::Failed, Notification::failed())
        } else {
            (RunState::Done, Notification::completed())
        };

        let stats = RunStats {
            document_bytes,
            page_count: pages.len(),
            char_count,
            load_duration_ms,
            extract_duration_ms,
            generate_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };
        info!(
            "Run {}: {} in {}ms",
            run_id, state, stats.total_duration_ms
        );

        observer.on_state_change(run_id, state);
        observer.on_notification(run_id, &notification);

        Ok(RunReport {
            run_id,
            compliment,
            name: inferred,
            document,
            stats,
        })
    }
}

fn abort(run_id: u64, observer: &dyn RunObserver, error: ElogioError) -> ElogioError {
    warn!("Run {}: failed: {}", run_id, error);
    observer.on_state_change(run_id, RunState::Failed);
    observer.on_notification(run_id, &Notification::failed());
    error
}

/// Validate and process a local file or URL with the default collaborators.
///
/// # Example
/// ```rust,no_run
/// use elogio::{process_document, PipelineConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = process_document("curriculo.pdf", &PipelineConfig::default()).await?;
/// println!("{:?}: {}", report.first_name(), report.compliment.text());
/// # Ok(())
/// # }
/// ```
pub async fn process_document(
    input_str: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<RunReport, ElogioError> {
    let source = input::open_input(input_str.as_ref(), config).await?;
    Pipeline::new(config.clone())?
        .run(1, source, &NoopObserver)
        .await
}

/// Validate and process a document that is already in memory.
pub async fn process_bytes(
    bytes: Vec<u8>,
    config: &PipelineConfig,
) -> Result<RunReport, ElogioError> {
    input::check_upload(bytes.len() as u64, &bytes, config.max_upload_bytes)?;
    Pipeline::new(config.clone())?
        .run(1, input::DocumentSource::from_bytes(bytes), &NoopObserver)
        .await
}
