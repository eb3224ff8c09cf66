//! CLI binary for elogio.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig`, runs one session and prints the compliment card.

use anyhow::{Context, Result};
use clap::Parser;
use elogio::pipeline::engine;
use elogio::{
    display, open_input, Notification, Pipeline, PipelineConfig, RunObserver, RunReport,
    RunState, Session, SharedObserver,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner observer ─────────────────────────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Shows a spinner while the run is busy and prints the notification when it
/// ends.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Aguarde");
        bar.set_message("Processando seu currículo e gerando seu elogio personalizado...");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RunObserver for CliObserver {
    fn on_state_change(&self, _run_id: u64, state: RunState) {
        let prefix = match state {
            RunState::Loading => "Lendo",
            RunState::Extracting => "Extraindo",
            RunState::Generating => "Gerando",
            _ => return,
        };
        self.bar.set_prefix(prefix);
    }

    fn on_text_extracted(&self, _run_id: u64, page_count: usize, char_count: usize) {
        self.bar.println(format!(
            "  {} {} {}",
            green("✓"),
            bold(&format!("{page_count} página(s)")),
            dim(&format!("{char_count} caracteres")),
        ));
    }

    fn on_notification(&self, _run_id: u64, notification: &Notification) {
        self.bar.finish_and_clear();
        print_notification(notification);
    }
}

fn print_notification(notification: &Notification) {
    let (mark, title) = if notification.is_error() {
        (red("✘"), red(notification.title))
    } else {
        (green("✔"), green(notification.title))
    };
    eprintln!("{} {}  {}", mark, bold(&title), notification.description);
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Compliment from a local résumé
  elogio curriculo.pdf

  # From a URL, as JSON
  elogio --json https://example.com/cv.pdf > elogio.json

  # Generate with an LLM provider instead of the compliment service
  elogio --provider openai --model gpt-4.1-mini curriculo.pdf

  # Show the extracted text too
  elogio --show-text curriculo.pdf

ENVIRONMENT VARIABLES:
  ELOGIO_ENDPOINT         Compliment service URL
  ELOGIO_TIMEOUT          Compliment request timeout in seconds
  ELOGIO_MAX_SIZE         Upload limit in bytes (default 5 MiB)
  OPENAI_API_KEY          OpenAI API key (LLM backend)
  ANTHROPIC_API_KEY       Anthropic API key (LLM backend)
  EDGEQUAKE_LLM_PROVIDER  Provider for the LLM backend
  EDGEQUAKE_MODEL         Model for the LLM backend
  PDFIUM_LIB_PATH         Path to a libpdfium shared library
"#;

/// Read a résumé PDF and print a personalised compliment.
#[derive(Parser, Debug)]
#[command(
    name = "elogio",
    version,
    about = "Read a résumé PDF and print a personalised compliment",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Compliment service URL.
    #[arg(long, env = "ELOGIO_ENDPOINT")]
    endpoint: Option<String>,

    /// Generate with this LLM provider (openai, anthropic, gemini, ollama…)
    /// instead of the compliment service.
    #[arg(long, env = "ELOGIO_PROVIDER")]
    provider: Option<String>,

    /// LLM model ID; implies the LLM backend.
    #[arg(long, env = "ELOGIO_MODEL")]
    model: Option<String>,

    /// Compliment request timeout in seconds (none by default).
    #[arg(long, env = "ELOGIO_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Upload limit in bytes.
    #[arg(long, env = "ELOGIO_MAX_SIZE", default_value_t = elogio::config::DEFAULT_MAX_UPLOAD_BYTES)]
    max_size: u64,

    /// Output the structured run report as JSON.
    #[arg(long, env = "ELOGIO_JSON")]
    json: bool,

    /// Also print the extracted document text.
    #[arg(long, env = "ELOGIO_SHOW_TEXT")]
    show_text: bool,

    /// Disable the spinner.
    #[arg(long, env = "ELOGIO_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ELOGIO_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "ELOGIO_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; keep library logs
    // quiet while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── PDF engine ───────────────────────────────────────────────────────
    tokio::task::block_in_place(engine::init)
        .context("PDF engine unavailable (set PDFIUM_LIB_PATH to a libpdfium)")?;

    // ── Intake + run ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let source = open_input(&cli.input, &config)
        .await
        .with_context(|| format!("Cannot use '{}'", cli.input))?;

    let pipeline = Pipeline::new(config).context("Invalid configuration")?;
    let session = if show_progress {
        Session::with_observer(pipeline, CliObserver::new() as SharedObserver)
    } else {
        Session::new(pipeline)
    };

    let report = session
        .start(source)
        .outcome()
        .await
        .context("Processing failed")?;

    print_report(&cli, &report)?;

    if !cli.quiet && !show_progress && !cli.json {
        let notification = if report.compliment.is_fallback() {
            Notification::failed()
        } else {
            Notification::completed()
        };
        print_notification(&notification);
    }
    if !cli.quiet && !cli.json {
        if let Some(err) = report.compliment.error() {
            eprintln!("   {}", dim(&err.to_string()));
        }
        eprintln!(
            "   {}",
            dim(&format!(
                "{} página(s)  {} caracteres  {}ms",
                report.stats.page_count, report.stats.char_count, report.stats.total_duration_ms
            ))
        );
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder().max_upload_bytes(cli.max_size);

    if let Some(ref url) = cli.endpoint {
        builder = builder.endpoint(url.clone());
    }
    if cli.provider.is_some() || cli.model.is_some() {
        builder = builder.llm(cli.provider.clone(), cli.model.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}

fn print_report(cli: &Cli, report: &RunReport) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if cli.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
        return Ok(());
    }

    if cli.show_text {
        write!(handle, "{}", report.document).context("Failed to write to stdout")?;
        writeln!(handle, "{}", dim("────────")).context("Failed to write to stdout")?;
    }

    let card = display::render_card(report.compliment.text(), report.first_name());
    handle
        .write_all(card.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}
