//! Single-flight runs for a front end.
//!
//! A [`Session`] owns one [`Pipeline`] and at most one run in flight. Every
//! [`Session::start`] replaces the previous run: the old task is aborted at
//! its next await point (an in-flight compliment request is dropped with
//! it) and its events are no longer forwarded. Only the newest run ever
//! reaches the observer or the published [`SessionView`].
//!
//! ```rust,no_run
//! use elogio::{DocumentSource, Pipeline, PipelineConfig, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(Pipeline::new(PipelineConfig::default())?);
//! let bytes = std::fs::read("curriculo.pdf")?;
//! let report = session.start(DocumentSource::from_bytes(bytes)).outcome().await?;
//! println!("{}", report.compliment.text());
//! # Ok(())
//! # }
//! ```

use crate::error::ElogioError;
use crate::output::RunReport;
use crate::progress::{NoopObserver, Notification, RunObserver, SharedObserver};
use crate::run::Pipeline;
use crate::state::RunState;
use futures::future::{AbortHandle, Abortable, Aborted};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::AsyncRead;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

/// What a display should currently show.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionView {
    /// The active run, `None` before the first submission or after a reset.
    pub run_id: Option<u64>,
    pub state: RunState,
    /// Set once the active run completes extraction and generation.
    pub report: Option<RunReport>,
    /// Set when the active run failed before a compliment existed.
    pub error: Option<String>,
    /// The toast for the active run's outcome.
    pub notification: Option<Notification>,
}

struct Slot {
    active: Option<u64>,
    abort: Option<AbortHandle>,
}

struct Inner {
    pipeline: Pipeline,
    observer: SharedObserver,
    next_id: AtomicU64,
    slot: Mutex<Slot>,
    view: watch::Sender<SessionView>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish the outcome of `run_id` if it is still the active run.
    ///
    /// A run that was superseded while finishing resolves to
    /// [`ElogioError::Superseded`], whatever it produced.
    fn finish(
        &self,
        run_id: u64,
        result: Result<RunReport, ElogioError>,
    ) -> Result<RunReport, ElogioError> {
        let mut slot = self.lock();
        if slot.active != Some(run_id) {
            debug!("Run {}: finished after being superseded", run_id);
            return Err(ElogioError::Superseded { run: run_id });
        }
        slot.abort = None;

        let (state, notification) = match &result {
            Ok(report) if report.compliment.is_fallback() => {
                (RunState::Failed, Notification::failed())
            }
            Ok(_) => (RunState::Done, Notification::completed()),
            Err(_) => (RunState::Failed, Notification::failed()),
        };
        self.view.send_modify(|view| {
            view.state = state;
            view.notification = Some(notification);
            match &result {
                Ok(report) => view.report = Some(report.clone()),
                Err(e) => view.error = Some(e.to_string()),
            }
        });
        result
    }
}

/// Forwards events of one run while it is the active one.
///
/// Callbacks run with the session lock held, so a superseded run can never
/// interleave with its successor. Observers must not call back into the
/// session.
struct Gate {
    inner: Arc<Inner>,
    run_id: u64,
}

impl RunObserver for Gate {
    fn on_state_change(&self, run_id: u64, state: RunState) {
        let slot = self.inner.lock();
        if slot.active != Some(self.run_id) {
            return;
        }
        // Terminal states are published together with the report.
        if !state.is_terminal() {
            self.inner.view.send_modify(|view| view.state = state);
        }
        self.inner.observer.on_state_change(run_id, state);
    }

    fn on_text_extracted(&self, run_id: u64, page_count: usize, char_count: usize) {
        let slot = self.inner.lock();
        if slot.active == Some(self.run_id) {
            self.inner
                .observer
                .on_text_extracted(run_id, page_count, char_count);
        }
    }

    fn on_notification(&self, run_id: u64, notification: &Notification) {
        let slot = self.inner.lock();
        if slot.active == Some(self.run_id) {
            self.inner.observer.on_notification(run_id, notification);
        }
    }
}

/// Single-flight front end over a [`Pipeline`].
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_observer(pipeline, Arc::new(NoopObserver))
    }

    /// A session that forwards the active run's events to `observer`.
    pub fn with_observer(pipeline: Pipeline, observer: SharedObserver) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            inner: Arc::new(Inner {
                pipeline,
                observer,
                next_id: AtomicU64::new(1),
                slot: Mutex::new(Slot {
                    active: None,
                    abort: None,
                }),
                view,
            }),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }

    /// Submit a document, superseding any run in flight.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<R>(&self, source: R) -> RunHandle
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let run_id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let (abort_handle, registration) = AbortHandle::new_pair();

        {
            let mut slot = self.inner.lock();
            if let Some(previous) = slot.abort.replace(abort_handle) {
                previous.abort();
                if let Some(old) = slot.active {
                    info!("Run {}: superseded by run {}", old, run_id);
                }
            }
            slot.active = Some(run_id);
            self.inner.view.send_replace(SessionView {
                run_id: Some(run_id),
                ..SessionView::default()
            });
        }

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(Abortable::new(
            async move {
                let gate = Gate {
                    inner: Arc::clone(&inner),
                    run_id,
                };
                let result = inner.pipeline.run(run_id, source, &gate).await;
                inner.finish(run_id, result)
            },
            registration,
        ));

        RunHandle { run_id, task }
    }

    /// Abandon the run in flight, if any, and return to `Idle`.
    pub fn reset(&self) {
        let mut slot = self.inner.lock();
        if let Some(handle) = slot.abort.take() {
            handle.abort();
        }
        if let Some(old) = slot.active.take() {
            info!("Run {}: abandoned by reset", old);
        }
        self.inner.view.send_replace(SessionView::default());
    }

    /// The current view.
    pub fn snapshot(&self) -> SessionView {
        self.inner.view.borrow().clone()
    }

    /// A receiver that is notified whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.inner.view.subscribe()
    }

    /// The view as a stream, starting with the current value.
    pub fn watch(&self) -> WatchStream<SessionView> {
        WatchStream::new(self.subscribe())
    }
}

/// Handle to one submitted run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: u64,
    task: JoinHandle<Result<Result<RunReport, ElogioError>, Aborted>>,
}

impl RunHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Wait for the run to end.
    ///
    /// # Errors
    /// [`ElogioError::Superseded`] when a newer submission or a reset
    /// abandoned the run; otherwise whatever the run itself returned.
    pub async fn outcome(self) -> Result<RunReport, ElogioError> {
        match self.task.await {
            Ok(Ok(result)) => result,
            Ok(Err(Aborted)) => Err(ElogioError::Superseded { run: self.run_id }),
            Err(e) if e.is_cancelled() => Err(ElogioError::Superseded { run: self.run_id }),
            Err(e) => Err(ElogioError::Internal(format!(
                "run {} task failed: {}",
                self.run_id, e
            ))),
        }
    }
}
