//! Observer trait for run events, and the user-facing notifications.
//!
//! Inject an [`Arc<dyn RunObserver>`] into [`crate::Pipeline::run`] or a
//! [`crate::Session`] to follow a run as it moves through its states. All
//! methods default to no-ops so implementors override only what they need.
//!
//! # Example
//!
//! ```rust
//! use elogio::{Notification, RunObserver, RunState};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Toasts(Mutex<Vec<String>>);
//!
//! impl RunObserver for Toasts {
//!     fn on_notification(&self, _run_id: u64, n: &Notification) {
//!         self.0.lock().unwrap().push(n.title.to_string());
//!     }
//! }
//! ```

use crate::state::RunState;
use serde::Serialize;
use std::sync::Arc;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast-style message for the person who submitted the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notification {
    /// The run finished with a generated compliment.
    pub const fn completed() -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Processamento concluído!",
            description: "Seu elogio personalizado está pronto.",
        }
    }

    /// The run failed, or fell back to the default compliment.
    pub const fn failed() -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Erro no processamento",
            description: "Não foi possível processar seu arquivo. Tente novamente.",
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Receives events from a processing run.
///
/// `run_id` identifies the run; a [`crate::Session`] only forwards events of
/// the run it currently considers active.
pub trait RunObserver: Send + Sync {
    /// The run entered `state`.
    fn on_state_change(&self, run_id: u64, state: RunState) {
        let _ = (run_id, state);
    }

    /// Text extraction finished.
    fn on_text_extracted(&self, run_id: u64, page_count: usize, char_count: usize) {
        let _ = (run_id, page_count, char_count);
    }

    /// Something worth telling the user happened. Called exactly once per
    /// run that reaches a terminal state.
    fn on_notification(&self, run_id: u64, notification: &Notification) {
        let _ = (run_id, notification);
    }
}

/// A no-op observer.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Convenience alias for a shared observer.
pub type SharedObserver = Arc<dyn RunObserver>;
