//! Run lifecycle.
//!
//! ```text
//! Idle ─► Loading ─► Extracting ─► Generating ─► Done
//!            │           │              │
//!            └───────────┴──────────────┴────► Failed
//! Done / Failed ─► Idle   (new submission or reset)
//! ```
//!
//! `Failed` after `Generating` still carries a displayable (fallback)
//! compliment; `Failed` after `Loading` or `Extracting` carries nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Loading,
    Extracting,
    /// Name inference and compliment generation.
    Generating,
    Done,
    Failed,
}

impl RunState {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Any state may return to `Idle`: a new submission abandons the run in
    /// flight.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (_, Idle)
                | (Idle | Done | Failed, Loading)
                | (Loading, Extracting)
                | (Loading, Failed)
                | (Extracting, Generating)
                | (Extracting, Failed)
                | (Generating, Done)
                | (Generating, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    pub fn is_busy(self) -> bool {
        matches!(
            self,
            RunState::Loading | RunState::Extracting | RunState::Generating
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Loading => "loading",
            RunState::Extracting => "extracting",
            RunState::Generating => "generating",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::RunState::*;

    #[test]
    fn happy_path_is_allowed() {
        let path = [Idle, Loading, Extracting, Generating, Done, Idle];
        for w in path.windows(2) {
            assert!(w[0].can_transition_to(w[1]), "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn every_busy_state_can_fail() {
        for s in [Loading, Extracting, Generating] {
            assert!(s.is_busy());
            assert!(s.can_transition_to(Failed));
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!Idle.can_transition_to(Extracting));
        assert!(!Loading.can_transition_to(Generating));
        assert!(!Extracting.can_transition_to(Done));
        assert!(!Idle.can_transition_to(Failed));
    }
}
