//! Status surface of an export run.

use std::fmt;

use crate::utils::log;

/// Lifecycle of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RunState {
    /// Whether triggers may start a new run.
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, RunState::Idle)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Succeeded => "succeeded",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receives human-readable status while exporting.
pub trait ProgressReporter: Send + Sync {
    /// A status line for the user.
    fn status(&self, message: &str);

    /// A failure line for the user. Diagnostic detail is logged separately.
    fn failure(&self, message: &str) {
        self.status(message);
    }

    /// The run moved to a new state.
    fn state_changed(&self, _state: RunState) {}
}

/// Reporter writing timestamped status lines to the console.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn status(&self, message: &str) {
        log::progress(message);
    }

    fn failure(&self, message: &str) {
        log::error(message);
    }

    fn state_changed(&self, state: RunState) {
        ::log::debug!("Export run is {state}");
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use std::sync::Mutex;

    use super::*;

    /// Reporter remembering everything it was told.
    #[derive(Default)]
    pub struct RecordingReporter {
        pub statuses: Mutex<Vec<String>>,
        pub failures: Mutex<Vec<String>>,
        pub states: Mutex<Vec<RunState>>,
    }

    impl RecordingReporter {
        pub fn statuses(&self) -> Vec<String> {
            self.statuses.lock().unwrap().clone()
        }

        pub fn failures(&self) -> Vec<String> {
            self.failures.lock().unwrap().clone()
        }

        pub fn states(&self) -> Vec<RunState> {
            self.states.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn status(&self, message: &str) {
            self.statuses.lock().unwrap().push(message.to_string());
        }

        fn failure(&self, message: &str) {
            self.failures.lock().unwrap().push(message.to_string());
        }

        fn state_changed(&self, state: RunState) {
            self.states.lock().unwrap().push(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_idle_accepts_trigger() {
        assert!(RunState::Idle.accepts_trigger());
        assert!(!RunState::Running.accepts_trigger());
        assert!(!RunState::Failed.accepts_trigger());
    }

    #[test]
    fn test_default_failure_goes_to_status() {
        struct StatusOnly(std::sync::Mutex<Vec<String>>);
        impl ProgressReporter for StatusOnly {
            fn status(&self, message: &str) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        let reporter = StatusOnly(Default::default());
        reporter.failure("boom");
        assert_eq!(reporter.0.lock().unwrap().as_slice(), ["boom"]);
    }
}
