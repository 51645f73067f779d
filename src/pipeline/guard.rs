//! Single-flight guard shared by every export trigger.
//!
//! An export holds a `RunToken` for its whole duration. While a token is
//! alive every other trigger sharing the guard is refused.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    busy: Arc<AtomicBool>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard, or fail with `RunInProgress` if a run holds it.
    pub fn try_acquire(&self) -> Result<RunToken> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::RunInProgress)?;
        Ok(RunToken {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding the guard; released on drop.
#[derive(Debug)]
pub struct RunToken {
    busy: Arc<AtomicBool>,
}

impl Drop for RunToken {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
