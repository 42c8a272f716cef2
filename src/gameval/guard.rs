// Tue Jan 13 2026 - Alex

use crate::gameval::manager::ManagerState;
use std::fmt;
use std::sync::Arc;

/// Intent behind a keep-alive. Both modes keep the tables loaded the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Ordinary name to id resolution.
    Temporary,
    /// Id to name resolution.
    Reverse,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Temporary => f.write_str("temporary"),
            LockMode::Reverse => f.write_str("reverse"),
        }
    }
}

/// Keeps the gameval tables from being evicted while it is alive.
///
/// Closing (or dropping) releases the hold exactly once.
#[must_use = "the tables may be evicted as soon as the guard is dropped"]
pub struct Gamevals {
    state: Arc<ManagerState>,
    mode: LockMode,
    closed: bool,
}

impl Gamevals {
    pub(crate) fn new(state: Arc<ManagerState>, mode: LockMode) -> Self {
        Self {
            state,
            mode,
            closed: false,
        }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.decrement_lock("released");
        }
    }
}

impl Drop for Gamevals {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Gamevals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gamevals")
            .field("mode", &self.mode)
            .field("closed", &self.closed)
            .finish()
    }
}
