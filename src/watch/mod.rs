// Tue Jan 13 2026 - Alex

pub mod file;

pub use file::{FileWatcher, WatchBackend};

use crate::gameval::Result;
use std::path::Path;
use std::sync::Arc;

/// Called with the watched path and whether this is the registration call.
pub type ReloadHandler = Arc<dyn Fn(&Path, bool) + Send + Sync>;

/// Something that can tell us when a file is created or modified.
pub trait ReloadSource: Send + Sync {
    /// Registers `handler` for `path`. The handler runs once with
    /// `first = true` before this returns, then on every change.
    fn watch(&self, path: &Path, handler: ReloadHandler) -> Result<WatchHandle>;
}

/// Keeps a subscription alive. Unregisters on drop.
pub struct WatchHandle {
    unregister: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    pub fn new<F>(unregister: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    pub fn unregister(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }

    pub fn is_registered(&self) -> bool {
        self.unregister.is_some()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("registered", &self.is_registered())
            .finish()
    }
}
