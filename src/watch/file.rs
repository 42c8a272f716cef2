// Tue Jan 13 2026 - Alex

use crate::gameval::{GamevalError, Result};
use crate::watch::{ReloadHandler, ReloadSource, WatchHandle};
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchBackend {
    /// The platform watcher, falling back to polling if it cannot start.
    Native,
    Polling,
}

enum Signal {
    Changed,
    Stop,
}

/// Watches a single file through `notify`. The parent directory is watched
/// so the file may be created, replaced or renamed into place.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    backend: WatchBackend,
    poll_interval: Duration,
}

impl FileWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            backend: WatchBackend::Native,
            poll_interval,
        }
    }

    pub fn polling(poll_interval: Duration) -> Self {
        Self {
            backend: WatchBackend::Polling,
            poll_interval,
        }
    }

    pub fn backend(&self) -> WatchBackend {
        self.backend
    }

    fn poll_watcher<F>(&self, on_event: F) -> notify::Result<Box<dyn Watcher + Send>>
    where
        F: Fn(notify::Result<Event>) + Send + 'static,
    {
        let config = notify::Config::default()
            .with_poll_interval(self.poll_interval)
            .with_compare_contents(true);
        Ok(Box::new(PollWatcher::new(on_event, config)?))
    }

    fn start(&self, dir: &Path, tx: Sender<Signal>, name: OsString) -> Result<Box<dyn Watcher + Send>> {
        let make_handler = |tx: Sender<Signal>, name: OsString| {
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event, &name) => {
                    let _ = tx.send(Signal::Changed);
                }
                Ok(_) => {}
                Err(e) => log::warn!("File watch error: {}", e),
            }
        };

        let mut watcher: Box<dyn Watcher + Send> = match self.backend {
            WatchBackend::Native => match notify::recommended_watcher(make_handler(tx.clone(), name.clone())) {
                Ok(watcher) => Box::new(watcher),
                Err(e) => {
                    log::warn!("Native file watcher unavailable ({}), polling every {:?}", e, self.poll_interval);
                    self.poll_watcher(make_handler(tx, name))
                        .map_err(|e| GamevalError::Watch(format!("failed to watch {:?}: {}", dir, e)))?
                }
            },
            WatchBackend::Polling => self
                .poll_watcher(make_handler(tx, name))
                .map_err(|e| GamevalError::Watch(format!("failed to watch {:?}: {}", dir, e)))?,
        };

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| GamevalError::Watch(format!("failed to watch {:?}: {}", dir, e)))?;
        Ok(watcher)
    }

    fn dispatch_loop(path: PathBuf, handler: ReloadHandler, active: Arc<AtomicBool>, signals: Receiver<Signal>) {
        while let Ok(Signal::Changed) = signals.recv() {
            // one reload per burst of events
            if signals.try_iter().any(|signal| matches!(signal, Signal::Stop)) {
                break;
            }
            if !active.load(Ordering::SeqCst) {
                break;
            }
            if !path.exists() {
                continue;
            }
            log::debug!("Detected change in {:?}", path);
            handler(path.as_path(), false);
        }
        log::trace!("Stopped watching {:?}", path);
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

fn is_relevant(event: &Event, name: &OsStr) -> bool {
    let changed = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write))
    );
    changed && event.paths.iter().any(|p| p.file_name() == Some(name))
}

impl ReloadSource for FileWatcher {
    fn watch(&self, path: &Path, handler: ReloadHandler) -> Result<WatchHandle> {
        let path = path.to_path_buf();
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| GamevalError::Watch(format!("not a file path: {:?}", path)))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(GamevalError::Watch(format!("directory {:?} does not exist", dir)));
        }

        handler(path.as_path(), true);

        let (tx, rx) = mpsc::channel();
        let watcher = self.start(&dir, tx.clone(), name)?;

        let active = Arc::new(AtomicBool::new(true));
        let thread_active = active.clone();
        let thread_path = path.clone();
        let dispatcher = thread::Builder::new()
            .name("gameval-watcher".to_string())
            .spawn(move || FileWatcher::dispatch_loop(thread_path, handler, thread_active, rx))
            .map_err(|e| GamevalError::Watch(format!("failed to watch {:?}: {}", path, e)))?;

        Ok(WatchHandle::new(move || {
            active.store(false, Ordering::SeqCst);
            drop(watcher);
            let _ = tx.send(Signal::Stop);
            let _ = dispatcher.join();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;
    use std::time::Instant;

    fn recorder() -> (ReloadHandler, Arc<Mutex<Vec<bool>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let handler: ReloadHandler = Arc::new(move |_: &Path, first: bool| sink.lock().push(first));
        (handler, calls)
    }

    fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_initial_call_is_synchronous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamevals.json");
        fs::write(&path, "{}").unwrap();

        let (handler, calls) = recorder();
        let _handle = FileWatcher::new(Duration::from_millis(20)).watch(&path, handler).unwrap();

        assert_eq!(*calls.lock(), vec![true]);
    }

    #[test]
    fn test_change_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamevals.json");
        fs::write(&path, "{}").unwrap();

        let (handler, calls) = recorder();
        let _handle = FileWatcher::new(Duration::from_millis(20)).watch(&path, handler).unwrap();

        fs::write(&path, "{ \"npcs\": { \"chicken\": 41 } }").unwrap();
        assert!(wait_for(|| calls.lock().len() >= 2));
        assert_eq!(calls.lock()[1], false);
    }

    #[test]
    fn test_created_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.json");

        let (handler, calls) = recorder();
        let _handle = FileWatcher::new(Duration::from_millis(20)).watch(&path, handler).unwrap();

        fs::write(&path, "{}").unwrap();
        assert!(wait_for(|| calls.lock().len() >= 2));
    }

    #[test]
    fn test_sibling_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamevals.json");
        fs::write(&path, "{}").unwrap();

        let (handler, calls) = recorder();
        let _handle = FileWatcher::new(Duration::from_millis(20)).watch(&path, handler).unwrap();

        fs::write(dir.path().join("other.json"), "{}").unwrap();
        thread::sleep(Duration::from_millis(200));
        assert_eq!(*calls.lock(), vec![true]);
    }

    #[test]
    fn test_polling_sees_same_length_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamevals.json");
        fs::write(&path, r#"{"npcs":{"man":3106}}"#).unwrap();

        let (handler, calls) = recorder();
        let watcher = FileWatcher::polling(Duration::from_millis(20));
        assert_eq!(watcher.backend(), WatchBackend::Polling);
        let _handle = watcher.watch(&path, handler).unwrap();

        fs::write(&path, r#"{"npcs":{"man":3107}}"#).unwrap();
        assert!(wait_for(|| calls.lock().len() >= 2));
    }

    #[test]
    fn test_unregister_stops_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamevals.json");
        fs::write(&path, "{}").unwrap();

        let (handler, calls) = recorder();
        let mut handle = FileWatcher::new(Duration::from_millis(20)).watch(&path, handler).unwrap();
        handle.unregister();

        fs::write(&path, "{ \"npcs\": {} }").unwrap();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("gamevals.json");

        let (handler, _calls) = recorder();
        let result = FileWatcher::polling(Duration::from_millis(20)).watch(&path, handler);
        assert!(matches!(result, Err(GamevalError::Watch(_))));
    }
}
