// Tue Jan 13 2026 - Alex

use crate::gameval::manager::ManagerState;
use crate::gameval::{GamevalError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Background thread running the idle check on a fixed interval.
pub(crate) struct Sweeper {
    stop_tx: Option<Sender<()>>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    pub(crate) fn spawn(state: Arc<ManagerState>, interval: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("gameval-sweeper".to_string())
            .spawn(move || {
                Sweeper::sweep_loop(&state, interval, stop_rx);
                let _ = done_tx.send(());
            })
            .map_err(|e| GamevalError::Watch(format!("failed to start sweeper: {}", e)))?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            done_rx,
            handle: Some(handle),
        })
    }

    fn sweep_loop(state: &ManagerState, interval: Duration, stop: Receiver<()>) {
        loop {
            if panic::catch_unwind(AssertUnwindSafe(|| state.sweep())).is_err() {
                log::error!("Error during gameval cleanup check");
            }

            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                _ => break,
            }
        }
    }

    /// Signals the thread and waits up to `grace` for it to finish. Returns
    /// false if the thread had to be abandoned.
    pub(crate) fn stop(mut self, grace: Duration) -> bool {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        match self.done_rx.recv_timeout(grace) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Gameval sweeper did not stop within {:?}, abandoning it", grace);
                self.handle.take();
                false
            }
        }
    }
}
