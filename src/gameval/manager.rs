// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::gameval::sweeper::Sweeper;
use crate::gameval::{
    loader, Category, CategoryTable, GamevalCodec, GamevalError, Gamevals, LockMode, LookupStore,
    Result, TableSet,
};
use crate::watch::{FileWatcher, ReloadHandler, ReloadSource, WatchHandle};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State shared between the manager, its guards, the sweeper and watchers.
pub(crate) struct ManagerState {
    config: Config,
    store: LookupStore,
    active_locks: AtomicUsize,
    epoch: Instant,
    last_access_ms: AtomicU64,
    // serializes loading-on-demand and the sweep's evict decision
    gate: Mutex<()>,
}

impl ManagerState {
    fn new(config: Config) -> Self {
        Self {
            config,
            store: LookupStore::new(),
            active_locks: AtomicUsize::new(0),
            epoch: Instant::now(),
            last_access_ms: AtomicU64::new(0),
            gate: Mutex::new(()),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn touch(&self) {
        self.last_access_ms.store(self.now_ms(), Ordering::SeqCst);
    }

    fn idle_for(&self) -> Duration {
        let last = self.last_access_ms.load(Ordering::SeqCst);
        Duration::from_millis(self.now_ms().saturating_sub(last))
    }

    fn holder_count(&self) -> usize {
        self.active_locks.load(Ordering::SeqCst)
    }

    fn increment_lock(&self, action: &str) -> usize {
        let count = self.active_locks.fetch_add(1, Ordering::SeqCst) + 1;
        self.touch();
        log::debug!("Gamevals {}: {} active locks", action, count);
        count
    }

    pub(crate) fn decrement_lock(&self, action: &str) -> usize {
        // touch first so a sweep between the two steps sees a fresh access
        self.touch();
        let previous = self
            .active_locks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| Some(current.saturating_sub(1)))
            .unwrap_or(0);
        let count = previous.saturating_sub(1);
        log::debug!("Gamevals {}: {} active locks remaining", action, count);
        count
    }

    /// Caller must hold `gate`.
    fn load_if_empty(&self) {
        if self.store.is_empty() {
            log::info!("Gamevals are empty, reloading from file");
            self.load_from(&self.config.gameval_path, false);
        }
    }

    fn ensure_loaded(&self) {
        let _gate = self.gate.lock();
        self.load_if_empty();
    }

    fn load_from(&self, path: &Path, first: bool) -> bool {
        let load_type = if first { "Loading" } else { "Reloading" };
        log::info!("{} gamevals from {:?}", load_type, path);

        match loader::load_gamevals(path) {
            Ok(tables) => {
                log::info!(
                    "{} gameval mappings: {} NPCs, {} Objects, {} Anims, {} Spotanims",
                    load_type,
                    tables.get(Category::Npcs).len(),
                    tables.get(Category::Objects).len(),
                    tables.get(Category::Anims).len(),
                    tables.get(Category::Spotanims).len()
                );
                self.store.replace(tables);
                self.touch();
                true
            }
            Err(e) => {
                log::error!("Failed to load gamevals: {}", e);
                false
            }
        }
    }

    fn reload(&self, path: &Path, first: bool) -> bool {
        let _gate = self.gate.lock();
        self.load_from(path, first)
    }

    pub(crate) fn acquire(self: &Arc<Self>, mode: LockMode) -> Gamevals {
        let _gate = self.gate.lock();
        self.load_if_empty();
        self.increment_lock(&format!("acquired ({})", mode));
        Gamevals::new(self.clone(), mode)
    }

    fn lock(&self) {
        let _gate = self.gate.lock();
        self.load_if_empty();
        self.increment_lock("locked");
    }

    fn unlock(&self) {
        self.decrement_lock("unlocked");
    }

    fn clear(&self) {
        log::info!("Clearing gamevals from memory");
        self.store.clear();
    }

    /// One idle check. Returns true if the tables were evicted.
    pub(crate) fn sweep(&self) -> bool {
        let _gate = self.gate.lock();
        if self.store.is_empty() {
            return false;
        }

        let idle = self.idle_for();
        let holders = self.holder_count();
        let timeout = self.config.keep_alive_timeout();

        if holders > 0 {
            log::debug!("Gamevals in use: {} active locks, last access {} ms ago", holders, idle.as_millis());
        } else if idle < timeout {
            log::debug!(
                "Gamevals idle: {} ms until cleanup (last access {} ms ago)",
                (timeout - idle).as_millis(),
                idle.as_millis()
            );
        }

        if holders == 0 && idle > timeout {
            log::info!("Cleaning up gamevals after {} ms of inactivity", idle.as_millis());
            self.clear();
            return true;
        }
        false
    }
}

/// Holds one explicit lock for as long as it lives.
struct ExplicitLock<'a>(&'a ManagerState);

impl<'a> ExplicitLock<'a> {
    fn take(state: &'a ManagerState) -> Self {
        state.lock();
        Self(state)
    }
}

impl Drop for ExplicitLock<'_> {
    fn drop(&mut self) {
        self.0.unlock();
    }
}

#[derive(Default)]
struct Runtime {
    sweeper: Option<Sweeper>,
    watch: Option<WatchHandle>,
}

/// Loads gamevals on demand, keeps them while anyone holds them, evicts them
/// once idle, and reloads them when the backing file changes.
pub struct GamevalManager {
    state: Arc<ManagerState>,
    source: Arc<dyn ReloadSource>,
    runtime: Mutex<Runtime>,
}

impl GamevalManager {
    pub fn new(config: Config) -> Self {
        let source = Arc::new(FileWatcher::new(config.watch_poll_interval()));
        Self::with_source(config, source)
    }

    pub fn with_source(config: Config, source: Arc<dyn ReloadSource>) -> Self {
        Self {
            state: Arc::new(ManagerState::new(config)),
            source,
            runtime: Mutex::new(Runtime::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Starts the idle sweeper and begins watching the gameval file. The
    /// watch registration loads the tables right away.
    pub fn start_up(&self) -> Result<()> {
        let mut runtime = self.runtime.lock();
        if runtime.sweeper.is_some() {
            log::warn!("Gameval manager is already running");
            return Ok(());
        }

        runtime.sweeper = Some(Sweeper::spawn(self.state.clone(), self.state.config.sweep_interval())?);

        let state = self.state.clone();
        let handler: ReloadHandler = Arc::new(move |path: &Path, first: bool| {
            state.reload(path, first);
        });
        runtime.watch = Some(self.source.watch(&self.state.config.gameval_path, handler)?);

        Ok(())
    }

    /// Stops watching and sweeping, then drops the tables.
    pub fn shut_down(&self) {
        let mut runtime = self.runtime.lock();

        if let Some(mut watch) = runtime.watch.take() {
            watch.unregister();
        }
        if let Some(sweeper) = runtime.sweeper.take() {
            sweeper.stop(self.state.config.shutdown_grace());
        }

        self.state.clear();
    }

    pub fn is_running(&self) -> bool {
        self.runtime.lock().sweeper.is_some()
    }

    pub fn acquire(&self) -> Gamevals {
        self.state.acquire(LockMode::Temporary)
    }

    pub fn acquire_reverse(&self) -> Gamevals {
        self.state.acquire(LockMode::Reverse)
    }

    /// Takes a hold without a guard. Must be paired with [`unlock`](Self::unlock).
    pub fn lock(&self) {
        self.state.lock();
    }

    /// Releases a hold taken by [`lock`](Self::lock). Extra calls are harmless.
    pub fn unlock(&self) {
        self.state.unlock();
    }

    pub fn ensure_loaded(&self) {
        self.state.ensure_loaded();
    }

    /// Runs a single idle check now. Returns true if the tables were evicted.
    pub fn sweep(&self) -> bool {
        self.state.sweep()
    }

    /// Reloads from `path`, keeping the current tables if that fails.
    pub fn reload_from(&self, path: &Path) -> bool {
        self.state.reload(path, false)
    }

    /// Watches `path` with `handler`, holding a guard and an explicit lock
    /// while each call runs so the tables cannot be evicted underneath it.
    pub fn watch_with_gamevals<F>(&self, path: &Path, handler: F) -> Result<WatchHandle>
    where
        F: Fn(&Path, bool) + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let wrapped: ReloadHandler = Arc::new(move |path: &Path, first: bool| {
            let _gamevals = state.acquire(LockMode::Temporary);
            let _lock = ExplicitLock::take(&state);
            handler(path, first);
        });
        self.source.watch(path, wrapped)
    }

    /// Like [`watch_with_gamevals`](Self::watch_with_gamevals) with a guard only.
    pub fn watch_with_gamevals_simple<F>(&self, path: &Path, handler: F) -> Result<WatchHandle>
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let wrapped: ReloadHandler = Arc::new(move |path: &Path, _first: bool| {
            let _gamevals = state.acquire(LockMode::Temporary);
            handler(path);
        });
        self.source.watch(path, wrapped)
    }

    pub fn store(&self) -> &LookupStore {
        &self.state.store
    }

    pub fn is_loaded(&self) -> bool {
        !self.state.store.is_empty()
    }

    pub fn holder_count(&self) -> usize {
        self.state.holder_count()
    }

    pub fn idle_for(&self) -> Duration {
        self.state.idle_for()
    }

    pub fn snapshot(&self) -> Arc<TableSet> {
        self.state.touch();
        self.state.store.snapshot()
    }

    pub fn category(&self, category: Category) -> Arc<CategoryTable> {
        self.state.touch();
        self.state.store.category(category)
    }

    pub fn npcs(&self) -> Arc<CategoryTable> {
        self.category(Category::Npcs)
    }

    pub fn objects(&self) -> Arc<CategoryTable> {
        self.category(Category::Objects)
    }

    pub fn anims(&self) -> Arc<CategoryTable> {
        self.category(Category::Anims)
    }

    pub fn spotanims(&self) -> Arc<CategoryTable> {
        self.category(Category::Spotanims)
    }

    /// Id for `name`. A missing name is an error since no id can stand in.
    pub fn id(&self, category: Category, name: &str) -> Result<i32> {
        self.category(category)
            .id(name)
            .ok_or_else(|| GamevalError::MissingName {
                category,
                name: name.to_string(),
            })
    }

    /// Some name mapped to `id`, if any. Which one is unspecified when
    /// several names share the id.
    pub fn name(&self, category: Category, id: i32) -> Option<String> {
        self.category(category).name(id).map(str::to_string)
    }

    pub fn codec(&self, category: Category) -> GamevalCodec<'_> {
        self.state.touch();
        GamevalCodec::new(category, &self.state.store)
    }
}

impl Drop for GamevalManager {
    fn drop(&mut self) {
        if self.is_running() {
            self.shut_down();
        }
    }
}
