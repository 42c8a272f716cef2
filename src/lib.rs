// Tue Jan 15 2026 - Alex

pub mod config;
pub mod gameval;
pub mod rewrite;
pub mod ui;
pub mod utils;
pub mod watch;

pub use config::Config;
pub use gameval::{Category, GamevalCodec, GamevalManager, Gamevals, LookupStore};
pub use watch::{FileWatcher, ReloadSource};
