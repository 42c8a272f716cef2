// Tue Jan 13 2026 - Alex

pub mod category;
pub mod codec;
pub mod diagnostic;
pub mod error;
pub mod guard;
pub mod loader;
pub mod manager;
pub mod search;
pub mod store;
pub mod table;
mod sweeper;

pub use category::Category;
pub use codec::{Decoded, Encoded, GamevalCodec, IdSetSeed, SerializeIds, Token};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{GamevalError, LoadError, Result};
pub use guard::{Gamevals, LockMode};
pub use loader::{load_gamevals, parse_gamevals};
pub use manager::GamevalManager;
pub use search::{search, CategoryHits, SearchHit};
pub use store::{LookupStore, TableSet};
pub use table::{CategoryTable, UNSET_ID};

use crate::config::Config;

pub fn create_gameval_manager(config: Config) -> GamevalManager {
    GamevalManager::new(config)
}
