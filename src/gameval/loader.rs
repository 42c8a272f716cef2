// Tue Jan 13 2026 - Alex

use crate::gameval::{Category, LoadError, TableSet};
use crate::utils::logging::ScopedTimer;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

type RawGamevals = HashMap<String, IndexMap<String, i64>>;

/// Parses a gameval document: one object per category mapping names to ids.
pub fn parse_gamevals(bytes: &[u8], path: &Path) -> Result<TableSet, LoadError> {
    let raw: RawGamevals = serde_json::from_slice(bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = HashMap::with_capacity(Category::ALL.len());
    for (key, entries) in raw {
        match key.parse::<Category>() {
            Ok(category) => {
                data.insert(category, entries);
            }
            Err(_) => log::debug!("Ignoring unknown gameval category {:?} in {:?}", key, path),
        }
    }

    Ok(TableSet::from_map(data))
}

pub fn load_gamevals(path: &Path) -> Result<TableSet, LoadError> {
    let _timer = ScopedTimer::new("load gamevals");

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_gamevals(&bytes, path)
}
