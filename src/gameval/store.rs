// Tue Jan 13 2026 - Alex

use crate::gameval::{Category, CategoryTable};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// One immutable generation of all four category tables.
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: [Arc<CategoryTable>; 4],
}

impl TableSet {
    pub fn empty() -> Self {
        Self {
            tables: Category::ALL.map(|c| Arc::new(CategoryTable::new(c))),
        }
    }

    /// Builds a full set; categories absent from `data` come out empty.
    pub fn from_map<I, E>(mut data: HashMap<Category, I>) -> Self
    where
        I: IntoIterator<Item = (String, E)>,
        E: Into<i64>,
    {
        let tables = Category::ALL.map(|category| {
            let table = match data.remove(&category) {
                Some(entries) => CategoryTable::from_entries(
                    category,
                    entries.into_iter().map(|(name, id)| (name, id.into())),
                ),
                None => CategoryTable::new(category),
            };
            Arc::new(table)
        });

        Self { tables }
    }

    pub fn get(&self, category: Category) -> &Arc<CategoryTable> {
        &self.tables[category.index()]
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<CategoryTable>> {
        self.tables.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.is_empty())
    }

    pub fn total_entries(&self) -> usize {
        self.tables.iter().map(|t| t.len()).sum()
    }

    /// Categories other than `except` that define `name`.
    pub fn categories_containing(&self, name: &str, except: Category) -> Vec<Category> {
        self.tables
            .iter()
            .filter(|t| t.category() != except && t.contains_name(name))
            .map(|t| t.category())
            .collect()
    }
}

impl Default for TableSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holds the current [`TableSet`]. Replacement swaps a single `Arc`, so a
/// reader sees either the old generation or the new one, never a mix.
pub struct LookupStore {
    current: RwLock<Arc<TableSet>>,
}

impl LookupStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(TableSet::empty())),
        }
    }

    pub fn snapshot(&self) -> Arc<TableSet> {
        self.current.read().clone()
    }

    pub fn category(&self, category: Category) -> Arc<CategoryTable> {
        self.current.read().get(category).clone()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    pub fn replace(&self, tables: TableSet) {
        *self.current.write() = Arc::new(tables);
    }

    pub fn replace_from<I, E>(&self, data: HashMap<Category, I>)
    where
        I: IntoIterator<Item = (String, E)>,
        E: Into<i64>,
    {
        self.replace(TableSet::from_map(data));
    }

    pub fn clear(&self) {
        self.replace(TableSet::empty());
    }
}

impl Default for LookupStore {
    fn default() -> Self {
        Self::new()
    }
}
