// Tue Jan 13 2026 - Alex

use crate::gameval::Category;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Id reserved for "explicitly unset".
pub const UNSET_ID: i32 = -1;

/// One category's name to id mapping plus the derived reverse index.
///
/// Names keep document order. When several names share an id the reverse
/// lookup returns whichever comes first; callers must not rely on which.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    category: Category,
    by_name: IndexMap<String, i32>,
    by_id: HashMap<i32, usize>,
}

impl CategoryTable {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            by_name: IndexMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Builds a table, dropping entries whose id is neither non-negative nor
    /// the unset sentinel.
    pub fn from_entries<I>(category: Category, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut by_name = IndexMap::new();

        for (name, id) in entries {
            match i32::try_from(id) {
                Ok(id) if id >= UNSET_ID => {
                    by_name.insert(name, id);
                }
                _ => log::warn!("Skipping {} gameval {} with invalid id {}", category, name, id),
            }
        }

        let mut by_id = HashMap::with_capacity(by_name.len());
        for (index, id) in by_name.values().enumerate() {
            by_id.entry(*id).or_insert(index);
        }

        Self {
            category,
            by_name,
            by_id,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn id(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: i32) -> Option<&str> {
        let index = *self.by_id.get(&id)?;
        self.by_name.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.by_name.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npcs() -> CategoryTable {
        CategoryTable::from_entries(
            Category::Npcs,
            vec![
                ("chicken".to_string(), 41),
                ("chicken_alt".to_string(), 41),
                ("man".to_string(), 3106),
                ("nobody".to_string(), -1),
            ],
        )
    }

    #[test]
    fn test_forward_lookup() {
        let table = npcs();
        assert_eq!(table.id("chicken"), Some(41));
        assert_eq!(table.id("Chicken"), None);
        assert_eq!(table.id("nobody"), Some(UNSET_ID));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_reverse_lookup_returns_a_matching_name() {
        let table = npcs();
        let name = table.name(41).unwrap();
        assert_eq!(table.id(name), Some(41));
        assert_eq!(table.name(3106), Some("man"));
        assert_eq!(table.name(9999), None);
    }

    #[test]
    fn test_invalid_ids_are_dropped() {
        let table = CategoryTable::from_entries(
            Category::Anims,
            vec![
                ("ok".to_string(), 808),
                ("negative".to_string(), -5),
                ("huge".to_string(), i64::from(i32::MAX) + 1),
            ],
        );
        assert_eq!(table.len(), 1);
        assert!(table.contains_name("ok"));
        assert!(!table.contains_name("negative"));
    }

    #[test]
    fn test_iteration_keeps_document_order() {
        let table = npcs();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["chicken", "chicken_alt", "man", "nobody"]);
    }
}
