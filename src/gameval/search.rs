// Tue Jan 13 2026 - Alex

use crate::gameval::{Category, TableSet};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHits {
    pub category: Category,
    pub hits: Vec<SearchHit>,
}

/// Filters every category by a case-insensitive name fragment and a decimal
/// id fragment. Categories without hits are left out.
pub fn search(tables: &TableSet, name_query: &str, id_query: &str) -> Vec<CategoryHits> {
    let name_query = name_query.to_lowercase();

    tables
        .tables()
        .filter_map(|table| {
            let hits: Vec<SearchHit> = table
                .iter()
                .filter(|(name, id)| {
                    name.to_lowercase().contains(&name_query) && id.to_string().contains(id_query)
                })
                .map(|(name, id)| SearchHit {
                    name: name.to_string(),
                    id,
                })
                .collect();

            if hits.is_empty() {
                None
            } else {
                Some(CategoryHits {
                    category: table.category(),
                    hits,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tables() -> TableSet {
        let mut data = HashMap::new();
        data.insert(Category::Npcs, vec![("Chicken".to_string(), 41), ("man".to_string(), 3106)]);
        data.insert(Category::Objects, vec![("chicken_coop".to_string(), 4100)]);
        data.insert(Category::Anims, vec![("idle".to_string(), 808)]);
        TableSet::from_map(data)
    }

    #[test]
    fn test_name_query_is_case_insensitive() {
        let results = search(&tables(), "CHICK", "");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].category, Category::Npcs);
        assert_eq!(results[0].hits, vec![SearchHit { name: "Chicken".to_string(), id: 41 }]);
        assert_eq!(results[1].category, Category::Objects);
    }

    #[test]
    fn test_id_query_matches_substring() {
        let results = search(&tables(), "", "41");
        let names: Vec<&str> = results
            .iter()
            .flat_map(|c| c.hits.iter().map(|h| h.name.as_str()))
            .collect();
        assert_eq!(names, vec!["Chicken", "chicken_coop"]);
    }

    #[test]
    fn test_both_queries_must_match() {
        assert!(search(&tables(), "man", "41").is_empty());
        assert_eq!(search(&tables(), "", "").iter().map(|c| c.hits.len()).sum::<usize>(), 4);
    }
}
