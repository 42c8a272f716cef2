// Wed Jan 15 2026 - Alex

use crate::gameval::{Category, CategoryTable, Result, TableSet, UNSET_ID};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

static ID_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#""(npcIds|objectIds|animationIds|graphicsObjectIds|projectileIds)"\s*:\s*\[((?:"(?:[^"\\]|\\.)*"|[^\]"])*)\]"#,
    )
        .expect("id field pattern is valid")
});

// strings and whole numbers are matched so only plain integers get rewritten
static ARRAY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?"#).expect("array token pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewritten {
    pub text: String,
    pub replaced: usize,
    pub unresolved: Vec<(Category, i32)>,
}

impl Rewritten {
    pub fn changed(&self) -> bool {
        self.replaced > 0
    }
}

/// Replaces raw ids in known id fields with their gameval names, leaving the
/// rest of the document untouched.
pub fn rewrite_ids(content: &str, tables: &TableSet) -> Result<Rewritten> {
    let mut result = Rewritten {
        text: String::with_capacity(content.len()),
        ..Default::default()
    };
    let mut last = 0;

    for caps in ID_FIELD.captures_iter(content) {
        let (Some(key), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let category = Category::from_field_key(key.as_str())?;
        let table = tables.get(category);

        result.text.push_str(&content[last..body.start()]);
        let array = ARRAY_TOKEN.replace_all(body.as_str(), |token: &Captures| {
            rewrite_token(&token[0], table, &mut result.replaced, &mut result.unresolved)
        });
        result.text.push_str(&array);
        last = body.end();
    }

    result.text.push_str(&content[last..]);
    Ok(result)
}

fn rewrite_token(
    token: &str,
    table: &CategoryTable,
    replaced: &mut usize,
    unresolved: &mut Vec<(Category, i32)>,
) -> String {
    if token.starts_with('"') {
        return token.to_string();
    }

    let Ok(id) = token.parse::<i32>() else {
        return token.to_string();
    };
    if id == UNSET_ID {
        return token.to_string();
    }

    match table.name(id) {
        Some(name) => {
            *replaced += 1;
            serde_json::to_string(name).unwrap_or_else(|_| token.to_string())
        }
        None => {
            unresolved.push((table.category(), id));
            token.to_string()
        }
    }
}

/// Rewrites `path` in place. The file is only written when something changed.
pub fn rewrite_file(path: &Path, tables: &TableSet) -> Result<Rewritten> {
    let content = fs::read_to_string(path)?;
    let rewritten = rewrite_ids(&content, tables)?;

    if rewritten.changed() {
        fs::write(path, &rewritten.text)?;
        log::info!("Replaced {} ids with gamevals in {:?}", rewritten.replaced, path);
    }
    for (category, id) in &rewritten.unresolved {
        log::warn!("No {} gameval for id {} in {:?}", category, id, path);
    }

    Ok(rewritten)
}

pub fn rewrite_files<'p, I>(paths: I, tables: &TableSet) -> Result<Vec<Rewritten>>
where
    I: IntoIterator<Item = &'p Path>,
{
    paths.into_iter().map(|path| rewrite_file(path, tables)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tables() -> TableSet {
        let mut data = HashMap::new();
        data.insert(Category::Npcs, vec![("chicken".to_string(), 41), ("man".to_string(), 3106)]);
        data.insert(Category::Spotanims, vec![("swarm_attack".to_string(), 1)]);
        data.insert(Category::Anims, vec![("idle".to_string(), 808)]);
        TableSet::from_map(data)
    }

    #[test]
    fn test_rewrites_known_fields_only() {
        let content = r#"{
  "description": "lights 41",
  "npcIds": [ 41, 3106, 9999 ],
  "radius": 41,
  "animationIds": [808]
}"#;
        let rewritten = rewrite_ids(content, &tables()).unwrap();

        assert_eq!(
            rewritten.text,
            r#"{
  "description": "lights 41",
  "npcIds": [ "chicken", "man", 9999 ],
  "radius": 41,
  "animationIds": ["idle"]
}"#
        );
        assert_eq!(rewritten.replaced, 3);
        assert_eq!(rewritten.unresolved, vec![(Category::Npcs, 9999)]);
    }

    #[test]
    fn test_unset_and_existing_names_are_kept() {
        let content = r#"{ "projectileIds": [-1, "swarm_1", 1] }"#;
        let rewritten = rewrite_ids(content, &tables()).unwrap();

        assert_eq!(rewritten.text, r#"{ "projectileIds": [-1, "swarm_1", "swarm_attack"] }"#);
        assert!(rewritten.unresolved.is_empty());
    }

    #[test]
    fn test_brackets_in_strings_and_fractions_are_kept() {
        let content = r#"{ "npcIds": ["a]b", 41.5, 1e3, 41] }"#;
        let rewritten = rewrite_ids(content, &tables()).unwrap();

        assert_eq!(rewritten.text, r#"{ "npcIds": ["a]b", 41.5, 1e3, "chicken"] }"#);
        assert_eq!(rewritten.replaced, 1);
        assert!(rewritten.unresolved.is_empty());
    }

    #[test]
    fn test_untouched_document() {
        let content = r#"{ "objectIds": [] }"#;
        let rewritten = rewrite_ids(content, &tables()).unwrap();
        assert_eq!(rewritten.text, content);
        assert!(!rewritten.changed());
    }

    #[test]
    fn test_rewrite_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_overrides.json");
        fs::write(&path, r#"[{ "npcIds": [3106] }]"#).unwrap();

        let results = rewrite_files([path.as_path()], &tables()).unwrap();
        assert_eq!(results[0].replaced, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"[{ "npcIds": ["man"] }]"#);
    }
}
