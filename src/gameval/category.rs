// Tue Jan 13 2026 - Alex

use crate::gameval::GamevalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of gameval the lookup table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Npcs,
    Objects,
    Anims,
    Spotanims,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Npcs,
        Category::Objects,
        Category::Anims,
        Category::Spotanims,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Npcs => "npcs",
            Category::Objects => "objects",
            Category::Anims => "anims",
            Category::Spotanims => "spotanims",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Category::Npcs => 0,
            Category::Objects => 1,
            Category::Anims => 2,
            Category::Spotanims => 3,
        }
    }

    /// Maps a config document field holding id arrays onto its category.
    pub fn from_field_key(key: &str) -> Result<Self, GamevalError> {
        match key {
            "npcIds" => Ok(Category::Npcs),
            "objectIds" => Ok(Category::Objects),
            "animationIds" => Ok(Category::Anims),
            "graphicsObjectIds" | "projectileIds" => Ok(Category::Spotanims),
            _ => Err(GamevalError::UnknownFieldKey(key.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = GamevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s)
            .ok_or_else(|| GamevalError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
        assert!("Npcs".parse::<Category>().is_err());
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Category::from_field_key("npcIds").unwrap(), Category::Npcs);
        assert_eq!(Category::from_field_key("projectileIds").unwrap(), Category::Spotanims);
        assert_eq!(Category::from_field_key("graphicsObjectIds").unwrap(), Category::Spotanims);
        assert!(matches!(
            Category::from_field_key("itemIds"),
            Err(GamevalError::UnknownFieldKey(_))
        ));
    }
}
