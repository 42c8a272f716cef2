// Tue Jan 13 2026 - Alex

use crate::gameval::{
    Category, Diagnostic, DiagnosticKind, GamevalError, LookupStore, Result, TableSet, UNSET_ID,
};
use serde::de::{DeserializeSeed, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// One element of a persisted id array.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Id(i32),
    Name(String),
    Other(Value),
}

impl From<Value> for Token {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
                Some(id) => Token::Id(id),
                None => Token::Other(Value::Number(n)),
            },
            Value::String(name) => Token::Name(name),
            other => Token::Other(other),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub ids: BTreeSet<i32>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Encoded {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts between sets of ids and JSON arrays of symbolic names for one
/// category. Unknown names never fail a decode; they are dropped and
/// reported as diagnostics.
pub struct GamevalCodec<'a> {
    category: Category,
    store: &'a LookupStore,
}

impl<'a> GamevalCodec<'a> {
    pub fn new(category: Category, store: &'a LookupStore) -> Self {
        Self { category, store }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn read<I>(&self, tokens: I) -> Decoded
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        let tables = self.store.snapshot();
        let table = tables.get(self.category);
        let mut decoded = Decoded::default();

        for (index, token) in tokens.into_iter().enumerate() {
            match token.into() {
                Token::Id(id) => {
                    if id != UNSET_ID {
                        decoded.diagnostics.push(self.diagnostic(index, DiagnosticKind::RawId { id }));
                    }
                    decoded.ids.insert(id);
                }
                Token::Name(name) => match table.id(&name) {
                    Some(id) => {
                        decoded.ids.insert(id);
                    }
                    None => {
                        let suggestion = self.suggest(&tables, &name);
                        decoded.diagnostics.push(
                            self.diagnostic(index, DiagnosticKind::UnknownName { name, suggestion }),
                        );
                    }
                },
                Token::Other(value) => {
                    decoded.diagnostics.push(self.diagnostic(
                        index,
                        DiagnosticKind::MalformedToken {
                            token: value.to_string(),
                        },
                    ));
                }
            }
        }

        decoded.diagnostics.iter().for_each(Diagnostic::emit);
        decoded
    }

    pub fn read_value(&self, value: Value) -> Result<Decoded> {
        match value {
            Value::Array(items) => Ok(self.read(items)),
            other => Err(GamevalError::Codec(format!(
                "expected an array of {} gamevals, found {}",
                self.category, other
            ))),
        }
    }

    pub fn read_str(&self, json: &str) -> Result<Decoded> {
        let value: Value = serde_json::from_str(json).map_err(|e| GamevalError::Codec(e.to_string()))?;
        self.read_value(value)
    }

    pub fn write(&self, ids: &BTreeSet<i32>) -> Encoded {
        let tables = self.store.snapshot();
        let table = tables.get(self.category);

        let mut raw = Vec::new();
        let mut names = Vec::new();
        for &id in ids {
            match table.name(id) {
                Some(name) => names.push(name.to_string()),
                None => raw.push(id),
            }
        }
        names.sort();

        let mut diagnostics = Vec::new();
        let unmapped: Vec<i32> = raw.iter().copied().filter(|id| *id != UNSET_ID).collect();
        if !unmapped.is_empty() {
            let diagnostic = Diagnostic::new(self.category, None, DiagnosticKind::UnmappedIds { ids: unmapped });
            diagnostic.emit();
            diagnostics.push(diagnostic);
        }

        let value = Value::Array(
            raw.into_iter()
                .map(Value::from)
                .chain(names.into_iter().map(Value::from))
                .collect(),
        );

        Encoded { value, diagnostics }
    }

    pub fn write_string(&self, ids: &BTreeSet<i32>) -> Result<String> {
        serde_json::to_string(&self.write(ids).value).map_err(|e| GamevalError::Codec(e.to_string()))
    }

    /// A `DeserializeSeed` decoding an id array from any deserializer.
    pub fn seed(&self) -> IdSetSeed<'_, 'a> {
        IdSetSeed { codec: self }
    }

    /// A `Serialize` view encoding `ids` as names where possible.
    pub fn serializable<'s>(&'s self, ids: &'s BTreeSet<i32>) -> SerializeIds<'s, 'a> {
        SerializeIds { codec: self, ids }
    }

    fn suggest(&self, tables: &TableSet, name: &str) -> Option<Category> {
        match tables.categories_containing(name, self.category).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn diagnostic(&self, index: usize, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic::new(self.category, Some(index), kind)
    }
}

impl fmt::Debug for GamevalCodec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GamevalCodec").field("category", &self.category).finish()
    }
}

pub struct IdSetSeed<'c, 'a> {
    codec: &'c GamevalCodec<'a>,
}

impl<'de> DeserializeSeed<'de> for IdSetSeed<'_, '_> {
    type Value = BTreeSet<i32>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tokens = Vec::<Value>::deserialize(deserializer)?;
        Ok(self.codec.read(tokens).ids)
    }
}

pub struct SerializeIds<'s, 'a> {
    codec: &'s GamevalCodec<'a>,
    ids: &'s BTreeSet<i32>,
}

impl Serialize for SerializeIds<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.codec.write(self.ids);
        let items = match encoded.value {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in &items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
