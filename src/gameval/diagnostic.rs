// Tue Jan 13 2026 - Alex

use crate::gameval::Category;
use itertools::Itertools;
use log::Level;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// A numeric id where a symbolic name was expected.
    RawId { id: i32 },
    /// A name the category does not define, with a category that does.
    UnknownName { name: String, suggestion: Option<Category> },
    /// A token that is neither an id nor a name.
    MalformedToken { token: String },
    /// Ids written out as numbers because no name maps to them.
    UnmappedIds { ids: Vec<i32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: Category,
    pub index: Option<usize>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(category: Category, index: Option<usize>, kind: DiagnosticKind) -> Self {
        Self { category, index, kind }
    }

    pub fn level(&self) -> Level {
        match self.kind {
            DiagnosticKind::RawId { .. } => Level::Debug,
            DiagnosticKind::UnknownName { .. } | DiagnosticKind::MalformedToken { .. } => Level::Error,
            DiagnosticKind::UnmappedIds { .. } => Level::Warn,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level() == Level::Error
    }

    pub fn emit(&self) {
        log::log!(self.level(), "{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::RawId { id } => write!(
                f,
                "Adding raw {} ID: {}. Should be replaced with a gameval.",
                self.category, id
            )?,
            DiagnosticKind::UnknownName { name, suggestion } => {
                write!(f, "Missing {} gameval: {}", self.category, name)?;
                if let Some(other) = suggestion {
                    write!(f, ", did you mean to match {}?", other)?;
                }
            }
            DiagnosticKind::MalformedToken { token } => {
                write!(f, "Unexpected {} gameval type: {}", self.category, token)?
            }
            DiagnosticKind::UnmappedIds { ids } => write!(
                f,
                "Exporting {} IDs with no corresponding gamevals: {}",
                self.category,
                ids.iter().join(", ")
            )?,
        }

        if let Some(index) = self.index {
            write!(f, " at index {}", index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_with_suggestion() {
        let diagnostic = Diagnostic::new(
            Category::Npcs,
            Some(2),
            DiagnosticKind::UnknownName {
                name: "door".to_string(),
                suggestion: Some(Category::Objects),
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "Missing npcs gameval: door, did you mean to match objects? at index 2"
        );
        assert!(diagnostic.is_error());
    }

    #[test]
    fn test_unmapped_ids_message() {
        let diagnostic = Diagnostic::new(
            Category::Anims,
            None,
            DiagnosticKind::UnmappedIds { ids: vec![12, 9999] },
        );
        assert_eq!(diagnostic.level(), Level::Warn);
        assert_eq!(
            diagnostic.to_string(),
            "Exporting anims IDs with no corresponding gamevals: 12, 9999"
        );
    }
}
