use super::glob::GlobMatcher;

/// Frozen pointer to another item type's list
///
/// `op_count` is the number of operations that had been declared for
/// `item_type` when the referencing operation was declared. The referenced
/// snapshot is the result of folding exactly that prefix, so later
/// declarations never leak backwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListReference {
    pub item_type: String,
    pub op_count: usize,
}

impl ListReference {
    pub fn new(item_type: impl Into<String>, op_count: usize) -> Self {
        Self {
            item_type: item_type.into(),
            op_count,
        }
    }
}

/// One piece of an item specification
#[derive(Debug, Clone)]
pub enum Fragment {
    /// Exact item value
    Literal(String),
    /// Path pattern, compiled once
    Glob(GlobMatcher),
    /// `@(Type)` reference to another item list
    ItemReference(ListReference),
}

impl Fragment {
    /// Text of the fragment as it appeared in the spec
    pub fn text(&self) -> String {
        match self {
            Fragment::Literal(text) => text.clone(),
            Fragment::Glob(glob) => glob.text().to_string(),
            Fragment::ItemReference(reference) => format!("@({})", reference.item_type),
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, Fragment::Glob(_))
    }

    pub fn as_reference(&self) -> Option<&ListReference> {
        match self {
            Fragment::ItemReference(reference) => Some(reference),
            _ => None,
        }
    }
}
