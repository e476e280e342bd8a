use lazyitems_core_types::ElementLocation;

use super::fragment::{Fragment, ListReference};
use super::glob::{has_wildcards, GlobMatcher};
use crate::errors::{ItemEvalError, Result};

/// What the parser needs to know about its surroundings
pub struct SpecContext<'a> {
    /// Declaration being parsed, for error reporting
    pub location: &'a ElementLocation,
    pub glob_case_sensitive: bool,
    /// Directory glob fragments are relative to
    pub project_directory: Option<&'a str>,
    /// Number of operations declared so far for an item type
    pub declared_ops: &'a dyn Fn(&str) -> usize,
}

/// Parsed item specification
///
/// Immutable after construction. Fragment order follows the source text;
/// it does not affect matching but it does decide the order in which an
/// Include adds items.
#[derive(Debug, Clone)]
pub struct ItemSpec {
    item_type: String,
    text: String,
    fragments: Vec<Fragment>,
}

impl ItemSpec {
    /// Parse a `;`-separated specification
    ///
    /// Fragments are classified as `@(Type)` references, globs (when they
    /// contain `*` or `?`) or literals. Empty segments are skipped.
    ///
    /// # Errors
    ///
    /// * `MissingArgument` if the item type is empty or the spec has no fragments
    /// * `UnsupportedItemExpression` for transforms, separators or embedded references
    /// * `InvalidGlob` if a glob fragment fails to compile
    pub fn parse(text: &str, item_type: &str, ctx: &SpecContext<'_>) -> Result<Self> {
        if item_type.trim().is_empty() {
            return Err(ItemEvalError::missing("item_type"));
        }

        let mut fragments = Vec::new();
        for piece in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            fragments.push(parse_fragment(piece, ctx)?);
        }

        if fragments.is_empty() {
            return Err(ItemEvalError::missing("item_spec"));
        }

        Ok(Self {
            item_type: item_type.to_string(),
            text: text.to_string(),
            fragments,
        })
    }

    /// Build a spec from already-classified fragments
    pub fn from_fragments(item_type: impl Into<String>, fragments: Vec<Fragment>) -> Self {
        let text = fragments
            .iter()
            .map(Fragment::text)
            .collect::<Vec<_>>()
            .join(";");
        Self {
            item_type: item_type.into(),
            text,
            fragments,
        }
    }

    /// Item type of the operation that owns this spec
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Source text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Reference fragments in spec order
    pub fn references(&self) -> impl Iterator<Item = &ListReference> {
        self.fragments.iter().filter_map(Fragment::as_reference)
    }

    /// Pattern text of every glob fragment
    pub fn glob_texts(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Glob(glob) => Some(glob.text()),
            _ => None,
        })
    }

    /// Exactly one fragment, and it is a reference
    pub fn is_single_reference(&self) -> bool {
        matches!(self.fragments.as_slice(), [Fragment::ItemReference(_)])
    }

    /// Exactly one fragment, referencing `item_type` itself (`@(I)` on `I`)
    pub fn is_single_reference_to(&self, item_type: &str) -> bool {
        matches!(
            self.fragments.as_slice(),
            [Fragment::ItemReference(reference)] if reference.item_type == item_type
        )
    }
}

fn parse_fragment(piece: &str, ctx: &SpecContext<'_>) -> Result<Fragment> {
    if piece.contains("@(") {
        let name = piece
            .strip_prefix("@(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::trim)
            .filter(|name| is_item_type_name(name))
            .ok_or_else(|| ItemEvalError::UnsupportedItemExpression {
                expression: piece.to_string(),
                location: ctx.location.clone(),
            })?;
        let op_count = (ctx.declared_ops)(name);
        return Ok(Fragment::ItemReference(ListReference::new(name, op_count)));
    }

    if has_wildcards(piece) {
        let glob = GlobMatcher::compile(piece, ctx.glob_case_sensitive)?
            .with_base_directory(ctx.project_directory);
        return Ok(Fragment::Glob(glob));
    }

    Ok(Fragment::Literal(piece.to_string()))
}

fn is_item_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
