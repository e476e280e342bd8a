use std::collections::BTreeSet;

use lazyitems_core_types::ElementLocation;

use super::declaration::OperationType;
use super::exclude::ExcludeOperation;
use super::include::IncludeOperation;
use super::remove::RemoveOperation;
use super::update::UpdateOperation;
use crate::errors::Result;
use crate::expander::{GlobExpander, NoGlobExpansion};
use crate::itemspec::{ItemSpec, SpecMatcher};
use crate::list::ItemListBuilder;

static NO_GLOBS: BTreeSet<String> = BTreeSet::new();

/// Everything an operation needs from the fold besides the list itself
pub struct ApplyContext<'a> {
    /// The operation's own spec, bound to resolved references
    pub matcher: &'a SpecMatcher<'a>,
    /// Bound `Exclude` spec of an Include
    pub exclude: Option<&'a SpecMatcher<'a>>,
    /// Glob texts a later operation removes wholesale
    pub globs_to_ignore: &'a BTreeSet<String>,
    pub expander: &'a dyn GlobExpander,
    pub path_like_case_sensitive: bool,
}

impl<'a> ApplyContext<'a> {
    /// Context with no exclude, nothing to ignore and no glob expansion
    pub fn new(matcher: &'a SpecMatcher<'a>) -> Self {
        Self {
            matcher,
            exclude: None,
            globs_to_ignore: &NO_GLOBS,
            expander: &NoGlobExpansion,
            path_like_case_sensitive: true,
        }
    }

    pub fn with_exclude(mut self, exclude: Option<&'a SpecMatcher<'a>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_globs_to_ignore(mut self, globs: &'a BTreeSet<String>) -> Self {
        self.globs_to_ignore = globs;
        self
    }

    pub fn with_expander(mut self, expander: &'a dyn GlobExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_path_like_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.path_like_case_sensitive = case_sensitive;
        self
    }
}

/// Per-kind policy
#[derive(Debug, Clone)]
pub enum OperationKind {
    Include(IncludeOperation),
    Exclude(ExcludeOperation),
    Remove(RemoveOperation),
    Update(UpdateOperation),
}

impl OperationKind {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationKind::Include(_) => OperationType::Include,
            OperationKind::Exclude(_) => OperationType::Exclude,
            OperationKind::Remove(_) => OperationType::Remove,
            OperationKind::Update(_) => OperationType::Update,
        }
    }
}

/// One declared mutation of an item list
///
/// Built once when the declaration is read and applied once per fold that
/// covers it. `apply` either mutates the builder completely or returns an
/// error before touching it.
#[derive(Debug, Clone)]
pub struct ItemOperation {
    spec: ItemSpec,
    condition: bool,
    location: ElementLocation,
    element_order: usize,
    kind: OperationKind,
}

impl ItemOperation {
    pub fn new(spec: ItemSpec, condition: bool, location: ElementLocation, kind: OperationKind) -> Self {
        Self {
            spec,
            condition,
            location,
            element_order: 0,
            kind,
        }
    }

    /// Order of the declaration among all declarations of the evaluator
    pub fn with_element_order(mut self, element_order: usize) -> Self {
        self.element_order = element_order;
        self
    }

    pub fn item_type(&self) -> &str {
        self.spec.item_type()
    }

    pub fn spec(&self) -> &ItemSpec {
        &self.spec
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn location(&self) -> &ElementLocation {
        &self.location
    }

    pub fn element_order(&self) -> usize {
        self.element_order
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn operation_type(&self) -> OperationType {
        self.kind.operation_type()
    }

    /// The `Exclude` spec of an Include
    pub fn exclude_spec(&self) -> Option<&ItemSpec> {
        match &self.kind {
            OperationKind::Include(include) => include.exclude(),
            _ => None,
        }
    }

    /// Structural checks that do not need the list
    ///
    /// # Errors
    ///
    /// Returns `MatchOnMetadataRestricted` for a Remove whose metadata match
    /// is not one name against one referenced list.
    pub fn validate(&self) -> Result<()> {
        match &self.kind {
            OperationKind::Remove(remove) => remove.validate(&self.spec, &self.location),
            _ => Ok(()),
        }
    }

    /// Apply to `builder`
    ///
    /// # Errors
    ///
    /// Fails before any mutation if validation fails or an Include glob
    /// cannot be expanded.
    pub fn apply(&self, builder: &mut ItemListBuilder, ctx: &ApplyContext<'_>) -> Result<()> {
        match &self.kind {
            OperationKind::Include(include) => include.apply(self, builder, ctx),
            OperationKind::Exclude(exclude) => exclude.apply(self, builder, ctx),
            OperationKind::Remove(remove) => remove.apply(self, builder, ctx),
            OperationKind::Update(update) => update.apply(self, builder, ctx),
        }
    }

    /// Glob texts whose matches this operation removes
    ///
    /// Only true-condition Removes and Excludes report anything.
    pub fn removed_globs(&self) -> BTreeSet<String> {
        match &self.kind {
            OperationKind::Remove(_) | OperationKind::Exclude(_) if self.condition => {
                self.spec.glob_texts().map(str::to_string).collect()
            }
            _ => BTreeSet::new(),
        }
    }
}
