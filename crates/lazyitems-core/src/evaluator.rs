//! Lazy item evaluator
//!
//! The parser declares operations one at a time; nothing is computed until
//! a caller asks for a type's items. `materialize` then folds that type's
//! operations, in declaration order, over an empty persistent list.
//!
//! ## References
//!
//! A `@(Other)` fragment is frozen at declaration: it records how many
//! `Other` operations existed at that point and resolves to the fold of
//! exactly that prefix. References therefore always point strictly
//! backwards and resolution terminates. Prefix folds are memoized per
//! `(type, count)` for the duration of one `materialize` call. A
//! reference to the type being folded is the builder's current snapshot.
//!
//! ## Example
//!
//! ```
//! use lazyitems_core::{EvaluationOptions, LazyItemEvaluator, OperationDeclaration};
//!
//! let mut evaluator = LazyItemEvaluator::new(EvaluationOptions::default());
//! evaluator.declare(OperationDeclaration::include("Compile", "a.cs;b.cs;c.cs")).unwrap();
//! evaluator.declare(OperationDeclaration::remove("Compile", "b.cs")).unwrap();
//!
//! let result = evaluator.materialize("Compile").unwrap();
//! assert_eq!(result.items.values(), vec!["a.cs", "c.cs"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use lazyitems_core_types::EvaluationId;

use crate::errors::{ItemEvalError, Result};
use crate::expander::{GlobExpander, NoGlobExpansion};
use crate::itemspec::{ItemSpec, ReferencedItems, SpecContext, SpecMatcher};
use crate::list::{ItemList, ItemListBuilder};
use crate::match_on_metadata::MatchOnMetadataState;
use crate::ops::{
    ApplyContext, ExcludeOperation, IncludeOperation, ItemOperation, OperationDeclaration,
    OperationKind, OperationType, RemoveOperation, UpdateOperation,
};
use crate::options::EvaluationOptions;
use crate::{log_op_end, log_op_error, log_op_start};

/// Final items of one type plus the globs whose matches were removed
#[derive(Debug, Clone, Default)]
pub struct MaterializedItems {
    pub items: ItemList,
    /// Glob texts of every true-condition Remove/Exclude in the fold
    pub removed_globs: BTreeSet<String>,
}

/// Owns the declared operations of one project evaluation
pub struct LazyItemEvaluator {
    id: EvaluationId,
    options: EvaluationOptions,
    project_directory: Option<String>,
    expander: Arc<dyn GlobExpander>,
    operations: BTreeMap<String, Vec<ItemOperation>>,
    next_element_order: usize,
}

impl LazyItemEvaluator {
    pub fn new(options: EvaluationOptions) -> Self {
        Self {
            id: EvaluationId::new(),
            options,
            project_directory: None,
            expander: Arc::new(NoGlobExpansion),
            operations: BTreeMap::new(),
            next_element_order: 0,
        }
    }

    /// Directory glob fragments are relative to
    ///
    /// Only affects operations declared afterwards.
    pub fn with_project_directory(mut self, directory: impl Into<String>) -> Self {
        self.project_directory = Some(directory.into());
        self
    }

    pub fn with_glob_expander(mut self, expander: Arc<dyn GlobExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn id(&self) -> &EvaluationId {
        &self.id
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Number of operations declared so far for `item_type`
    pub fn operation_count(&self, item_type: &str) -> usize {
        self.operations.get(item_type).map_or(0, Vec::len)
    }

    /// Declared item types in name order
    pub fn item_types(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn operations(&self, item_type: &str) -> &[ItemOperation] {
        self.operations
            .get(item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse and append one operation
    ///
    /// References in the spec are frozen against what has been declared up
    /// to now.
    ///
    /// # Errors
    ///
    /// * `MissingArgument` for an empty item type or item spec
    /// * `MatchOnMetadataRestricted` for metadata matching on anything but
    ///   a single-name, single-reference Remove
    /// * `AttributeNotAllowed` for an `Exclude` outside Include, or metadata
    ///   on a Remove or Exclude
    /// * `UnsupportedItemExpression`, `InvalidGlob` from parsing
    ///
    /// Nothing is appended on error.
    pub fn declare(&mut self, declaration: OperationDeclaration) -> Result<()> {
        let operation = self.build_operation(&declaration)?;
        let operation = operation.with_element_order(self.next_element_order);
        self.next_element_order += 1;

        tracing::debug!(
            evaluation_id = self.id.as_str(),
            item_type = operation.item_type(),
            op_kind = operation.operation_type().as_str(),
            location = %operation.location(),
            "declared item operation"
        );
        self.operations
            .entry(declaration.item_type)
            .or_default()
            .push(operation);
        Ok(())
    }

    fn build_operation(&self, declaration: &OperationDeclaration) -> Result<ItemOperation> {
        let declared_ops = |item_type: &str| self.operation_count(item_type);
        let ctx = SpecContext {
            location: &declaration.location,
            glob_case_sensitive: self.options.glob_case_sensitive,
            project_directory: self.project_directory.as_deref(),
            declared_ops: &declared_ops,
        };
        let spec = ItemSpec::parse(&declaration.item_spec, &declaration.item_type, &ctx)?;

        let not_allowed = |attribute: &str| ItemEvalError::AttributeNotAllowed {
            attribute: attribute.to_string(),
            operation: declaration.kind.to_string(),
            item_type: declaration.item_type.clone(),
            location: declaration.location.clone(),
        };
        if declaration.kind != OperationType::Include && declaration.exclude.is_some() {
            return Err(not_allowed("Exclude"));
        }
        if matches!(declaration.kind, OperationType::Remove | OperationType::Exclude)
            && !declaration.metadata.is_empty()
        {
            return Err(not_allowed("metadata"));
        }

        let match_on_metadata = MatchOnMetadataState::new(
            &declaration.match_on_metadata,
            declaration.comparison_mode,
        );
        if match_on_metadata.is_some() && declaration.kind != OperationType::Remove {
            return Err(ItemEvalError::MatchOnMetadataRestricted {
                item_type: declaration.item_type.clone(),
                location: declaration.location.clone(),
            });
        }

        let kind = match declaration.kind {
            OperationType::Include => {
                let exclude = declaration
                    .exclude
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| ItemSpec::parse(text, &declaration.item_type, &ctx))
                    .transpose()?;
                OperationKind::Include(IncludeOperation::new(exclude, declaration.metadata.clone()))
            }
            OperationType::Exclude => OperationKind::Exclude(ExcludeOperation),
            OperationType::Remove => OperationKind::Remove(RemoveOperation::new(match_on_metadata)),
            OperationType::Update => {
                OperationKind::Update(UpdateOperation::new(declaration.metadata.clone()))
            }
        };

        let operation = ItemOperation::new(
            spec,
            declaration.condition,
            declaration.location.clone(),
            kind,
        );
        operation.validate()?;
        Ok(operation)
    }

    /// Fold every operation declared for `item_type`
    ///
    /// An undeclared type materializes to an empty list.
    ///
    /// # Errors
    ///
    /// Propagates the first operation failure; no partial result is
    /// returned.
    pub fn materialize(&self, item_type: &str) -> Result<MaterializedItems> {
        log_op_start!(
            "materialize",
            evaluation_id = self.id.as_str(),
            item_type = item_type
        );
        let start = std::time::Instant::now();

        let op_count = self.operation_count(item_type);
        let result = self.folder().fold(item_type, op_count).map_err(|e| {
            log_op_error!(
                "materialize",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                item_type = item_type
            );
            e
        })?;

        log_op_end!(
            "materialize",
            duration_ms = start.elapsed().as_millis() as u64,
            item_type = item_type,
            op_count = op_count,
            item_count = result.items.len(),
            glob_count = result.removed_globs.len()
        );
        Ok(result)
    }

    /// Materialize every declared type, sharing prefix folds between them
    ///
    /// # Errors
    ///
    /// Fails on the first type whose fold fails.
    pub fn materialize_all(&self) -> Result<BTreeMap<String, MaterializedItems>> {
        log_op_start!("materialize_all", evaluation_id = self.id.as_str());
        let start = std::time::Instant::now();

        let mut folder = self.folder();
        let mut results = BTreeMap::new();
        for (item_type, operations) in &self.operations {
            match folder.fold(item_type, operations.len()) {
                Ok(items) => {
                    results.insert(item_type.clone(), items);
                }
                Err(e) => {
                    log_op_error!(
                        "materialize_all",
                        e.clone(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        item_type = item_type.as_str()
                    );
                    return Err(e);
                }
            }
        }

        log_op_end!(
            "materialize_all",
            duration_ms = start.elapsed().as_millis() as u64,
            item_count = results.len()
        );
        Ok(results)
    }

    fn folder(&self) -> Folder<'_> {
        Folder {
            operations: &self.operations,
            options: &self.options,
            expander: &*self.expander,
            memo: HashMap::new(),
        }
    }
}

impl Default for LazyItemEvaluator {
    fn default() -> Self {
        Self::new(EvaluationOptions::default())
    }
}

/// One materialization pass with its prefix memo
struct Folder<'e> {
    operations: &'e BTreeMap<String, Vec<ItemOperation>>,
    options: &'e EvaluationOptions,
    expander: &'e dyn GlobExpander,
    memo: HashMap<(String, usize), MaterializedItems>,
}

impl<'e> Folder<'e> {
    /// Fold the first `count` operations of `item_type`
    fn fold(&mut self, item_type: &str, count: usize) -> Result<MaterializedItems> {
        let key = (item_type.to_string(), count);
        if let Some(hit) = self.memo.get(&key) {
            return Ok(hit.clone());
        }

        let all = self.operations;
        let operations: &'e [ItemOperation] =
            all.get(item_type).map(Vec::as_slice).unwrap_or(&[]);
        let operations = operations
            .get(..count)
            .ok_or_else(|| ItemEvalError::ReferenceOutOfRange {
                item_type: item_type.to_string(),
                op_count: count,
                available: operations.len(),
            })?;

        let ignored = if self.options.skip_removed_glob_expansion {
            globs_to_ignore(operations)
        } else {
            vec![BTreeSet::new(); operations.len()]
        };

        let mut builder = ItemListBuilder::new();
        let mut removed_globs = BTreeSet::new();
        for (operation, ignore) in operations.iter().zip(&ignored) {
            let references = self.resolve(operation.spec(), &builder)?;
            let matcher = SpecMatcher::new(operation.spec(), references)?;
            let exclude = match operation.exclude_spec() {
                Some(spec) => Some(SpecMatcher::new(spec, self.resolve(spec, &builder)?)?),
                None => None,
            };
            let ctx = ApplyContext::new(&matcher)
                .with_exclude(exclude.as_ref())
                .with_globs_to_ignore(ignore)
                .with_expander(self.expander)
                .with_path_like_case_sensitive(self.options.path_like_case_sensitive);

            operation.apply(&mut builder, &ctx)?;
            removed_globs.extend(operation.removed_globs());

            tracing::trace!(
                item_type = item_type,
                op_kind = operation.operation_type().as_str(),
                location = %operation.location(),
                item_count = builder.len(),
                "applied item operation"
            );
        }

        let result = MaterializedItems {
            items: builder.build(),
            removed_globs,
        };
        self.memo.insert(key, result.clone());
        Ok(result)
    }

    fn resolve(&mut self, spec: &ItemSpec, builder: &ItemListBuilder) -> Result<Vec<ReferencedItems>> {
        let mut resolved = Vec::new();
        for reference in spec.references() {
            let list = if reference.item_type == spec.item_type() {
                builder.snapshot()
            } else {
                self.fold(&reference.item_type, reference.op_count)?.items
            };
            resolved.push(ReferencedItems::new(reference.item_type.as_str(), list));
        }
        Ok(resolved)
    }
}

/// For each operation, the globs removed wholesale by any later operation
fn globs_to_ignore(operations: &[ItemOperation]) -> Vec<BTreeSet<String>> {
    let mut result = vec![BTreeSet::new(); operations.len()];
    let mut later = BTreeSet::new();
    for (index, operation) in operations.iter().enumerate().rev() {
        result[index] = later.clone();
        later.extend(operation.removed_globs());
    }
    result
}
