//! LazyItems Core - lazy item evaluation for build project files
//!
//! This crate turns an ordered sequence of declared item operations
//! (Include, Exclude, Remove, Update) into final item lists, one per item
//! type, without materializing intermediate states until asked:
//! - Item specifications with literal, glob and `@(Type)` fragments
//! - Matching by item value or by metadata (ordinal, case-insensitive, path)
//! - Condition-gated, order-dependent operations over a persistent list
//! - Glob-impact tracking for incremental up-to-date checks
//! - A reference-counted cross-document string cache
//!
//! The core performs no I/O. Glob expansion is injected through
//! [`GlobExpander`].

pub mod errors;
pub mod evaluator;
pub mod expander;
pub mod interner;
pub mod itemspec;
pub mod list;
pub mod logging_facility;
pub mod match_on_metadata;
pub mod model;
pub mod ops;
pub mod options;

/// Shared identifiers, locations and logging schema
pub use lazyitems_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ItemEvalError, Result};
pub use evaluator::{LazyItemEvaluator, MaterializedItems};
pub use expander::{GlobExpander, InMemoryFileSet, NoGlobExpansion};
pub use interner::StringCache;
pub use itemspec::{Fragment, ItemSpec, ListReference};
pub use lazyitems_core_types::ElementLocation;
pub use list::{ItemList, ItemListBuilder};
pub use match_on_metadata::{MatchOnMetadataState, MetadataComparisonMode};
pub use model::{Item, ItemData, Metadata, ProjectItem};
pub use ops::{ItemOperation, OperationDeclaration, OperationType};
pub use options::EvaluationOptions;
