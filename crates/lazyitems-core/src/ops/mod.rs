//! Item operations
//!
//! Each declared Include/Exclude/Remove/Update becomes an `ItemOperation`:
//! a parsed spec, the evaluated condition, a source location and a
//! per-kind policy. The evaluator applies them in declaration order.

pub mod declaration;
pub mod exclude;
pub mod include;
pub mod operation;
pub mod remove;
pub mod update;

pub use declaration::{OperationDeclaration, OperationType};
pub use exclude::ExcludeOperation;
pub use include::IncludeOperation;
pub use operation::{ApplyContext, ItemOperation, OperationKind};
pub use remove::RemoveOperation;
pub use update::UpdateOperation;
