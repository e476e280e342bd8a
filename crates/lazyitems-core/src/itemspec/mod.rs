//! Item specifications
//!
//! An `ItemSpec` is the parsed form of an Include/Exclude/Remove/Update
//! attribute value: an ordered list of literal values, glob patterns and
//! `@(Type)` references. Reference fragments hold a frozen pointer into the
//! referenced type's operation list; a `SpecMatcher` pairs the spec with the
//! resolved snapshots and answers match queries.

pub mod fragment;
pub mod glob;
pub mod item_spec;
pub mod matcher;

pub use fragment::{Fragment, ListReference};
pub use glob::GlobMatcher;
pub use item_spec::{ItemSpec, SpecContext};
pub use matcher::{ReferencedItems, SpecMatcher};
