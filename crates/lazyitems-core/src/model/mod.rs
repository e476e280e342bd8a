pub mod item;
pub mod item_data;
pub mod metadata;

pub use item::{Item, ProjectItem, IDENTITY_METADATA};
pub use item_data::ItemData;
pub use metadata::Metadata;
