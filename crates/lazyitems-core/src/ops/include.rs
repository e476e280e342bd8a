use std::sync::Arc;

use super::operation::{ApplyContext, ItemOperation};
use crate::errors::Result;
use crate::itemspec::{Fragment, ItemSpec};
use crate::list::ItemListBuilder;
use crate::model::{ItemData, Metadata, ProjectItem};

/// Adds one item per literal, expanded glob match and referenced item
#[derive(Debug, Clone, Default)]
pub struct IncludeOperation {
    exclude: Option<ItemSpec>,
    metadata: Metadata,
}

impl IncludeOperation {
    pub fn new(exclude: Option<ItemSpec>, metadata: Metadata) -> Self {
        Self { exclude, metadata }
    }

    pub fn exclude(&self) -> Option<&ItemSpec> {
        self.exclude.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn apply(
        &self,
        operation: &ItemOperation,
        builder: &mut ItemListBuilder,
        ctx: &ApplyContext<'_>,
    ) -> Result<()> {
        if !operation.condition() {
            return Ok(());
        }

        let item_type: Arc<str> = Arc::from(operation.item_type());
        let mut candidates = Vec::new();
        let mut references = ctx.matcher.references().iter();

        for fragment in operation.spec().fragments() {
            match fragment {
                Fragment::Literal(text) => {
                    candidates.push(ProjectItem::new(Arc::clone(&item_type), text.as_str()));
                }
                Fragment::Glob(glob) => {
                    if ctx.globs_to_ignore.contains(glob.text()) {
                        tracing::trace!(glob = glob.text(), "skipping glob removed later");
                        continue;
                    }
                    for value in ctx.expander.expand(glob)? {
                        candidates.push(ProjectItem::new(Arc::clone(&item_type), value));
                    }
                }
                Fragment::ItemReference(_) => {
                    let Some(resolved) = references.next() else {
                        continue;
                    };
                    for data in resolved.list() {
                        let source = data.item();
                        candidates.push(
                            ProjectItem::new(Arc::clone(&item_type), Arc::clone(source.value_arc()))
                                .with_metadata(source.metadata().clone()),
                        );
                    }
                }
            }
        }

        let order = operation.element_order();
        let items = candidates
            .into_iter()
            .filter(|item| ctx.exclude.map_or(true, |exclude| !exclude.matches(item)))
            .map(|item| {
                let item = if self.metadata.is_empty() {
                    item
                } else {
                    item.with_merged_metadata(&self.metadata)
                };
                ItemData::new(Arc::new(item), order)
            });
        builder.extend(items);
        Ok(())
    }
}
