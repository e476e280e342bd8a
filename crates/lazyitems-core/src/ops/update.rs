use super::operation::{ApplyContext, ItemOperation};
use crate::errors::Result;
use crate::list::ItemListBuilder;
use crate::model::Metadata;

/// Merges metadata into matching items, keeping their positions
#[derive(Debug, Clone, Default)]
pub struct UpdateOperation {
    metadata: Metadata,
}

impl UpdateOperation {
    pub fn new(metadata: Metadata) -> Self {
        Self { metadata }
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
        if !operation.condition() || self.metadata.is_empty() {
            return Ok(());
        }
        let updated = builder.replace_where(|data| {
            ctx.matcher
                .matches(data.item())
                .then(|| data.with_item(data.item().with_merged_metadata(&self.metadata)))
        });
        tracing::trace!(updated, "update applied");
        Ok(())
    }
}
