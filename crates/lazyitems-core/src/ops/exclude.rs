use super::operation::{ApplyContext, ItemOperation};
use crate::errors::Result;
use crate::list::ItemListBuilder;

/// Filters matching items out of the list
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeOperation;

impl ExcludeOperation {
    pub(crate) fn apply(
        &self,
        operation: &ItemOperation,
        builder: &mut ItemListBuilder,
        ctx: &ApplyContext<'_>,
    ) -> Result<()> {
        if operation.condition() {
            builder.retain(|data| !ctx.matcher.matches(data.item()));
        }
        Ok(())
    }
}
