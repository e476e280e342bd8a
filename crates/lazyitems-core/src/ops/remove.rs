use std::collections::HashSet;

use lazyitems_core_types::ElementLocation;

use super::operation::{ApplyContext, ItemOperation};
use crate::errors::{ItemEvalError, Result};
use crate::itemspec::ItemSpec;
use crate::list::ItemListBuilder;
use crate::match_on_metadata::MatchOnMetadataState;
use crate::model::ItemData;

/// Removes matching items, by value or by metadata
#[derive(Debug, Clone, Default)]
pub struct RemoveOperation {
    match_on_metadata: Option<MatchOnMetadataState>,
}

impl RemoveOperation {
    pub fn new(match_on_metadata: Option<MatchOnMetadataState>) -> Self {
        Self { match_on_metadata }
    }

    pub fn match_on_metadata(&self) -> Option<&MatchOnMetadataState> {
        self.match_on_metadata.as_ref()
    }

    /// Metadata matching takes exactly one name and a spec that is exactly
    /// one `@(Type)` reference
    ///
    /// # Errors
    ///
    /// Returns `MatchOnMetadataRestricted` carrying `location` otherwise.
    pub fn validate(&self, spec: &ItemSpec, location: &ElementLocation) -> Result<()> {
        match &self.match_on_metadata {
            Some(state) if state.count() != 1 || !spec.is_single_reference() => {
                Err(ItemEvalError::MatchOnMetadataRestricted {
                    item_type: spec.item_type().to_string(),
                    location: location.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn apply(
        &self,
        operation: &ItemOperation,
        builder: &mut ItemListBuilder,
        ctx: &ApplyContext<'_>,
    ) -> Result<()> {
        self.validate(operation.spec(), operation.location())?;

        if self.match_on_metadata.is_none()
            && operation.condition()
            && operation.spec().is_single_reference_to(operation.item_type())
        {
            tracing::debug!(
                item_type = operation.item_type(),
                removed = builder.len(),
                "self-remove clears list"
            );
            builder.clear();
            return Ok(());
        }

        if !operation.condition() {
            return Ok(());
        }

        let selected = self.select(builder, ctx);
        save(&selected, builder);
        Ok(())
    }

    fn select(&self, builder: &ItemListBuilder, ctx: &ApplyContext<'_>) -> HashSet<usize> {
        match &self.match_on_metadata {
            None => builder
                .iter()
                .filter(|data| ctx.matcher.matches(data.item()))
                .map(ItemData::identity)
                .collect(),
            Some(state) => {
                let index = ctx
                    .matcher
                    .metadata_index(state, ctx.path_like_case_sensitive);
                builder
                    .iter()
                    .filter(|data| index.contains(data.item()))
                    .map(ItemData::identity)
                    .collect()
            }
        }
    }
}

fn save(selected: &HashSet<usize>, builder: &mut ItemListBuilder) {
    if selected.is_empty() {
        return;
    }
    builder.retain(|data| !selected.contains(&data.identity()));
}
