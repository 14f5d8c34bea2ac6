//! Filter to drop interactions with stalls outside the catalog.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Interaction, Snapshot};

/// Keeps interactions whose stall survived catalog preparation.
///
/// Reviews of excluded stalls (non-food units, unrated stalls) and of
/// stalls missing from the export are removed here, so they can never
/// become test items.
pub struct KnownStallFilter;

impl Filter for KnownStallFilter {
    fn name(&self) -> &str {
        "KnownStallFilter"
    }

    fn apply(
        &self,
        interactions: Vec<Interaction>,
        snapshot: &Snapshot,
    ) -> Result<Vec<Interaction>> {
        let before = interactions.len();
        let filtered: Vec<Interaction> = interactions
            .into_iter()
            .filter(|interaction| snapshot.contains_stall(&interaction.stall_id))
            .collect();

        if filtered.len() < before {
            tracing::debug!(
                "Dropped {} interactions with stalls outside the catalog",
                before - filtered.len()
            );
        }
        Ok(filtered)
    }
}
