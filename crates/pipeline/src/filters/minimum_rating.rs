//! Filter to keep positive interactions only.
//!
//! A review counts as a positive signal when its rating reaches the
//! threshold (4 stars by default). Everything below is dropped before the
//! split, so it is neither training data nor a hidden test item.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Interaction, Snapshot};

/// Removes interactions rated below `min_rating`.
pub struct MinimumRatingFilter {
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `min_rating` - Inclusive threshold (typically 4.0)
    pub fn new(min_rating: f32) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(
        &self,
        interactions: Vec<Interaction>,
        _snapshot: &Snapshot,
    ) -> Result<Vec<Interaction>> {
        let filtered: Vec<Interaction> = interactions
            .into_iter()
            .filter(|interaction| interaction.rating >= self.min_rating)
            .collect();

        Ok(filtered)
    }
}
